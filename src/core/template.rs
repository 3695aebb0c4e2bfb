//! Asset name templating.
//!
//! Templates may reference `${version}`, `${platform}` and `${arch}`. Any
//! other `${...}` sequence is left in place.

use crate::core::target::Target;

pub const VERSION_TOKEN: &str = "${version}";
pub const PLATFORM_TOKEN: &str = "${platform}";
pub const ARCH_TOKEN: &str = "${arch}";

/// Expand every placeholder occurrence in `template`.
pub fn resolve_asset_name(template: &str, version: &str, platform: &str, arch: &str) -> String {
    template
        .replace(VERSION_TOKEN, version)
        .replace(PLATFORM_TOKEN, platform)
        .replace(ARCH_TOKEN, arch)
}

pub fn resolve_for_target(template: &str, version: &str, target: &Target) -> String {
    resolve_asset_name(template, version, &target.platform, &target.arch)
}

use crate::core::config::InstallEnv;
use crate::core::paths;
use crate::core::target::Target;
use crate::error::Result;
use std::path::PathBuf;

/// Directory where consumers of the installed package look for the asset.
pub fn resolve_asset_path(
    env: &InstallEnv,
    platform: Option<&str>,
    arch: Option<&str>,
) -> Result<PathBuf> {
    let target = Target::host_or(platform, arch)?;
    paths::asset_path(env, &target)
}

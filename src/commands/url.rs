use crate::core::download::AssetLocation;
use crate::core::manifest::ReleaseDescriptor;
use crate::core::target::Target;
use crate::error::Result;
use std::path::Path;

/// Validate the manifest and resolve the asset for a target without
/// touching the network.
pub fn resolve_location(
    package_dir: &Path,
    platform: Option<&str>,
    arch: Option<&str>,
) -> Result<AssetLocation> {
    let descriptor = ReleaseDescriptor::load(package_dir)?;
    let target = Target::host_or(platform, arch)?;
    Ok(AssetLocation::resolve(&descriptor, &target))
}

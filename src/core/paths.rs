use crate::core::config::InstallEnv;
use crate::core::target::Target;
use crate::error::{GhReleaseError, Result};
use crate::utils::fs;
use std::path::{Path, PathBuf};

/// `<prefix>/node_modules/<name segments...>`, created if missing.
///
/// Scoped names split on `/`, so `@acme/tool` lands in
/// `node_modules/@acme/tool`.
pub fn module_root(env: &InstallEnv) -> Result<PathBuf> {
    let mode = if env.global { "global" } else { "local" };
    let prefix = env
        .prefix()
        .filter(|prefix| !prefix.as_os_str().is_empty())
        .ok_or_else(|| {
            GhReleaseError::path_resolution(format!("no {mode} install prefix is defined"))
        })?;
    let package_name = env
        .package_name
        .as_deref()
        .ok_or_else(|| GhReleaseError::path_resolution("package name is not defined"))?;

    let mut path = prefix.join("node_modules");
    path.extend(package_name.split('/').filter(|segment| !segment.is_empty()));

    create_dir(&path)?;
    Ok(path)
}

/// `<module_root>/assets/<platform>/<arch>`, created if missing.
pub fn asset_path(env: &InstallEnv, target: &Target) -> Result<PathBuf> {
    let path = module_root(env)?
        .join("assets")
        .join(&target.platform)
        .join(&target.arch);

    create_dir(&path)?;
    Ok(path)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::ensure_dir_exists(path).map_err(|e| {
        GhReleaseError::path_resolution(format!("cannot create {}: {e}", path.display()))
    })
}

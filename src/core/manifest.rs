use crate::core::target::{is_known_arch, is_known_platform, Target, ARCHITECTURES, PLATFORMS};
use crate::error::{GhReleaseError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const MANIFEST_FILE: &str = "package.json";

/// The parts of `package.json` this installer reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "ghreleaseInstaller", default)]
    pub ghrelease_installer: Option<Value>,
    #[serde(default)]
    pub cpu: Option<Value>,
    #[serde(default)]
    pub os: Option<Value>,
}

impl PackageManifest {
    /// Load `package.json` from a package root directory
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(GhReleaseError::ManifestNotFound { path });
        }

        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Everything needed to locate and fetch a release asset.
///
/// Only constructed through validation, so every field is known to be
/// present and well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    pub owner: String,
    pub repo: String,
    /// Release version with any leading `v` removed
    pub version: String,
    pub asset_name_template: String,
    pub supported_architectures: BTreeSet<String>,
    pub supported_platforms: BTreeSet<String>,
}

impl ReleaseDescriptor {
    pub fn load(dir: &Path) -> Result<Self> {
        Self::from_manifest(&PackageManifest::load(dir)?)
    }

    /// Validate a manifest. Fields are checked in a fixed order and the first
    /// failure is reported.
    pub fn from_manifest(manifest: &PackageManifest) -> Result<Self> {
        let section = installer_section(manifest)?;

        let owner = required_string(section, "owner")?;
        let repo = required_string(section, "repo")?;
        let version = normalize_version(&required_string(section, "version")?);
        if version.is_empty() {
            return Err(GhReleaseError::missing_field("version"));
        }
        let asset_name_template = required_string(section, "assetName")?;
        let supported_architectures =
            enumerated_list(manifest.cpu.as_ref(), "cpu", is_known_arch, &ARCHITECTURES)?;
        let supported_platforms =
            enumerated_list(manifest.os.as_ref(), "os", is_known_platform, &PLATFORMS)?;

        Ok(Self {
            owner,
            repo,
            version,
            asset_name_template,
            supported_architectures,
            supported_platforms,
        })
    }

    /// Whether the package declares support for `target`.
    pub fn supports(&self, target: &Target) -> bool {
        self.supported_platforms.contains(&target.platform)
            && self.supported_architectures.contains(&target.arch)
    }
}

/// Strip a single leading `v`: "v0.0.1" -> "0.0.1", "0.0.1" -> "0.0.1"
pub fn normalize_version(version: &str) -> String {
    version.strip_prefix('v').unwrap_or(version).to_string()
}

fn installer_section(manifest: &PackageManifest) -> Result<&Map<String, Value>> {
    match &manifest.ghrelease_installer {
        None | Some(Value::Null) => Err(GhReleaseError::missing_field("ghreleaseInstaller")),
        Some(Value::Object(section)) => Ok(section),
        Some(_) => Err(GhReleaseError::invalid_field(
            "ghreleaseInstaller",
            "must be an object",
        )),
    }
}

fn required_string(section: &Map<String, Value>, field: &str) -> Result<String> {
    match section.get(field) {
        None | Some(Value::Null) => Err(GhReleaseError::missing_field(field)),
        Some(Value::String(value)) if value.is_empty() => {
            Err(GhReleaseError::missing_field(field))
        }
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(GhReleaseError::invalid_field(field, "must be a string")),
    }
}

fn enumerated_list(
    value: Option<&Value>,
    field: &str,
    is_known: fn(&str) -> bool,
    allowed: &[&str],
) -> Result<BTreeSet<String>> {
    let items = match value {
        None | Some(Value::Null) => {
            return Err(GhReleaseError::invalid_field(field, "must be specified"))
        }
        Some(Value::Array(items)) => items,
        Some(_) => return Err(GhReleaseError::invalid_field(field, "must be an array")),
    };

    items
        .iter()
        .map(|item| match item.as_str() {
            Some(name) if is_known(name) => Ok(name.to_string()),
            _ => Err(GhReleaseError::invalid_field(
                field,
                format!("{item} is not one of {}", allowed.join(", ")),
            )),
        })
        .collect()
}

use crate::error::{GhReleaseError, Result};
use std::fmt;

/// Process architectures a package may declare in its `cpu` list.
pub const ARCHITECTURES: [&str; 14] = [
    "arm", "arm64", "ia32", "loong64", "mips", "mipsel", "mips64el", "ppc", "ppc64", "riscv64",
    "s390", "s390x", "x32", "x64",
];

/// Operating systems a package may declare in its `os` list.
pub const PLATFORMS: [&str; 7] = [
    "aix", "darwin", "freebsd", "linux", "openbsd", "sunos", "win32",
];

pub fn is_known_arch(arch: &str) -> bool {
    ARCHITECTURES.contains(&arch)
}

pub fn is_known_platform(platform: &str) -> bool {
    PLATFORMS.contains(&platform)
}

/// One installable variant of a release: a (platform, arch) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub platform: String,
    pub arch: String,
}

impl Target {
    pub fn new(platform: &str, arch: &str) -> Result<Self> {
        if !is_known_platform(platform) {
            return Err(GhReleaseError::invalid_field(
                "platform",
                format!("'{platform}' is not one of {}", PLATFORMS.join(", ")),
            ));
        }
        if !is_known_arch(arch) {
            return Err(GhReleaseError::invalid_field(
                "arch",
                format!("'{arch}' is not one of {}", ARCHITECTURES.join(", ")),
            ));
        }

        Ok(Self {
            platform: platform.to_string(),
            arch: arch.to_string(),
        })
    }

    /// The target of the running process.
    pub fn host() -> Result<Self> {
        match (host_platform(), host_arch()) {
            (Some(platform), Some(arch)) => Self::new(platform, arch),
            (platform, arch) => Err(GhReleaseError::UnsupportedHost {
                platform: platform.unwrap_or(std::env::consts::OS).to_string(),
                arch: arch.unwrap_or(std::env::consts::ARCH).to_string(),
            }),
        }
    }

    /// Host target with either half optionally overridden.
    pub fn host_or(platform: Option<&str>, arch: Option<&str>) -> Result<Self> {
        match (platform, arch) {
            (Some(platform), Some(arch)) => Self::new(platform, arch),
            _ => {
                let host = Self::host()?;
                Self::new(
                    platform.unwrap_or(&host.platform),
                    arch.unwrap_or(&host.arch),
                )
            }
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.platform, self.arch)
    }
}

fn host_platform() -> Option<&'static str> {
    if cfg!(target_os = "macos") {
        Some("darwin")
    } else if cfg!(target_os = "windows") {
        Some("win32")
    } else if cfg!(target_os = "linux") || cfg!(target_os = "android") {
        Some("linux")
    } else if cfg!(target_os = "freebsd") {
        Some("freebsd")
    } else if cfg!(target_os = "openbsd") {
        Some("openbsd")
    } else if cfg!(target_os = "aix") {
        Some("aix")
    } else if cfg!(any(target_os = "solaris", target_os = "illumos")) {
        Some("sunos")
    } else {
        None
    }
}

fn host_arch() -> Option<&'static str> {
    if cfg!(all(target_arch = "x86_64", target_pointer_width = "32")) {
        Some("x32")
    } else if cfg!(target_arch = "x86_64") {
        Some("x64")
    } else if cfg!(target_arch = "x86") {
        Some("ia32")
    } else if cfg!(target_arch = "aarch64") {
        Some("arm64")
    } else if cfg!(target_arch = "arm") {
        Some("arm")
    } else if cfg!(all(target_arch = "mips", target_endian = "little")) {
        Some("mipsel")
    } else if cfg!(target_arch = "mips") {
        Some("mips")
    } else if cfg!(all(target_arch = "mips64", target_endian = "little")) {
        Some("mips64el")
    } else if cfg!(target_arch = "powerpc") {
        Some("ppc")
    } else if cfg!(target_arch = "powerpc64") {
        Some("ppc64")
    } else if cfg!(target_arch = "riscv64") {
        Some("riscv64")
    } else if cfg!(target_arch = "s390x") {
        Some("s390x")
    } else if cfg!(target_arch = "loongarch64") {
        Some("loong64")
    } else {
        None
    }
}

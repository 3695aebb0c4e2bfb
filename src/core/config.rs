use std::path::PathBuf;

const GLOBAL_FLAG_VAR: &str = "npm_config_global";
const GLOBAL_PREFIX_VAR: &str = "npm_config_global_prefix";
const LOCAL_PREFIX_VAR: &str = "npm_config_local_prefix";
const PACKAGE_NAME_VAR: &str = "npm_package_name";

/// Facts about the install supplied by the package manager running the
/// lifecycle script. Read once at startup and passed around explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallEnv {
    pub global: bool,
    pub global_prefix: Option<PathBuf>,
    pub local_prefix: Option<PathBuf>,
    pub package_name: Option<String>,
}

impl InstallEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        InstallEnv {
            global: lookup(GLOBAL_FLAG_VAR).as_deref() == Some("true"),
            global_prefix: non_empty(GLOBAL_PREFIX_VAR).map(PathBuf::from),
            local_prefix: non_empty(LOCAL_PREFIX_VAR).map(PathBuf::from),
            package_name: non_empty(PACKAGE_NAME_VAR),
        }
    }

    /// The prefix matching the install mode.
    pub fn prefix(&self) -> Option<&PathBuf> {
        if self.global {
            self.global_prefix.as_ref()
        } else {
            self.local_prefix.as_ref()
        }
    }
}

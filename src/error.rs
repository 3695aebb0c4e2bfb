use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GhReleaseError>;

/// Discriminant of [`GhReleaseError`], for callers that branch on the kind of
/// failure rather than its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingField,
    InvalidField,
    PathResolution,
    Download,
    Extraction,
    ManifestNotFound,
    UnsupportedHost,
    Io,
    Json,
}

#[derive(Error, Debug)]
pub enum GhReleaseError {
    #[error("'{field}' property must be specified")]
    MissingField { field: String },

    #[error("'{field}' property is invalid: {message}")]
    InvalidField { field: String, message: String },

    #[error("Unable to resolve module path: {message}")]
    PathResolution { message: String },

    #[error("Failed downloading release asset for {version} from GitHub ({url}): {status}")]
    Download {
        version: String,
        url: String,
        status: String,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Extraction of {path} failed: {message}")]
    Extraction { path: PathBuf, message: String },

    #[error(
        "Unable to find {path}. Please run this at the root of the package you want to be installed"
    )]
    ManifestNotFound { path: PathBuf },

    #[error("Host {platform}/{arch} has no matching release target")]
    UnsupportedHost { platform: String, arch: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GhReleaseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GhReleaseError::MissingField { .. } => ErrorKind::MissingField,
            GhReleaseError::InvalidField { .. } => ErrorKind::InvalidField,
            GhReleaseError::PathResolution { .. } => ErrorKind::PathResolution,
            GhReleaseError::Download { .. } | GhReleaseError::Http(_) => ErrorKind::Download,
            GhReleaseError::Extraction { .. } => ErrorKind::Extraction,
            GhReleaseError::ManifestNotFound { .. } => ErrorKind::ManifestNotFound,
            GhReleaseError::UnsupportedHost { .. } => ErrorKind::UnsupportedHost,
            GhReleaseError::Io(_) => ErrorKind::Io,
            GhReleaseError::Json(_) => ErrorKind::Json,
        }
    }

    pub fn missing_field<S: Into<String>>(field: S) -> Self {
        GhReleaseError::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid_field<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        GhReleaseError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn path_resolution<S: Into<String>>(message: S) -> Self {
        GhReleaseError::PathResolution {
            message: message.into(),
        }
    }

    pub fn extraction<E: std::fmt::Display>(path: &std::path::Path, error: E) -> Self {
        GhReleaseError::Extraction {
            path: path.to_path_buf(),
            message: error.to_string(),
        }
    }
}

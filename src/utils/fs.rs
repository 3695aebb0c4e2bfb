use crate::error::Result;
use std::path::Path;

/// Create `path` and any missing parents. Succeeds if it already exists.
///
/// Failures surface as `GhReleaseError::Io`; callers that need a more
/// specific error map it themselves.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_ensure_dir_exists_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("c");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir_exists(&nested).unwrap();
    }

    #[test]
    fn test_ensure_dir_exists_under_a_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, b"x").unwrap();

        let err = ensure_dir_exists(&file.join("sub")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}

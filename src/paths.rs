//! Working directory provisioning

use std::io;
use std::path::{Path, PathBuf};

/// Ensures a directory exists and returns its path
///
/// Relative names resolve against the current working directory. An existing
/// directory is left untouched.
///
/// # Errors
///
/// Fails if the directory cannot be created, or if `name` already exists as a
/// regular file.
pub fn create_path(name: impl AsRef<Path>) -> io::Result<PathBuf> {
    let path = name.as_ref();
    std::fs::create_dir_all(path)?;
    tracing::debug!("Directory ready: {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("putusan").join("2024");

        let created = create_path(&target).unwrap();
        assert_eq!(created, target);
        assert!(target.is_dir());
    }

    #[test]
    fn test_existing_directory_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("pdf-putusan");
        create_path(&target).unwrap();
        std::fs::write(target.join("a.pdf"), b"%PDF").unwrap();

        create_path(&target).unwrap();
        assert!(target.join("a.pdf").exists());
    }

    #[test]
    fn test_file_in_the_way_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("putusan");
        std::fs::write(&target, b"").unwrap();

        assert!(create_path(&target).is_err());
    }
}

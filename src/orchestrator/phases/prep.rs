//! Preparation: toolchain source directory precondition.
//!
//! The toolchain sources are fetched by a separate step (a git submodule
//! update). This check makes that precondition explicit: the directory must
//! exist, be a directory and contain at least one entry.

use crate::error::BootstrapError;
use std::path::Path;

/// Verifies the toolchain source directory is present and populated.
///
/// `submodule` is the same directory as configured, relative to the root; it
/// is carried in the error for the fetch hint.
///
/// # Returns
/// * `Ok(())` if the directory exists and is non-empty
/// * `Err(BootstrapError::MissingSubmodule)` otherwise
pub fn verify_toolchain_source(
    toolchain_dir: &Path,
    submodule: &Path,
) -> Result<(), BootstrapError> {
    let missing = || BootstrapError::MissingSubmodule {
        path: toolchain_dir.to_path_buf(),
        submodule: submodule.to_path_buf(),
    };

    if !toolchain_dir.is_dir() {
        log::debug!(
            "Toolchain source not a directory: {}",
            toolchain_dir.display()
        );
        return Err(missing());
    }

    let mut entries = std::fs::read_dir(toolchain_dir).map_err(|e| {
        log::warn!("Cannot read {}: {}", toolchain_dir.display(), e);
        missing()
    })?;

    if entries.next().is_none() {
        log::debug!("Toolchain source is empty: {}", toolchain_dir.display());
        return Err(missing());
    }

    log::info!("Toolchain source found at {}", toolchain_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let result = verify_toolchain_source(&temp.path().join("rust"), Path::new("rust"));
        assert!(matches!(result, Err(BootstrapError::MissingSubmodule { .. })));
    }

    #[test]
    fn test_empty_directory() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let dir = temp.path().join("rust");
        fs::create_dir(&dir).unwrap();
        assert!(matches!(
            verify_toolchain_source(&dir, Path::new("rust")),
            Err(BootstrapError::MissingSubmodule { .. })
        ));
    }

    #[test]
    fn test_file_instead_of_directory() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("rust");
        fs::write(&path, "not a dir").unwrap();
        assert!(verify_toolchain_source(&path, Path::new("rust")).is_err());
    }

    #[test]
    fn test_populated_directory() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let dir = temp.path().join("rust");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("x.py"), "#!/usr/bin/env python3\n").unwrap();
        assert!(verify_toolchain_source(&dir, Path::new("rust")).is_ok());
    }
}

//! Staging: copy the configuration file into the toolchain directory.

use crate::error::BootstrapError;
use std::fs;
use std::path::Path;

/// Copy `source` to `destination`, replacing any existing file.
///
/// Re-running with the same source leaves the destination byte-identical.
/// Returns the number of bytes copied.
pub fn stage_config(source: &Path, destination: &Path) -> Result<u64, BootstrapError> {
    if !source.is_file() {
        return Err(BootstrapError::StagingFailed {
            path: source.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "configuration file not found",
            ),
        });
    }

    let bytes = fs::copy(source, destination).map_err(|e| BootstrapError::StagingFailed {
        path: destination.to_path_buf(),
        source: e,
    })?;

    log::info!(
        "Staged {} -> {} ({} bytes)",
        source.display(),
        destination.display(),
        bytes
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stage_overwrites_existing() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let source = temp.path().join("config.toml");
        let dest_dir = temp.path().join("rust");
        fs::create_dir(&dest_dir).unwrap();
        let dest = dest_dir.join("config.toml");

        fs::write(&source, "profile = \"compiler\"\n").unwrap();
        fs::write(&dest, "stale contents that are longer than the source\n").unwrap();

        stage_config(&source, &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "profile = \"compiler\"\n");
    }

    #[test]
    fn test_stage_is_idempotent() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let source = temp.path().join("config.toml");
        let dest = temp.path().join("staged.toml");
        fs::write(&source, "[build]\nextended = true\n").unwrap();

        stage_config(&source, &dest).unwrap();
        let once = fs::read(&dest).unwrap();
        stage_config(&source, &dest).unwrap();
        let twice = fs::read(&dest).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once, fs::read(&source).unwrap());
    }

    #[test]
    fn test_missing_source_fails() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let result = stage_config(&temp.path().join("absent.toml"), &temp.path().join("out.toml"));
        assert!(matches!(result, Err(BootstrapError::StagingFailed { .. })));
        assert!(!temp.path().join("out.toml").exists());
    }
}

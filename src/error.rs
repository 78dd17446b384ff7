//! Unified error type hierarchy for Toolchain Bootstrap
//!
//! Provides `BootstrapError` for the pipeline itself and `ConfigError` for
//! settings files. Every `BootstrapError` maps to a fixed process exit code so
//! the binary stays scriptable.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for an unrecognized host operating system.
pub const EXIT_UNSUPPORTED_PLATFORM: u8 = 1;
/// Exit code for a missing toolchain source directory or toolchain manager.
pub const EXIT_MISSING_DEPENDENCY: u8 = 2;
/// Exit code for a failed toolchain link.
pub const EXIT_LINK_FAILED: u8 = 3;
/// Exit code for configuration, self-location, staging and spawn errors.
pub const EXIT_ENVIRONMENT: u8 = 4;
/// Exit code when another run holds the workspace lock.
pub const EXIT_WORKSPACE_LOCKED: u8 = 5;

/// Settings file parsing and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid TOML in {path}: {source}")]
    InvalidToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Fatal bootstrap failures. None of them are retried.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// The OS identifier is not one of the supported platforms
    #[error("Unsupported platform: '{0}'")]
    UnsupportedPlatform(String),

    /// Toolchain source directory is absent or empty.
    ///
    /// `submodule` is the directory as configured, relative to the root.
    #[error("Toolchain source directory {} is missing or empty", .path.display())]
    MissingSubmodule { path: PathBuf, submodule: PathBuf },

    /// Toolchain manager is not installed or the probe marker was absent
    #[error("Required dependency '{tool}' is not available: {reason}")]
    MissingDependency { tool: String, reason: String },

    /// Build driver exited unsuccessfully
    #[error("Build driver failed with exit code {code}")]
    BuildFailed { code: i32 },

    /// Toolchain manager refused to link the stage output
    #[error("Linking toolchain '{alias}' failed: {reason}")]
    LinkFailed { alias: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not locate the bootstrap root: {0}")]
    SelfLocation(String),

    #[error("Staging {} failed: {source}", .path.display())]
    StagingFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Workspace is locked by another run ({})", .lock_path.display())]
    WorkspaceLocked { lock_path: PathBuf },
}

impl BootstrapError {
    /// Process exit code for this failure.
    ///
    /// Build failures propagate the driver's own code. Codes that do not fit
    /// in a `u8`, or that would read as success, collapse to 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            BootstrapError::UnsupportedPlatform(_) => EXIT_UNSUPPORTED_PLATFORM,
            BootstrapError::MissingSubmodule { .. } | BootstrapError::MissingDependency { .. } => {
                EXIT_MISSING_DEPENDENCY
            }
            BootstrapError::BuildFailed { code } => match u8::try_from(*code) {
                Ok(0) | Err(_) => 1,
                Ok(code) => code,
            },
            BootstrapError::LinkFailed { .. } => EXIT_LINK_FAILED,
            BootstrapError::Config(_)
            | BootstrapError::SelfLocation(_)
            | BootstrapError::StagingFailed { .. }
            | BootstrapError::Spawn { .. } => EXIT_ENVIRONMENT,
            BootstrapError::WorkspaceLocked { .. } => EXIT_WORKSPACE_LOCKED,
        }
    }

    /// Follow-up instruction shown under the failure message, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            BootstrapError::UnsupportedPlatform(_) => Some(
                "Supported platforms are linux-x64, macos-x64 and freebsd-x64".to_string(),
            ),
            BootstrapError::MissingSubmodule { submodule, .. } => Some(format!(
                "Fetch it first: git submodule update --init {}",
                submodule.display()
            )),
            BootstrapError::MissingDependency { tool, .. } => Some(format!(
                "Install '{}' and make sure it is on PATH",
                tool
            )),
            BootstrapError::WorkspaceLocked { lock_path } => Some(format!(
                "Wait for the other run to finish, or remove {} if it crashed",
                lock_path.display()
            )),
            _ => None,
        }
    }
}

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platform_display() {
        let err = BootstrapError::UnsupportedPlatform("Plan9".to_string());
        assert_eq!(err.to_string(), "Unsupported platform: 'Plan9'");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_missing_errors_share_exit_code() {
        let submodule = BootstrapError::MissingSubmodule {
            path: PathBuf::from("/work/rust"),
            submodule: PathBuf::from("rust"),
        };
        let dependency = BootstrapError::MissingDependency {
            tool: "rustup".to_string(),
            reason: "not found".to_string(),
        };
        assert_eq!(submodule.exit_code(), 2);
        assert_eq!(dependency.exit_code(), 2);
    }

    #[test]
    fn test_build_failed_propagates_code() {
        assert_eq!(BootstrapError::BuildFailed { code: 7 }.exit_code(), 7);
        assert_eq!(BootstrapError::BuildFailed { code: 300 }.exit_code(), 1);
        assert_eq!(BootstrapError::BuildFailed { code: -1 }.exit_code(), 1);
    }

    #[test]
    fn test_submodule_hint_uses_configured_path() {
        let err = BootstrapError::MissingSubmodule {
            path: PathBuf::from("/work/third_party/rust"),
            submodule: PathBuf::from("third_party/rust"),
        };
        assert_eq!(
            err.hint().as_deref(),
            Some("Fetch it first: git submodule update --init third_party/rust")
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::FileNotFound("/etc/bootstrap.toml".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration file not found: /etc/bootstrap.toml"
        );
        assert_eq!(BootstrapError::from(err).exit_code(), 4);
    }
}

//! Settings validation.

use crate::config::BootstrapConfig;
use crate::error::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Highest stage accepted for `--stage`.
pub const MAX_STAGE: u8 = 3;

static ALIAS_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").ok());

/// Toolchain alias must be a single safe token; it becomes a manager argument.
pub fn validate_alias(alias: &str) -> Result<(), ConfigError> {
    let re = ALIAS_PATTERN.as_ref().ok_or_else(|| {
        ConfigError::ValidationFailed("Failed to compile alias validation regex".to_string())
    })?;

    if !re.is_match(alias) {
        return Err(ConfigError::ValidationFailed(format!(
            "Toolchain alias contains invalid characters: '{}'. Use letters, digits, '.', '_' or '-'",
            alias
        )));
    }
    Ok(())
}

fn validate_relative(field: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed(format!(
            "'{}' cannot be empty",
            field
        )));
    }
    if path.is_absolute() {
        return Err(ConfigError::ValidationFailed(format!(
            "'{}' must be relative to the bootstrap root, got {}",
            field,
            path.display()
        )));
    }
    Ok(())
}

fn validate_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationFailed(format!(
            "'{}' cannot be empty",
            field
        )));
    }
    Ok(())
}

/// Validate a merged configuration.
pub fn validate_config(config: &BootstrapConfig) -> Result<(), ConfigError> {
    validate_relative("toolchain_dir", &config.toolchain_dir)?;
    validate_relative("config_file", &config.config_file)?;
    validate_relative("build_output_dir", &config.build_output_dir)?;
    validate_relative("log_dir", &config.log_dir)?;

    validate_non_empty("manager", &config.manager)?;
    validate_non_empty("probe_marker", &config.probe_marker)?;
    validate_non_empty("build_driver", &config.build_driver)?;
    validate_non_empty("build_target", &config.build_target)?;

    validate_alias(&config.toolchain_alias)?;

    if config.stage > MAX_STAGE {
        return Err(ConfigError::ValidationFailed(format!(
            "stage must be between 0 and {}, got {}",
            MAX_STAGE, config.stage
        )));
    }

    Ok(())
}

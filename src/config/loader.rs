//! Settings file loader.

use crate::config::validator::validate_config;
use crate::config::{BootstrapConfig, SETTINGS_FILE_NAME};
use crate::error::ConfigError;
use std::fs;
use std::path::Path;

/// Read a settings file into a TOML table.
fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.display().to_string())
        } else {
            ConfigError::IoError(e)
        }
    })?;

    toml::from_str::<toml::Table>(&content).map_err(|source| ConfigError::InvalidToml {
        path: path.display().to_string(),
        source,
    })
}

fn from_table(table: toml::Table, origin: &Path) -> Result<BootstrapConfig, ConfigError> {
    toml::Value::Table(table)
        .try_into::<BootstrapConfig>()
        .map_err(|source| ConfigError::InvalidToml {
            path: origin.display().to_string(),
            source,
        })
}

/// Resolve the effective settings for a bootstrap root.
///
/// Layers `<root>/bootstrap.toml` (optional) and then `explicit` (required
/// when given) key by key over the defaults, then validates the result.
pub fn resolve_config(root: &Path, explicit: Option<&Path>) -> Result<BootstrapConfig, ConfigError> {
    let mut merged = toml::Table::new();
    let mut origin = root.join(SETTINGS_FILE_NAME);

    if origin.is_file() {
        log::debug!("Loading settings from {}", origin.display());
        merged.extend(read_table(&origin)?);
    }

    if let Some(path) = explicit {
        log::debug!("Loading settings from {}", path.display());
        merged.extend(read_table(path)?);
        origin = path.to_path_buf();
    }

    let config = from_table(merged, &origin)?;
    validate_config(&config)?;
    Ok(config)
}

//! Configuration module for the bootstrap pipeline.
//!
//! # Module Structure
//!
//! - `loader`: Reads `bootstrap.toml` files and layers them over the defaults
//! - `validator`: Checks names, relative paths, alias syntax and stage range
//!
//! # Configuration Flow
//!
//! 1. Built-in defaults describe the stock layout (`rust/`, `config.toml`, `x.py`)
//! 2. `<root>/bootstrap.toml` overrides individual keys when present
//! 3. An explicit `--config` file overrides again
//! 4. The validator runs once on the merged result
//!
//! The merged `BootstrapConfig` is passed to every step explicitly; nothing is
//! exported into the process environment.

pub mod loader;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up at the bootstrap root for per-checkout settings.
pub const SETTINGS_FILE_NAME: &str = "bootstrap.toml";

/// Settings that shape the probe, build and link invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Toolchain source directory, relative to the bootstrap root
    pub toolchain_dir: PathBuf,

    /// Configuration file copied from the root into the toolchain directory
    pub config_file: PathBuf,

    /// Toolchain manager executable
    pub manager: String,

    /// Arguments of the manager's status command
    pub probe_args: Vec<String>,

    /// Substring the status output must contain
    pub probe_marker: String,

    /// Build driver script inside the toolchain directory
    pub build_driver: String,

    /// Build driver target
    pub build_target: String,

    /// Bootstrapping depth passed as `--stage`
    pub stage: u8,

    /// Build output directory inside the toolchain directory
    pub build_output_dir: PathBuf,

    /// Alias the built toolchain is linked under
    pub toolchain_alias: String,

    /// Session log directory, relative to the bootstrap root
    pub log_dir: PathBuf,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        BootstrapConfig {
            toolchain_dir: PathBuf::from("rust"),
            config_file: PathBuf::from("config.toml"),
            manager: "rustup".to_string(),
            probe_args: vec!["show".to_string()],
            probe_marker: "rustup home".to_string(),
            build_driver: "x.py".to_string(),
            build_target: "build".to_string(),
            stage: 2,
            build_output_dir: PathBuf::from("build"),
            toolchain_alias: "stage2".to_string(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl BootstrapConfig {
    /// Absolute toolchain source directory under `root`.
    pub fn toolchain_path(&self, root: &Path) -> PathBuf {
        root.join(&self.toolchain_dir)
    }

    /// Configuration file as shipped next to the bootstrap binary.
    pub fn config_source(&self, root: &Path) -> PathBuf {
        root.join(&self.config_file)
    }

    /// Where the configuration file is staged.
    pub fn config_destination(&self, root: &Path) -> PathBuf {
        self.toolchain_path(root).join(&self.config_file)
    }

    /// Stage output registered with the toolchain manager,
    /// e.g. `rust/build/x86_64-unknown-linux-gnu/stage2`.
    pub fn stage_output(&self, root: &Path, host_triple: &str) -> PathBuf {
        self.toolchain_path(root)
            .join(&self.build_output_dir)
            .join(host_triple)
            .join(format!("stage{}", self.stage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_stock_layout() {
        let config = BootstrapConfig::default();
        assert_eq!(config.toolchain_dir, PathBuf::from("rust"));
        assert_eq!(config.manager, "rustup");
        assert_eq!(config.stage, 2);
        assert_eq!(config.toolchain_alias, "stage2");
    }

    #[test]
    fn test_stage_output_path() {
        let config = BootstrapConfig::default();
        let path = config.stage_output(Path::new("/work"), "x86_64-unknown-linux-gnu");
        assert_eq!(
            path,
            PathBuf::from("/work/rust/build/x86_64-unknown-linux-gnu/stage2")
        );
    }

    #[test]
    fn test_config_destination_inside_toolchain_dir() {
        let config = BootstrapConfig::default();
        assert_eq!(
            config.config_destination(Path::new("/work")),
            PathBuf::from("/work/rust/config.toml")
        );
        assert_eq!(
            config.config_source(Path::new("/work")),
            PathBuf::from("/work/config.toml")
        );
    }
}

//! Command-line surface.

use crate::log_collector::console_level_for;
use crate::orchestrator::BootstrapOptions;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Stage the toolchain configuration, build the toolchain and link it.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "toolchain_bootstrap", version, about)]
pub struct Cli {
    /// Bootstrap root (default: located from the executable)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Settings file layered over <root>/bootstrap.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// OS identifier to use instead of the host's (e.g. linux, darwin, freebsd)
    #[arg(long, value_name = "ID")]
    pub os: Option<String>,

    /// Never wait for a keypress at the end
    #[arg(long)]
    pub non_interactive: bool,

    /// Do not take the workspace lock
    #[arg(long)]
    pub no_lock: bool,

    /// Write a JSON run report to this file, on success and on failure
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Increase console log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn console_level(&self) -> LevelFilter {
        console_level_for(self.verbose)
    }

    pub fn options(&self) -> BootstrapOptions {
        BootstrapOptions {
            os_identifier: self.os.clone(),
            root: self.root.clone(),
            config_path: self.config.clone(),
            use_lock: !self.no_lock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["toolchain_bootstrap"]).unwrap();
        assert!(!cli.non_interactive);
        assert_eq!(cli.console_level(), LevelFilter::Warn);
        let options = cli.options();
        assert!(options.use_lock);
        assert!(options.root.is_none());
    }

    #[test]
    fn test_flags_map_to_options() {
        let cli = Cli::try_parse_from([
            "toolchain_bootstrap",
            "--root",
            "/srv/checkout",
            "--config",
            "ci.toml",
            "--os",
            "FreeBSD",
            "--no-lock",
            "--non-interactive",
            "-vv",
        ])
        .unwrap();

        assert!(cli.non_interactive);
        assert_eq!(cli.console_level(), LevelFilter::Debug);
        let options = cli.options();
        assert_eq!(options.os_identifier.as_deref(), Some("FreeBSD"));
        assert_eq!(options.root, Some(PathBuf::from("/srv/checkout")));
        assert_eq!(options.config_path, Some(PathBuf::from("ci.toml")));
        assert!(!options.use_lock);
    }
}

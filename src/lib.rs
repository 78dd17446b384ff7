//! Toolchain Bootstrap
//!
//! Prepares a custom compiler toolchain checkout in one go: checks the host
//! platform and dependencies, stages the build configuration, runs the
//! toolchain's own build driver and links the result with the toolchain
//! manager.
//!
//! The system is organized into functional modules:
//! - **cli**: command-line surface
//! - **error**: error taxonomy and exit codes
//! - **models**: platform, invocation and report types
//! - **config**: layered TOML settings and validation
//! - **system**: process execution, self-location, manager probe, workspace lock
//! - **orchestrator**: the bootstrap pipeline and its phase machine
//! - **log_collector**: console echo and per-run session log
//! - **ui**: terminal status lines and the closing keypress pause

pub mod cli;
pub mod config;
pub mod error;
pub mod log_collector;
pub mod models;
pub mod orchestrator;
pub mod system;
pub mod ui;

pub use log;

pub use cli::Cli;
pub use config::BootstrapConfig;
pub use error::{BootstrapError, ConfigError, Result};
pub use log_collector::LogCollector;
pub use models::{CommandOutput, Invocation, Platform, RunReport};
pub use orchestrator::{BootstrapOptions, BootstrapPhase, Orchestrator};
pub use system::{CommandRunner, SystemRunner};

use anyhow::Context;
use std::path::Path;
use std::process::ExitCode;
use ui::Reporter;

/// Crate version, as reported by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Write the run report as pretty JSON.
pub fn write_report(path: &Path, report: &RunReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize run report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write run report to {}", path.display()))?;
    Ok(())
}

/// Run a full bootstrap for the parsed command line.
///
/// Installs logging, drives the pipeline on a current-thread runtime, prints
/// the outcome and maps it to the process exit code.
pub fn run(cli: Cli) -> ExitCode {
    let collector = log_collector::initialize(cli.console_level());
    let reporter = Reporter::stderr();
    log::info!("Toolchain Bootstrap v{}", VERSION);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            reporter.fail("Error", &format!("Failed to start async runtime: {}", e));
            return ExitCode::from(error::EXIT_ENVIRONMENT);
        }
    };

    let mut orchestrator = Orchestrator::new(SystemRunner::new(), cli.options(), reporter);
    let outcome = runtime.block_on(orchestrator.run());

    if let Some(path) = &cli.report {
        if let Err(e) = write_report(path, &orchestrator.report()) {
            log::warn!("{:#}", e);
        }
    }

    let code = match outcome {
        Ok(report) => {
            let platform = report
                .platform
                .as_ref()
                .map(|p| p.tag().to_string())
                .unwrap_or_default();
            let alias = orchestrator
                .context()
                .map(|ctx| ctx.config.toolchain_alias.clone())
                .unwrap_or_default();
            reporter.banner(&alias, &platform);
            if let Some(path) = &report.linked_toolchain {
                reporter.success("Linked", &path.display().to_string());
            }
            if ui::should_pause(cli.non_interactive) {
                ui::wait_for_keypress();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            reporter.fail("Failed", &e.to_string());
            if let Some(hint) = e.hint() {
                reporter.hint(&hint);
            }
            if let Some(path) = collector.session_log_path() {
                reporter.hint(&format!("Full log: {}", path.display()));
            }
            ExitCode::from(e.exit_code())
        }
    };

    log::logger().flush();
    code
}

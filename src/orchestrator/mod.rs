//! Bootstrap orchestration: the linear pipeline from platform detection to a
//! linked toolchain.
//!
//! **Architecture**:
//! - `state`: phase machine and run timing
//! - `phases`: filesystem steps (source check, config staging)
//! - `executor`: delegated build and toolchain linking
//!
//! Each step is a hard gate. The first failure is recorded in the state and
//! returned; nothing after it runs.

pub mod executor;
pub mod phases;
pub mod state;

use crate::config::loader::resolve_config;
use crate::config::{BootstrapConfig, SETTINGS_FILE_NAME};
use crate::error::BootstrapError;
use crate::models::{Platform, RunReport};
use crate::system::health::ManagerProbe;
use crate::system::lock::{LockError, WorkspaceLock};
use crate::system::paths::{ProjectRoot, RootMarkers};
use crate::system::{current_os_identifier, CommandRunner};
use crate::ui::Reporter;
use chrono::Utc;
use std::path::{Path, PathBuf};

pub use state::{BootstrapPhase, OrchestrationState};

/// Caller-supplied overrides for one run.
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// OS identifier to use instead of the running host's
    pub os_identifier: Option<String>,

    /// Root directory to use instead of self-location
    pub root: Option<PathBuf>,

    /// Extra settings file layered over `bootstrap.toml`
    pub config_path: Option<PathBuf>,

    /// Take the workspace lock before the first write
    pub use_lock: bool,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        BootstrapOptions {
            os_identifier: None,
            root: None,
            config_path: None,
            use_lock: true,
        }
    }
}

/// Everything later steps need once detection and self-location are done.
#[derive(Debug, Clone)]
pub struct BootstrapContext {
    pub platform: Platform,
    pub host_triple: &'static str,
    pub root: ProjectRoot,
    pub config: BootstrapConfig,
}

impl BootstrapContext {
    pub fn toolchain_dir(&self) -> PathBuf {
        self.config.toolchain_path(self.root.path())
    }

    pub fn stage_output(&self) -> PathBuf {
        self.config.stage_output(self.root.path(), self.host_triple)
    }
}

/// Drives one bootstrap run through an injected `CommandRunner`.
pub struct Orchestrator<R: CommandRunner> {
    runner: R,
    options: BootstrapOptions,
    reporter: Reporter,
    state: OrchestrationState,
    context: Option<BootstrapContext>,
    linked: Option<PathBuf>,
}

impl<R: CommandRunner> Orchestrator<R> {
    pub fn new(runner: R, options: BootstrapOptions, reporter: Reporter) -> Self {
        Orchestrator {
            runner,
            options,
            reporter,
            state: OrchestrationState::new(),
            context: None,
            linked: None,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn state(&self) -> &OrchestrationState {
        &self.state
    }

    /// Context of the run, once the root and configuration are resolved.
    pub fn context(&self) -> Option<&BootstrapContext> {
        self.context.as_ref()
    }

    /// Run the whole pipeline.
    ///
    /// On failure the state moves to `Failed(code)`; `report()` still
    /// describes the run.
    pub async fn run(&mut self) -> Result<RunReport, BootstrapError> {
        match self.execute().await {
            Ok(()) => Ok(self.report()),
            Err(e) => {
                log::error!("Bootstrap failed in phase {}: {}", self.state.phase.as_str(), e);
                self.state.record_error(e.to_string(), e.exit_code());
                Err(e)
            }
        }
    }

    /// Snapshot of the run for the JSON report.
    pub fn report(&self) -> RunReport {
        let exit_code = match self.state.phase {
            BootstrapPhase::Failed(code) => code,
            _ => 0,
        };
        RunReport {
            platform: self.state.platform.clone(),
            host_triple: self
                .state
                .platform
                .as_ref()
                .and_then(Platform::host_triple)
                .map(str::to_string),
            phase: self.state.phase,
            exit_code,
            error: self.state.error.clone(),
            linked_toolchain: self.linked.clone(),
            started_at: self.state.start_time,
            finished_at: Utc::now(),
        }
    }

    async fn execute(&mut self) -> Result<(), BootstrapError> {
        let (platform, host_triple) = self.detect_platform()?;
        let root = self.locate_root()?;
        let config = resolve_config(root.path(), self.options.config_path.as_deref())?;
        attach_session_log(&root.resolve_relative(&config.log_dir));

        let ctx = BootstrapContext {
            platform,
            host_triple,
            root,
            config,
        };
        self.context = Some(ctx.clone());
        self.advance(BootstrapPhase::CheckingDeps);

        self.check_dependencies(&ctx).await?;
        self.advance(BootstrapPhase::StagingConfig);

        let toolchain_dir = ctx.toolchain_dir();
        let _lock = self.acquire_lock(&toolchain_dir)?;

        self.reporter
            .step("Staging", &ctx.config.config_file.display().to_string());
        phases::stage_config(
            &ctx.config.config_source(ctx.root.path()),
            &ctx.config.config_destination(ctx.root.path()),
        )?;
        self.advance(BootstrapPhase::Building);

        let build = executor::build_invocation(&ctx.config, &toolchain_dir);
        self.reporter.step("Building", &build.display_line());
        executor::run_build(&self.runner, &build).await?;
        self.advance(BootstrapPhase::Linking);

        self.reporter.step("Linking", &ctx.config.toolchain_alias);
        let linked = executor::run_link(&self.runner, &ctx.config, &ctx.stage_output()).await?;
        self.linked = Some(linked);
        self.advance(BootstrapPhase::Done);

        Ok(())
    }

    /// Step 1. Nothing is touched before this passes.
    fn detect_platform(&mut self) -> Result<(Platform, &'static str), BootstrapError> {
        let identifier = self
            .options
            .os_identifier
            .clone()
            .unwrap_or_else(|| current_os_identifier().to_string());
        let platform = Platform::from_os_identifier(&identifier);

        let Some(host_triple) = platform.host_triple() else {
            return Err(BootstrapError::UnsupportedPlatform(identifier));
        };

        log::info!("Detected platform {} ({})", platform, host_triple);
        self.reporter
            .step("Detected", &format!("{} ({})", platform.tag(), host_triple));
        self.state.platform = Some(platform.clone());
        Ok((platform, host_triple))
    }

    /// Step 2.
    fn locate_root(&self) -> Result<ProjectRoot, BootstrapError> {
        match &self.options.root {
            Some(dir) => ProjectRoot::from_dir(dir),
            None => {
                let defaults = BootstrapConfig::default();
                ProjectRoot::from_current_exe(&RootMarkers {
                    settings_file: Path::new(SETTINGS_FILE_NAME),
                    config_file: &defaults.config_file,
                    toolchain_dir: &defaults.toolchain_dir,
                })
            }
        }
        .map_err(BootstrapError::SelfLocation)
    }

    /// Steps 3 and 4: source directory first, then the manager probe.
    async fn check_dependencies(&self, ctx: &BootstrapContext) -> Result<(), BootstrapError> {
        phases::verify_toolchain_source(&ctx.toolchain_dir(), &ctx.config.toolchain_dir)?;

        let probe = ManagerProbe {
            manager: &ctx.config.manager,
            args: &ctx.config.probe_args,
            marker: &ctx.config.probe_marker,
        };
        let result = probe.run(&self.runner).await;
        if !result.is_available() {
            return Err(BootstrapError::MissingDependency {
                tool: ctx.config.manager.clone(),
                reason: result.reason(&ctx.config.probe_marker),
            });
        }

        self.reporter.step("Found", &ctx.config.manager);
        Ok(())
    }

    fn acquire_lock(&self, toolchain_dir: &Path) -> Result<Option<WorkspaceLock>, BootstrapError> {
        if !self.options.use_lock {
            log::warn!("Workspace lock disabled; concurrent runs are not detected");
            return Ok(None);
        }
        match WorkspaceLock::acquire(toolchain_dir) {
            Ok(lock) => Ok(Some(lock)),
            Err(LockError::Held(lock_path)) => Err(BootstrapError::WorkspaceLocked { lock_path }),
            Err(LockError::Io(source)) => Err(BootstrapError::StagingFailed {
                path: WorkspaceLock::lock_path_for(toolchain_dir),
                source,
            }),
        }
    }

    fn advance(&mut self, next: BootstrapPhase) {
        if let Err(e) = self.state.transition_to(next) {
            log::error!("{}", e);
        }
    }
}

fn attach_session_log(log_dir: &Path) {
    let Some(collector) = crate::log_collector::global() else {
        return;
    };
    match collector.start_new_session(log_dir) {
        Ok(path) => log::info!("Session log: {}", path.display()),
        Err(e) => log::warn!("Continuing without a session log: {}", e),
    }
}

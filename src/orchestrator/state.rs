//! Bootstrap State Management and Phase Tracking
//!
//! **Architecture**:
//! - `BootstrapPhase`: discrete states of the linear pipeline
//! - `OrchestrationState`: current phase, detected platform and timing
//! - Transitions only move forward; any non-terminal phase may fail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Platform;

/// Bootstrap phase enumeration - discrete states in the run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BootstrapPhase {
    /// Platform detection and self-location
    Detecting,

    /// Toolchain source directory check and manager probe
    CheckingDeps,

    /// Copying the configuration file into the toolchain directory
    StagingConfig,

    /// Build driver running
    Building,

    /// Registering the stage output with the toolchain manager
    Linking,

    /// Toolchain built and linked
    Done,

    /// Halted with the given exit code
    Failed(u8),
}

impl BootstrapPhase {
    /// Get the human-readable name for this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            BootstrapPhase::Detecting => "detecting",
            BootstrapPhase::CheckingDeps => "checking-deps",
            BootstrapPhase::StagingConfig => "staging-config",
            BootstrapPhase::Building => "building",
            BootstrapPhase::Linking => "linking",
            BootstrapPhase::Done => "done",
            BootstrapPhase::Failed(_) => "failed",
        }
    }

    /// The phase that follows on success, `None` for terminal phases.
    pub fn next(&self) -> Option<BootstrapPhase> {
        match self {
            BootstrapPhase::Detecting => Some(BootstrapPhase::CheckingDeps),
            BootstrapPhase::CheckingDeps => Some(BootstrapPhase::StagingConfig),
            BootstrapPhase::StagingConfig => Some(BootstrapPhase::Building),
            BootstrapPhase::Building => Some(BootstrapPhase::Linking),
            BootstrapPhase::Linking => Some(BootstrapPhase::Done),
            BootstrapPhase::Done | BootstrapPhase::Failed(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BootstrapPhase::Done | BootstrapPhase::Failed(_))
    }

    /// Check if a transition to the given phase is valid.
    pub fn can_transition_to(&self, next: BootstrapPhase) -> bool {
        match next {
            BootstrapPhase::Failed(_) => !self.is_terminal(),
            other => self.next() == Some(other),
        }
    }
}

/// Run state snapshot for tracking progress and reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationState {
    /// Current phase
    pub phase: BootstrapPhase,

    /// Platform, once detected
    pub platform: Option<Platform>,

    /// Run start timestamp
    pub start_time: DateTime<Utc>,

    /// Last phase update timestamp
    pub last_update_time: DateTime<Utc>,

    /// Error message if the run failed
    pub error: Option<String>,
}

impl Default for OrchestrationState {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestrationState {
    pub fn new() -> Self {
        let now = Utc::now();
        OrchestrationState {
            phase: BootstrapPhase::Detecting,
            platform: None,
            start_time: now,
            last_update_time: now,
            error: None,
        }
    }

    /// Attempt to transition to the next phase.
    pub fn transition_to(&mut self, next_phase: BootstrapPhase) -> Result<(), String> {
        if !self.phase.can_transition_to(next_phase) {
            return Err(format!(
                "Invalid phase transition: {} -> {}",
                self.phase.as_str(),
                next_phase.as_str()
            ));
        }
        log::debug!(
            "Phase {} -> {}",
            self.phase.as_str(),
            next_phase.as_str()
        );
        self.phase = next_phase;
        self.last_update_time = Utc::now();
        Ok(())
    }

    /// Record an error and mark the run as failed.
    ///
    /// A run that is already terminal keeps its phase.
    pub fn record_error(&mut self, error: String, exit_code: u8) {
        if !self.phase.is_terminal() {
            self.phase = BootstrapPhase::Failed(exit_code);
        }
        self.error = Some(error);
        self.last_update_time = Utc::now();
    }
}

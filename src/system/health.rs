/// Toolchain manager probe
///
/// Runs the manager's status command and checks its output for a marker
/// substring. The probe is silent; the orchestrator decides what to report.

use crate::models::{CommandOutput, Invocation};
use crate::system::CommandRunner;
use serde::{Deserialize, Serialize};

/// Outcome of probing the toolchain manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeResult {
    /// Marker found in the status output
    Available,
    /// Manager could not be started at all
    NotInstalled(String),
    /// Manager ran but its output lacked the marker
    MarkerMissing { exit_code: Option<i32> },
}

impl ProbeResult {
    pub fn is_available(&self) -> bool {
        matches!(self, ProbeResult::Available)
    }

    /// Reason text for a failed probe.
    pub fn reason(&self, marker: &str) -> String {
        match self {
            ProbeResult::Available => "available".to_string(),
            ProbeResult::NotInstalled(err) => format!("could not be started ({})", err),
            ProbeResult::MarkerMissing { exit_code } => format!(
                "status output does not contain '{}' (exit code {})",
                marker,
                exit_code.map_or_else(|| "none".to_string(), |c| c.to_string())
            ),
        }
    }
}

/// Probe for the toolchain manager
pub struct ManagerProbe<'a> {
    pub manager: &'a str,
    pub args: &'a [String],
    pub marker: &'a str,
}

impl<'a> ManagerProbe<'a> {
    pub fn invocation(&self) -> Invocation {
        Invocation::new(self.manager).args(self.args.iter().cloned())
    }

    /// Check captured output for the marker. Both streams are searched.
    pub fn evaluate(&self, output: &CommandOutput) -> ProbeResult {
        if output.stdout.contains(self.marker) || output.stderr.contains(self.marker) {
            ProbeResult::Available
        } else {
            ProbeResult::MarkerMissing {
                exit_code: output.code,
            }
        }
    }

    /// Run the status command through `runner` and evaluate it.
    pub async fn run<R: CommandRunner + ?Sized>(&self, runner: &R) -> ProbeResult {
        let invocation = self.invocation();
        match runner.capture(&invocation).await {
            Ok(output) => {
                let result = self.evaluate(&output);
                log::debug!(
                    "Probe '{}' -> {:?}",
                    invocation.display_line(),
                    result
                );
                result
            }
            Err(e) => {
                log::debug!("Probe '{}' failed to start: {}", invocation.display_line(), e);
                ProbeResult::NotInstalled(e.to_string())
            }
        }
    }
}

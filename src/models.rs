//! Core data types for Toolchain Bootstrap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::orchestrator::state::BootstrapPhase;

/// Host platform selected from the OS identifier.
///
/// Only x86-64 hosts are distinguished; anything unrecognized is carried
/// verbatim in `Unsupported` so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    LinuxX64,
    MacosX64,
    FreebsdX64,
    Unsupported(String),
}

impl Platform {
    /// Map an OS identifier to a platform.
    ///
    /// Accepts both `uname -s` spellings ("Linux", "Darwin", "FreeBSD") and
    /// `std::env::consts::OS` spellings ("linux", "macos", "freebsd"), as well
    /// as shell `OSTYPE` values such as "linux-gnu" or "darwin23".
    pub fn from_os_identifier(identifier: &str) -> Self {
        let normalized = identifier.trim().to_ascii_lowercase();

        if normalized == "linux" || normalized.starts_with("linux-gnu") {
            Platform::LinuxX64
        } else if normalized == "macos" || normalized.starts_with("darwin") {
            Platform::MacosX64
        } else if normalized.starts_with("freebsd") {
            Platform::FreebsdX64
        } else {
            Platform::Unsupported(identifier.to_string())
        }
    }

    /// Short platform tag, e.g. `linux-x64`.
    pub fn tag(&self) -> &str {
        match self {
            Platform::LinuxX64 => "linux-x64",
            Platform::MacosX64 => "macos-x64",
            Platform::FreebsdX64 => "freebsd-x64",
            Platform::Unsupported(_) => "unsupported",
        }
    }

    /// Host triple naming the build output directory, `None` when unsupported.
    pub fn host_triple(&self) -> Option<&'static str> {
        match self {
            Platform::LinuxX64 => Some("x86_64-unknown-linux-gnu"),
            Platform::MacosX64 => Some("x86_64-apple-darwin"),
            Platform::FreebsdX64 => Some("x86_64-unknown-freebsd"),
            Platform::Unsupported(_) => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Unsupported(_))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Unsupported(id) => write!(f, "unsupported ({})", id),
            other => f.write_str(other.tag()),
        }
    }
}

/// External command line with its working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Invocation {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Shell-like rendering for logs and status lines.
    pub fn display_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Captured result of a completed process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Machine-readable summary of one bootstrap run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub platform: Option<Platform>,
    pub host_triple: Option<String>,
    pub phase: BootstrapPhase,
    pub exit_code: u8,
    pub error: Option<String>,
    /// Path registered with the toolchain manager, once linked
    pub linked_toolchain: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

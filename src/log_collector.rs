//! Logging pipeline for bootstrap runs.
//!
//! # Architecture
//!
//! ```text
//! log::info!() / log::debug!(target: "build") ...
//!     |
//! [LogCollector] (global `log::Log`)
//!     |
//! +---+----------------+
//! |                    |
//! v                    v
//! stderr echo          session file
//! (console level,      <root>/<log_dir>/bootstrap-<ts>.log
//!  no build output)    (debug and above, once attached)
//! ```
//!
//! The session file is attached only after the root is resolved, so a run
//! rejected at platform detection leaves nothing on disk.

use crate::system::BUILD_LOG_TARGET;
use chrono::Local;
use console::{style, Term};
use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

static GLOBAL: OnceCell<LogCollector> = OnceCell::new();

/// Session file name for a run started now.
pub fn session_file_name() -> String {
    format!("bootstrap-{}.log", Local::now().format("%Y%m%d-%H%M%S"))
}

/// Console verbosity for the number of `-v` flags.
pub fn console_level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

#[derive(Debug, Default)]
struct SessionState {
    path: Option<PathBuf>,
    file: Option<File>,
}

/// `log::Log` implementation echoing to stderr and persisting to a session file.
///
/// Clones share the session, so the handle kept in the global slot and the
/// boxed logger handed to `log` write to the same file.
#[derive(Clone)]
pub struct LogCollector {
    console_level: LevelFilter,
    colors: bool,
    session: Arc<Mutex<SessionState>>,
}

impl LogCollector {
    pub fn new(console_level: LevelFilter) -> Self {
        LogCollector {
            console_level,
            colors: Term::stderr().is_term(),
            session: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    /// Start persisting to a fresh session file under `log_dir`.
    ///
    /// Replaces any previous session. Returns the new file's path.
    pub fn start_new_session(&self, log_dir: &Path) -> Result<PathBuf, String> {
        std::fs::create_dir_all(log_dir)
            .map_err(|e| format!("Failed to create log directory {}: {}", log_dir.display(), e))?;

        let path = log_dir.join(session_file_name());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| format!("Failed to open session log {}: {}", path.display(), e))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Failed to lock session state: {}", e))?;
        session.path = Some(path.clone());
        session.file = Some(file);
        Ok(path)
    }

    /// Path of the current session file, if one is attached.
    pub fn session_log_path(&self) -> Option<PathBuf> {
        self.session
            .lock()
            .ok()
            .and_then(|session| session.path.clone())
    }

    fn echoes(&self, record: &Record) -> bool {
        record.level() <= self.console_level && record.target() != BUILD_LOG_TARGET
    }

    fn echo(&self, record: &Record) {
        let label = format!("[{}]", record.level());
        let label = if self.colors {
            let styled = match record.level() {
                Level::Error => style(label).red().bold(),
                Level::Warn => style(label).yellow().bold(),
                Level::Info => style(label).cyan(),
                Level::Debug | Level::Trace => style(label).dim(),
            };
            styled.to_string()
        } else {
            label
        };
        let _ = writeln!(io::stderr().lock(), "{} {}", label, record.args());
    }

    fn persist(&self, record: &Record) {
        let Ok(mut session) = self.session.lock() else {
            return;
        };
        if let Some(file) = session.file.as_mut() {
            let _ = writeln!(
                file,
                "[{}] [{}] [{}] {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }
}

impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if self.echoes(record) {
            self.echo(record);
        }
        self.persist(record);
    }

    fn flush(&self) {
        if let Ok(mut session) = self.session.lock() {
            if let Some(file) = session.file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Install the collector as the global logger.
///
/// A second call keeps the first collector.
pub fn initialize(console_level: LevelFilter) -> &'static LogCollector {
    GLOBAL.get_or_init(|| {
        let collector = LogCollector::new(console_level);
        match log::set_boxed_logger(Box::new(collector.clone())) {
            Ok(()) => log::set_max_level(LevelFilter::Debug),
            Err(e) => {
                let _ = writeln!(io::stderr(), "Failed to install logger: {}", e);
            }
        }
        collector
    })
}

/// The global collector, if `initialize` ran.
pub fn global() -> Option<&'static LogCollector> {
    GLOBAL.get()
}

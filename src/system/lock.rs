/// Workspace lock: refuse concurrent runs against one toolchain directory

use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Suffix of the lock file kept next to the toolchain directory.
pub const LOCK_FILE_SUFFIX: &str = "bootstrap.lock";

/// Held lock; the file is removed on drop.
#[derive(Debug)]
pub struct WorkspaceLock {
    path: PathBuf,
}

/// Outcome of a lock attempt.
#[derive(Debug)]
pub enum LockError {
    /// Another run created the lock file first
    Held(PathBuf),
    Io(io::Error),
}

impl WorkspaceLock {
    /// Lock file guarding `toolchain_dir`: `.<name>.bootstrap.lock` in its
    /// parent, never inside the checkout itself.
    pub fn lock_path_for(toolchain_dir: &Path) -> PathBuf {
        let name = toolchain_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "toolchain".to_string());
        let parent = toolchain_dir.parent().unwrap_or(toolchain_dir);
        parent.join(format!(".{}.{}", name, LOCK_FILE_SUFFIX))
    }

    /// Atomically create the lock file for `toolchain_dir`.
    pub fn acquire(toolchain_dir: &Path) -> Result<Self, LockError> {
        let path = Self::lock_path_for(toolchain_dir);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(LockError::Held(path));
            }
            Err(e) => return Err(LockError::Io(e)),
        };

        // Contents are informational; a failed write still leaves a valid lock.
        let _ = writeln!(file, "pid={}", std::process::id());
        let _ = writeln!(file, "acquired={}", Utc::now().to_rfc3339());

        log::debug!("Acquired workspace lock {}", path.display());
        Ok(WorkspaceLock { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkspaceLock {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Released workspace lock {}", self.path.display()),
            Err(e) => log::warn!(
                "Could not remove workspace lock {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

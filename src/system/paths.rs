/// Self-location: resolving the bootstrap root from the running binary
///
/// The root is the nearest directory that looks like a bootstrap checkout. It
/// is found by walking upward from the executable's own directory, so it never
/// depends on the caller's working directory.

use std::path::{Path, PathBuf};

/// Files that mark a directory as a bootstrap root.
///
/// The settings file alone is enough. The configuration file to stage is a
/// common name (cargo keeps one in its home directory), so it only counts
/// next to the toolchain source directory.
#[derive(Clone, Copy, Debug)]
pub struct RootMarkers<'a> {
    pub settings_file: &'a Path,
    pub config_file: &'a Path,
    pub toolchain_dir: &'a Path,
}

impl RootMarkers<'_> {
    pub fn matches(&self, dir: &Path) -> bool {
        dir.join(self.settings_file).is_file()
            || (dir.join(self.config_file).is_file() && dir.join(self.toolchain_dir).is_dir())
    }
}

/// Canonical bootstrap root.
#[derive(Clone, Debug)]
pub struct ProjectRoot {
    root: PathBuf,
}

impl ProjectRoot {
    /// Resolve the root from the running executable.
    ///
    /// Walks upward from the executable's directory until a directory matching
    /// `markers` is found. Without a match, the executable's own directory is
    /// the root.
    pub fn from_current_exe(markers: &RootMarkers) -> Result<Self, String> {
        let exe = std::env::current_exe()
            .map_err(|e| format!("Failed to resolve running executable: {}", e))?;
        let exe = exe
            .canonicalize()
            .map_err(|e| format!("Failed to canonicalize {}: {}", exe.display(), e))?;
        let start = exe
            .parent()
            .ok_or_else(|| format!("Executable has no parent directory: {}", exe.display()))?;

        let root = Self::find_root(start, markers).unwrap_or_else(|| {
            log::debug!(
                "No bootstrap root above {}, using executable directory",
                start.display()
            );
            start.to_path_buf()
        });

        log::info!("Bootstrap root: {}", root.display());
        Ok(ProjectRoot { root })
    }

    /// Use an explicit directory as the root.
    pub fn from_dir(dir: &Path) -> Result<Self, String> {
        let root = dir
            .canonicalize()
            .map_err(|e| format!("Failed to canonicalize root {}: {}", dir.display(), e))?;
        if !root.is_dir() {
            return Err(format!("Root is not a directory: {}", root.display()));
        }

        log::info!("Bootstrap root (override): {}", root.display());
        Ok(ProjectRoot { root })
    }

    /// Nearest ancestor of `start` (inclusive) matching `markers`.
    pub fn find_root(start: &Path, markers: &RootMarkers) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| markers.matches(dir))
            .map(Path::to_path_buf)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path against the root
    pub fn resolve_relative(&self, relative_path: &Path) -> PathBuf {
        self.root.join(relative_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn markers() -> RootMarkers<'static> {
        RootMarkers {
            settings_file: Path::new("bootstrap.toml"),
            config_file: Path::new("config.toml"),
            toolchain_dir: Path::new("rust"),
        }
    }

    #[test]
    fn test_find_root_walks_upward() {
        let temp = tempdir().expect("Failed to create temp dir");
        let root = temp.path().join("checkout");
        let nested = root.join("target").join("release");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir(root.join("rust")).unwrap();
        fs::write(root.join("config.toml"), "").unwrap();

        assert_eq!(ProjectRoot::find_root(&nested, &markers()), Some(root));
    }

    #[test]
    fn test_settings_file_alone_marks_root() {
        let temp = tempdir().expect("Failed to create temp dir");
        let root = temp.path().join("checkout");
        let bin = root.join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(root.join("bootstrap.toml"), "").unwrap();

        assert_eq!(ProjectRoot::find_root(&bin, &markers()), Some(root));
    }

    #[test]
    fn test_cargo_home_config_is_not_a_root() {
        // Installed with `cargo install`: ~/.cargo/bin/<exe> beside ~/.cargo/config.toml
        let temp = tempdir().expect("Failed to create temp dir");
        let cargo_home = temp.path().join(".cargo");
        let bin = cargo_home.join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(cargo_home.join("config.toml"), "[build]\njobs = 4\n").unwrap();

        let found = ProjectRoot::find_root(&bin, &markers());
        assert_ne!(found.as_deref(), Some(cargo_home.as_path()));
    }

    #[test]
    fn test_find_root_ignores_directories_named_like_markers() {
        let temp = tempdir().expect("Failed to create temp dir");
        let nested = temp.path().join("bootstrap.toml").join("inner");
        fs::create_dir_all(&nested).unwrap();

        let found = ProjectRoot::find_root(&nested, &markers());
        assert_ne!(found.as_deref(), Some(temp.path()));
    }

    #[test]
    fn test_nearest_root_wins() {
        let temp = tempdir().expect("Failed to create temp dir");
        let outer = temp.path().join("outer");
        let inner = outer.join("inner");
        let bin = inner.join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::create_dir(outer.join("rust")).unwrap();
        fs::write(outer.join("config.toml"), "").unwrap();
        fs::write(inner.join("bootstrap.toml"), "").unwrap();

        assert_eq!(ProjectRoot::find_root(&bin, &markers()), Some(inner));
    }

    #[test]
    fn test_from_dir_canonicalizes() {
        let temp = tempdir().expect("Failed to create temp dir");
        let root = ProjectRoot::from_dir(temp.path()).expect("root should resolve");
        assert_eq!(root.path(), temp.path().canonicalize().unwrap());
        assert_eq!(
            root.resolve_relative(Path::new("rust")),
            root.path().join("rust")
        );
    }

    #[test]
    fn test_from_dir_missing_fails() {
        let temp = tempdir().expect("Failed to create temp dir");
        assert!(ProjectRoot::from_dir(&temp.path().join("absent")).is_err());
    }

    #[test]
    fn test_from_current_exe_is_absolute() {
        let root = ProjectRoot::from_current_exe(&markers())
            .expect("test binary location should resolve");
        assert!(root.path().is_absolute());
    }
}

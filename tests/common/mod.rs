//! Shared fixtures for integration tests: a bootstrap root on disk and a
//! recording `CommandRunner` that never starts real processes.

#![allow(dead_code)]

use futures::future::BoxFuture;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use toolchain_bootstrap::system::lock::WorkspaceLock;
use toolchain_bootstrap::{BootstrapOptions, CommandOutput, CommandRunner, Invocation};

pub const STATUS_OUTPUT: &str = "Default host: x86_64-unknown-linux-gnu\nrustup home:  /home/dev/.rustup\n";

/// What the fake manager and build driver do when invoked.
#[derive(Debug, Clone)]
pub struct Script {
    /// `None` makes the manager binary missing
    pub probe: Option<CommandOutput>,
    /// Build driver exit code; `None` means it cannot be spawned
    pub build_code: Option<i32>,
    /// Create the stage output directory while "building"
    pub build_creates: Option<PathBuf>,
    pub link: CommandOutput,
}

impl Default for Script {
    fn default() -> Self {
        Script {
            probe: Some(CommandOutput {
                code: Some(0),
                stdout: STATUS_OUTPUT.to_string(),
                stderr: String::new(),
            }),
            build_code: Some(0),
            build_creates: None,
            link: CommandOutput {
                code: Some(0),
                ..CommandOutput::default()
            },
        }
    }
}

/// Records every invocation and answers from a `Script`.
pub struct MockRunner {
    pub script: Script,
    calls: Mutex<Vec<Invocation>>,
}

impl MockRunner {
    pub fn new(script: Script) -> Self {
        MockRunner {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|inv| inv.program).collect()
    }

    fn record(&self, invocation: &Invocation) {
        self.calls.lock().unwrap().push(invocation.clone());
    }
}

impl CommandRunner for MockRunner {
    fn capture<'a>(&'a self, invocation: &'a Invocation) -> BoxFuture<'a, io::Result<CommandOutput>> {
        Box::pin(async move {
            self.record(invocation);
            let is_link = invocation.args.first().map(String::as_str) == Some("toolchain");
            if is_link {
                return Ok(self.script.link.clone());
            }
            self.script
                .probe
                .clone()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No such file or directory"))
        })
    }

    fn stream<'a>(&'a self, invocation: &'a Invocation) -> BoxFuture<'a, io::Result<CommandOutput>> {
        Box::pin(async move {
            self.record(invocation);
            let Some(code) = self.script.build_code else {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "not executable"));
            };
            if let Some(dir) = &self.script.build_creates {
                fs::create_dir_all(dir)?;
            }
            Ok(CommandOutput {
                code: Some(code),
                ..CommandOutput::default()
            })
        })
    }
}

/// A bootstrap root with a populated toolchain checkout and a config file.
pub struct Fixture {
    pub temp: TempDir,
    root: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp.path().join("rust")).unwrap();
        fs::write(temp.path().join("rust").join("x.py"), "#!/usr/bin/env python3\n").unwrap();
        fs::write(temp.path().join("config.toml"), "profile = \"compiler\"\n").unwrap();
        let root = temp.path().canonicalize().unwrap();
        Fixture { temp, root }
    }

    /// Canonical root, as the orchestrator resolves it.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn toolchain(&self) -> PathBuf {
        self.root().join("rust")
    }

    pub fn lock_file(&self) -> PathBuf {
        WorkspaceLock::lock_path_for(&self.toolchain())
    }

    pub fn staged_config(&self) -> PathBuf {
        self.toolchain().join("config.toml")
    }

    pub fn stage_output(&self, triple: &str) -> PathBuf {
        self.toolchain().join("build").join(triple).join("stage2")
    }

    pub fn options(&self, os: &str) -> BootstrapOptions {
        BootstrapOptions {
            os_identifier: Some(os.to_string()),
            root: Some(self.root().to_path_buf()),
            config_path: None,
            use_lock: true,
        }
    }

    /// Every file under the root, relative to it, sorted.
    pub fn snapshot(&self) -> Vec<PathBuf> {
        fn walk(dir: &Path, base: &Path, out: &mut Vec<PathBuf>) {
            for entry in fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                out.push(path.strip_prefix(base).unwrap().to_path_buf());
                if path.is_dir() {
                    walk(&path, base, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(self.root(), self.root(), &mut out);
        out.sort();
        out
    }
}

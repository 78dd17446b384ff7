/// System module: OS detection and external process execution
///
/// Every external command (probe, build driver, link) goes through the
/// `CommandRunner` seam so the orchestrator can be driven by a recording
/// runner in tests.

pub mod health;
pub mod lock;
pub mod paths;

use crate::models::{CommandOutput, Invocation};
use futures::future::BoxFuture;
use std::io::{self, Write};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Log target for build driver output lines.
///
/// Records under this target reach the session log only; the runner already
/// echoes the lines to the terminal.
pub const BUILD_LOG_TARGET: &str = "build";

/// OS identifier of the running host (`std::env::consts::OS`).
pub fn current_os_identifier() -> &'static str {
    std::env::consts::OS
}

/// Executes external commands on behalf of the orchestrator.
pub trait CommandRunner: Send + Sync {
    /// Run to completion and capture stdout/stderr.
    fn capture<'a>(&'a self, invocation: &'a Invocation)
        -> BoxFuture<'a, io::Result<CommandOutput>>;

    /// Run to completion, streaming output to the terminal and the build log.
    ///
    /// The returned output carries only the exit code.
    fn stream<'a>(&'a self, invocation: &'a Invocation) -> BoxFuture<'a, io::Result<CommandOutput>>;
}

/// Production runner backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner
    }

    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd.kill_on_drop(true);
        cmd
    }
}

impl CommandRunner for SystemRunner {
    fn capture<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> BoxFuture<'a, io::Result<CommandOutput>> {
        Box::pin(async move {
            log::debug!("Running: {}", invocation.display_line());
            let output = Self::command(invocation).output().await?;
            Ok(CommandOutput {
                code: exit_code_of(output.status),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }

    fn stream<'a>(&'a self, invocation: &'a Invocation) -> BoxFuture<'a, io::Result<CommandOutput>> {
        Box::pin(async move {
            log::debug!("Streaming: {}", invocation.display_line());
            let mut child = Self::command(invocation)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()?;

            let stdout = child.stdout.take();
            let stderr = child.stderr.take();

            let (out_result, err_result) = tokio::join!(
                async {
                    match stdout {
                        Some(pipe) => {
                            pump_lines(pipe, |line| EchoTarget::Stdout.write_line(line)).await
                        }
                        None => Ok(0),
                    }
                },
                async {
                    match stderr {
                        Some(pipe) => {
                            pump_lines(pipe, |line| EchoTarget::Stderr.write_line(line)).await
                        }
                        None => Ok(0),
                    }
                }
            );
            out_result?;
            err_result?;

            let status = child.wait().await?;
            Ok(CommandOutput {
                code: exit_code_of(status),
                ..CommandOutput::default()
            })
        })
    }
}

/// Terminal stream a child pipe is echoed to.
#[derive(Debug, Clone, Copy)]
enum EchoTarget {
    Stdout,
    Stderr,
}

impl EchoTarget {
    /// Write one line without holding the lock across an await point.
    fn write_line(self, line: &[u8]) -> io::Result<()> {
        match self {
            EchoTarget::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(line)?;
                out.write_all(b"\n")?;
                out.flush()
            }
            EchoTarget::Stderr => {
                let mut err = io::stderr().lock();
                err.write_all(line)?;
                err.write_all(b"\n")
            }
        }
    }
}

/// Copy a child pipe line by line to `echo` and the build log.
///
/// Lines are decoded lossily; compiler output is not guaranteed to be UTF-8.
/// After the first failed echo (a closed terminal or pipe) echoing stops, but
/// the pipe is still drained and logged so the child never blocks on a full
/// pipe. Returns the number of lines read.
async fn pump_lines<R, F>(reader: R, mut echo: F) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
    F: FnMut(&[u8]) -> io::Result<()>,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut echoing = true;
    let mut lines = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(lines);
        }
        lines += 1;
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\r', '\n']);
        if echoing {
            if let Err(e) = echo(line.as_bytes()) {
                log::debug!("Build output echo stopped: {}", e);
                echoing = false;
            }
        }
        log::debug!(target: BUILD_LOG_TARGET, "{}", line);
    }
}

/// Exit code following the shell convention: signals become `128 + signal`.
fn exit_code_of(status: ExitStatus) -> Option<i32> {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status.code().or_else(|| status.signal().map(|sig| 128 + sig))
    }
    #[cfg(not(unix))]
    {
        status.code()
    }
}

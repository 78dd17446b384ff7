//! Phase execution: delegated build and toolchain linking.
//!
//! The build driver's output is streamed, never parsed; only its exit code
//! decides the outcome.

use crate::config::BootstrapConfig;
use crate::error::BootstrapError;
use crate::models::Invocation;
use crate::system::CommandRunner;
use std::path::{Path, PathBuf};

/// Build driver command line, run inside the toolchain directory.
///
/// With the default settings this is `<dir>/x.py build --stage 2`.
pub fn build_invocation(config: &BootstrapConfig, toolchain_dir: &Path) -> Invocation {
    Invocation::new(
        toolchain_dir
            .join(&config.build_driver)
            .to_string_lossy()
            .into_owned(),
    )
    .arg(config.build_target.as_str())
    .arg("--stage")
    .arg(config.stage.to_string())
    .current_dir(toolchain_dir)
}

/// Run the build driver and wait for it to exit.
///
/// # Returns
/// * `Ok(())` on exit code 0
/// * `Err(BootstrapError::BuildFailed)` carrying the driver's exit code
/// * `Err(BootstrapError::Spawn)` if the driver cannot be started
pub async fn run_build<R>(runner: &R, invocation: &Invocation) -> Result<(), BootstrapError>
where
    R: CommandRunner + ?Sized,
{
    log::info!("Starting build: {}", invocation.display_line());

    let output = runner
        .stream(invocation)
        .await
        .map_err(|e| BootstrapError::Spawn {
            program: invocation.program.clone(),
            source: e,
        })?;

    match output.code {
        Some(0) => {
            log::info!("Build finished successfully");
            Ok(())
        }
        Some(code) => {
            log::error!("Build driver exited with code {}", code);
            Err(BootstrapError::BuildFailed { code })
        }
        None => {
            log::error!("Build driver exited without a status code");
            Err(BootstrapError::BuildFailed { code: 1 })
        }
    }
}

/// Manager command registering `stage_output` under the configured alias.
pub fn link_invocation(config: &BootstrapConfig, stage_output: &Path) -> Invocation {
    Invocation::new(config.manager.as_str())
        .args(["toolchain", "link"])
        .arg(config.toolchain_alias.as_str())
        .arg(stage_output.to_string_lossy().into_owned())
}

/// Link the freshly built stage output with the toolchain manager.
///
/// Returns the linked path. Failures are reported once and not retried.
pub async fn run_link<R>(
    runner: &R,
    config: &BootstrapConfig,
    stage_output: &Path,
) -> Result<PathBuf, BootstrapError>
where
    R: CommandRunner + ?Sized,
{
    let link_failed = |reason: String| BootstrapError::LinkFailed {
        alias: config.toolchain_alias.clone(),
        reason,
    };

    if !stage_output.is_dir() {
        return Err(link_failed(format!(
            "build output not found at {}",
            stage_output.display()
        )));
    }

    let invocation = link_invocation(config, stage_output);
    log::info!("Linking toolchain: {}", invocation.display_line());

    let output = runner
        .capture(&invocation)
        .await
        .map_err(|e| link_failed(format!("could not start '{}': {}", config.manager, e)))?;

    if !output.success() {
        let detail = output
            .stderr
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| match output.code {
                Some(code) => format!("exit code {}", code),
                None => "terminated without exit code".to_string(),
            });
        return Err(link_failed(detail));
    }

    log::info!(
        "Linked '{}' -> {}",
        config.toolchain_alias,
        stage_output.display()
    );
    Ok(stage_output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_invocation_defaults() {
        let config = BootstrapConfig::default();
        let inv = build_invocation(&config, Path::new("/work/rust"));
        assert_eq!(inv.program, "/work/rust/x.py");
        assert_eq!(inv.args, vec!["build", "--stage", "2"]);
        assert_eq!(inv.cwd.as_deref(), Some(Path::new("/work/rust")));
    }

    #[test]
    fn test_link_invocation_defaults() {
        let config = BootstrapConfig::default();
        let output = Path::new("/work/rust/build/x86_64-unknown-linux-gnu/stage2");
        let inv = link_invocation(&config, output);
        assert_eq!(
            inv.display_line(),
            "rustup toolchain link stage2 /work/rust/build/x86_64-unknown-linux-gnu/stage2"
        );
        assert!(inv.cwd.is_none());
    }
}

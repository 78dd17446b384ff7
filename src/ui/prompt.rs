//! Closing keypress pause.
//!
//! Waiting only makes sense when a person is watching: never under CI, never
//! with `--non-interactive`, never when stdout is not a terminal.

use console::Term;

/// Environment variable that marks an unattended CI run.
pub const CI_ENV_VAR: &str = "CI";

/// Decide from explicit inputs whether to pause.
pub fn pause_requested(non_interactive: bool, ci_set: bool, attended: bool) -> bool {
    !non_interactive && !ci_set && attended
}

/// Decide for the current process.
pub fn should_pause(non_interactive: bool) -> bool {
    pause_requested(
        non_interactive,
        std::env::var_os(CI_ENV_VAR).is_some(),
        console::user_attended(),
    )
}

/// Block until one key is pressed. Read errors end the wait.
pub fn wait_for_keypress() {
    let term = Term::stdout();
    if term.write_line("Press any key to exit...").is_err() {
        return;
    }
    if let Err(e) = term.read_key() {
        log::debug!("Keypress wait ended: {}", e);
    }
}

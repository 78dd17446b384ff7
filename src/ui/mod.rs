//! Terminal user interface: status lines and the closing keypress pause.
//!
//! - **status**: labeled, colored progress and failure lines on stderr
//! - **prompt**: deciding whether to wait for a keypress, and waiting

pub mod prompt;
pub mod status;

pub use prompt::{should_pause, wait_for_keypress};
pub use status::Reporter;

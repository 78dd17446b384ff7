//! Labeled status lines.
//!
//! Labels are right-aligned and colored when stderr is a terminal, so piped
//! output stays plain text.

use console::{style, Color, Term};
use std::io::{self, Write};

const LABEL_WIDTH: usize = 12;

fn format_label(label: &str, color: Color, is_tty: bool) -> String {
    let padded = format!("{:>width$}", label, width = LABEL_WIDTH);
    if is_tty {
        style(padded).bold().fg(color).to_string()
    } else {
        padded
    }
}

fn write_labeled(
    w: &mut dyn Write,
    label: &str,
    color: Color,
    msg: &str,
    is_tty: bool,
) -> io::Result<()> {
    let label = format_label(label, color, is_tty);
    if msg.is_empty() {
        writeln!(w, "{label}")
    } else {
        writeln!(w, "{label} {msg}")
    }
}

/// Writes pipeline status to stderr.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    is_tty: bool,
    quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::stderr()
    }
}

impl Reporter {
    /// Reporter for the process's stderr, colored when it is a terminal.
    pub fn stderr() -> Self {
        Reporter {
            is_tty: Term::stderr().is_term(),
            quiet: false,
        }
    }

    /// Reporter that prints nothing. Used by tests and embedders.
    pub fn silent() -> Self {
        Reporter {
            is_tty: false,
            quiet: true,
        }
    }

    pub fn step(&self, label: &str, msg: &str) {
        self.emit(label, Color::Cyan, msg);
    }

    pub fn success(&self, label: &str, msg: &str) {
        self.emit(label, Color::Green, msg);
    }

    pub fn fail(&self, label: &str, msg: &str) {
        self.emit(label, Color::Red, msg);
    }

    pub fn hint(&self, msg: &str) {
        self.emit("Hint", Color::Yellow, msg);
    }

    /// Closing banner for a fully linked toolchain.
    pub fn banner(&self, alias: &str, platform: &str) {
        if self.quiet {
            return;
        }
        let line = format!("Toolchain '{alias}' is built and linked for {platform}");
        let rule = "=".repeat(line.len());
        let mut err = io::stderr();
        if self.is_tty {
            let _ = writeln!(err, "{}", style(&rule).green());
            let _ = writeln!(err, "{}", style(&line).bold().green());
            let _ = writeln!(err, "{}", style(&rule).green());
        } else {
            let _ = writeln!(err, "{rule}\n{line}\n{rule}");
        }
    }

    fn emit(&self, label: &str, color: Color, msg: &str) {
        if self.quiet {
            return;
        }
        let _ = write_labeled(&mut io::stderr(), label, color, msg, self.is_tty);
    }
}

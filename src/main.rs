use clap::Parser;
use std::process::ExitCode;
use toolchain_bootstrap::Cli;

fn main() -> ExitCode {
    toolchain_bootstrap::run(Cli::parse())
}

//! CLI entrypoint for the sylva parsing daemon.
//!
//! The binary delegates to [`sylva_cli::run`], which turns command-line
//! arguments into one protocol line, sends it to the daemon and prints the
//! reply.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    sylva_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}

//! Client for the sylva parsing daemon.
//!
//! [`run`] parses the command line, sends a single request over TCP and
//! writes the reply to stdout. Tree replies arrive in the daemon's binary
//! encoding and are decoded to bracketed text unless `tree --raw` was asked
//! for. `ERR` replies are copied to stderr and make the process fail.

mod cli;
mod errors;
mod output;
mod request;
mod transport;

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;
use crate::errors::AppError;
use crate::request::DaemonRequest;

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return report_usage(error, stdout, stderr),
    };

    match execute(&cli, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(cli: &Cli, stdout: &mut W) -> Result<(), AppError> {
    let request = DaemonRequest::from_command(&cli.command)?;
    let mut stream = transport::connect(&cli.host, cli.port)?;
    let reply = transport::exchange(&mut stream, request.line())?;
    output::render_reply(&request, &reply, stdout)?;
    stdout.flush().map_err(AppError::ForwardResponse)
}

/// Help and version output go to stdout and succeed; real usage errors fail.
fn report_usage<W, E>(error: clap::Error, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    W: Write,
    E: Write,
{
    let to_stderr = error.use_stderr();
    let usage = AppError::CliUsage(error);
    if to_stderr {
        let _ = write!(stderr, "{usage}");
        ExitCode::FAILURE
    } else {
        let _ = write!(stdout, "{usage}");
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests;

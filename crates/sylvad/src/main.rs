//! Entry point for the sylva parser daemon.

use std::process::ExitCode;
use std::sync::Arc;

use sylvad::{RuleEngineProvider, StructuredHealthReporter, SystemConfigLoader, bootstrap_with};

const MAIN_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::main");

fn main() -> ExitCode {
    let reporter = Arc::new(StructuredHealthReporter::new());
    // Bootstrap failures are reported through the health reporter.
    let Ok(server) = bootstrap_with(&SystemConfigLoader, reporter, &RuleEngineProvider) else {
        return ExitCode::FAILURE;
    };

    let running = match server.start() {
        Ok(running) => running,
        Err(error) => {
            tracing::error!(target: MAIN_TARGET, %error, "failed to start listener");
            return ExitCode::FAILURE;
        }
    };

    #[cfg(unix)]
    let watcher = match sylvad::watch_signals(running.state()) {
        Ok(watcher) => Some(watcher),
        Err(error) => {
            tracing::warn!(target: MAIN_TARGET, %error, "running without signal handling");
            None
        }
    };

    let outcome = running.wait();

    #[cfg(unix)]
    if let Some(watcher) = watcher {
        watcher.stop();
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(target: MAIN_TARGET, %error, "listener terminated abnormally");
            ExitCode::FAILURE
        }
    }
}

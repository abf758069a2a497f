//! Translation of termination signals into a server shutdown.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use thiserror::Error;
use tracing::{info, warn};

use crate::state::ServerState;

const SIGNAL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::signals");

/// Errors reported while installing the signal watcher.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The watcher thread could not be spawned.
    #[error("failed to spawn signal watcher: {source}")]
    Spawn {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Background thread that clears the running flag on the first termination
/// signal.
#[derive(Debug)]
pub struct SignalWatcher {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

/// Starts watching `SIGTERM`, `SIGINT`, `SIGQUIT` and `SIGHUP`.
///
/// # Errors
///
/// Returns [`ShutdownError`] when the handlers cannot be registered or the
/// watcher thread cannot be started.
pub fn watch_signals(state: Arc<ServerState>) -> Result<SignalWatcher, ShutdownError> {
    let mut signals = Signals::new([SIGTERM, SIGINT, SIGQUIT, SIGHUP])
        .map_err(|source| ShutdownError::Install { source })?;
    let handle = signals.handle();
    let thread = thread::Builder::new()
        .name("sylvad-signals".to_owned())
        .spawn(move || {
            if let Some(signal) = signals.forever().next()
                && state.request_shutdown()
            {
                info!(target: SIGNAL_TARGET, signal, "shutdown signal received");
            }
        })
        .map_err(|source| ShutdownError::Spawn { source })?;
    Ok(SignalWatcher {
        handle,
        thread: Some(thread),
    })
}

impl SignalWatcher {
    /// Stops watching and waits for the watcher thread to exit.
    pub fn stop(mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!(target: SIGNAL_TARGET, "signal watcher panicked");
        }
    }
}

impl Drop for SignalWatcher {
    fn drop(&mut self) {
        self.handle.close();
    }
}

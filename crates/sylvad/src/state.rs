//! Shared running state of a started server.

use std::sync::atomic::{AtomicBool, Ordering};

/// State shared between the accept loop, connection handlers and signal
/// watchers.
///
/// Once the running flag is cleared it is never set again, so every
/// observer eventually agrees that the server is stopping.
#[derive(Debug)]
pub struct ServerState {
    port: u16,
    running: AtomicBool,
}

impl ServerState {
    /// Creates the state for a listener bound to `port`.
    #[must_use]
    pub const fn new(port: u16) -> Self {
        Self {
            port,
            running: AtomicBool::new(true),
        }
    }

    /// Port the listener is actually bound to.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Whether the accept loop should keep taking connections.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Clears the running flag.
    ///
    /// Returns `true` only for the call that actually stopped the server, so
    /// callers can log the transition once.
    #[must_use = "the result reports whether this call stopped the server"]
    pub fn request_shutdown(&self) -> bool {
        self.running
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

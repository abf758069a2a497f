//! TCP listener for the daemon.
//!
//! The transport binds the configured address and accepts connections in a
//! background thread, handing each one to a [`ConnectionHandler`] on its own
//! worker thread. At most `max_connections` workers run at once; further
//! clients wait in the kernel backlog until a worker finishes.

mod errors;
mod handler;
mod listener;
#[cfg(test)]
mod test_utils;

pub use self::errors::ListenerError;
pub(crate) use self::handler::ConnectionHandler;
pub(crate) use self::listener::{ListenerHandle, SocketListener};
#[cfg(test)]
pub(crate) use self::test_utils::{CountingHandler, GatedHandler};

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

//! Connection handling abstraction for the daemon listener.

use std::net::TcpStream;

/// Handles accepted socket connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Handles a single connection and closes it by dropping the stream.
    /// Implementations should avoid panicking.
    fn handle(&self, stream: TcpStream);
}

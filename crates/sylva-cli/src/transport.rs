//! TCP exchange with the daemon.
//!
//! Each request uses a fresh connection: the client writes one line, closes
//! its write half and reads until the daemon closes the socket.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::errors::AppError;

pub(crate) const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a connection to the daemon at `host:port`.
pub(crate) fn connect(host: &str, port: u16) -> Result<TcpStream, AppError> {
    let endpoint = format!("{host}:{port}");
    let address = resolve_tcp_address(host, port).map_err(|source| AppError::Resolve {
        endpoint: endpoint.clone(),
        source,
    })?;
    TcpStream::connect_timeout(&address, CONNECTION_TIMEOUT)
        .map_err(|source| AppError::Connect { endpoint, source })
}

/// Sends `line` and collects the complete reply.
pub(crate) fn exchange<S>(stream: &mut S, line: &str) -> Result<Vec<u8>, AppError>
where
    S: Read + Write + HalfClose,
{
    stream
        .write_all(line.as_bytes())
        .and_then(|()| stream.write_all(b"\n"))
        .and_then(|()| stream.flush())
        .map_err(AppError::SendRequest)?;
    stream.close_write().map_err(AppError::SendRequest)?;

    let mut reply = Vec::new();
    stream
        .read_to_end(&mut reply)
        .map_err(AppError::ReadResponse)?;
    Ok(reply)
}

/// Streams that can signal end-of-request while staying readable.
pub(crate) trait HalfClose {
    fn close_write(&mut self) -> io::Result<()>;
}

impl HalfClose for TcpStream {
    fn close_write(&mut self) -> io::Result<()> {
        match self.shutdown(Shutdown::Write) {
            // The daemon may already have answered and closed.
            Err(error) if error.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

fn resolve_tcp_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    let mut addrs = (host, port).to_socket_addrs()?;
    addrs
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}

//! Connection handler that dispatches line-based commands.
//!
//! Each connection carries exactly one request. The handler reads a single
//! bounded line, parses it, routes it, writes at most one response and then
//! lets the stream drop, which closes the connection.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use sylva_config::Config;
use sylva_engine::ParsingEngine;
use tracing::{debug, warn};

use crate::state::ServerState;
use crate::transport::ConnectionHandler;

use super::deadline::{Deadline, EngineSlots};
use super::errors::DispatchError;
use super::request::Request;
use super::response::ResponseWriter;
use super::router::{CommandRouter, DISPATCH_TARGET};

const READ_CHUNK_BYTES: usize = 1024;

/// Connection handler that parses and dispatches protocol commands.
pub(crate) struct DispatchConnectionHandler {
    router: CommandRouter,
    max_request_bytes: usize,
    io_timeout: Option<Duration>,
    silent_errors: bool,
}

impl DispatchConnectionHandler {
    pub(crate) fn new(
        engine: Arc<dyn ParsingEngine>,
        state: Arc<ServerState>,
        config: &Config,
    ) -> Self {
        Self {
            router: CommandRouter::new(
                engine,
                state,
                Deadline::new(
                    config.parse_timeout(),
                    EngineSlots::new(config.max_connections()),
                ),
            ),
            max_request_bytes: config.max_request_bytes(),
            io_timeout: config.read_timeout(),
            silent_errors: config.silent_errors(),
        }
    }

    /// Serves one request over any duplex stream.
    pub(crate) fn serve<S: Read + Write>(&self, stream: &mut S) {
        let line = match read_request_line(stream, self.max_request_bytes) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(target: DISPATCH_TARGET, "client disconnected without request");
                return;
            }
            Err(error) => {
                self.reject(stream, &error);
                return;
            }
        };

        let outcome = decode_line(&line)
            .and_then(Request::parse)
            .and_then(|request| {
                debug!(
                    target: DISPATCH_TARGET,
                    command = request.command().as_str(),
                    modifier = request.modifier(),
                    "dispatching request"
                );
                self.router.route(&request)
            });

        match outcome {
            Ok(response) => {
                if let Err(error) = ResponseWriter::new(stream).write_response(&response) {
                    warn!(target: DISPATCH_TARGET, %error, "failed to write response");
                }
            }
            Err(error) => self.reject(stream, &error),
        }
    }

    fn reject<W: Write>(&self, stream: W, error: &DispatchError) {
        if !error.is_reportable() {
            warn!(target: DISPATCH_TARGET, %error, "connection failed");
            return;
        }
        if self.silent_errors && error.is_silenceable() {
            debug!(
                target: DISPATCH_TARGET,
                code = error.wire_code(),
                "closing connection without reply"
            );
            return;
        }
        warn!(
            target: DISPATCH_TARGET,
            code = error.wire_code(),
            %error,
            "request failed"
        );
        if let Err(write_error) = ResponseWriter::new(stream).write_error(error) {
            warn!(target: DISPATCH_TARGET, error = %write_error, "failed to write error");
        }
    }
}

impl ConnectionHandler for DispatchConnectionHandler {
    fn handle(&self, mut stream: TcpStream) {
        let timeouts = stream
            .set_read_timeout(self.io_timeout)
            .and_then(|()| stream.set_write_timeout(self.io_timeout));
        if let Err(error) = timeouts {
            warn!(target: DISPATCH_TARGET, %error, "failed to apply socket timeouts");
        }
        self.serve(&mut stream);
    }
}

fn decode_line(bytes: &[u8]) -> Result<&str, DispatchError> {
    std::str::from_utf8(bytes).map_err(|_| DispatchError::InvalidUtf8)
}

/// Reads a bounded request line from the stream.
///
/// Returns `Ok(None)` if the client disconnects without sending data.
/// Returns `Ok(Some(bytes))`, without the `\n` terminator, when a complete
/// line (or EOF with partial data) is received. At most `max_request_bytes`
/// content bytes are accepted.
fn read_request_line<R: Read>(
    stream: &mut R,
    max_request_bytes: usize,
) -> Result<Option<Vec<u8>>, DispatchError> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; READ_CHUNK_BYTES];

    loop {
        let bytes_read = read_with_retry(stream, &mut chunk)?;
        let Some(received) = chunk.get(..bytes_read) else {
            return Err(DispatchError::internal("reader reported more bytes than requested"));
        };

        if received.is_empty() {
            return Ok(if buffer.is_empty() {
                None
            } else {
                Some(buffer)
            });
        }

        // The terminator does not count towards the limit.
        if let Some(newline) = received.iter().position(|byte| *byte == b'\n') {
            buffer.extend(received.iter().take(newline));
            enforce_limit(buffer.len(), max_request_bytes)?;
            return Ok(Some(buffer));
        }

        buffer.extend_from_slice(received);
        enforce_limit(buffer.len(), max_request_bytes)?;
    }
}

/// Reads from the stream, retrying on interrupts.
fn read_with_retry<R: Read>(stream: &mut R, buf: &mut [u8]) -> Result<usize, DispatchError> {
    loop {
        match stream.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                return Err(DispatchError::ReadTimeout);
            }
            Err(e) => return Err(DispatchError::Io(e)),
        }
    }
}

fn enforce_limit(size: usize, max_size: usize) -> Result<(), DispatchError> {
    if size > max_size {
        return Err(DispatchError::request_too_large(size, max_size));
    }
    Ok(())
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;

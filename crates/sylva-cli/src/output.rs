//! Presentation of daemon replies.

use std::io::Write;

use sylva_engine::Tree;

use crate::errors::AppError;
use crate::request::{DaemonRequest, ReplyFormat};

const ERROR_PREFIX: &[u8] = b"ERR ";

/// Writes the daemon's reply to `stdout`.
///
/// `ERR` lines become [`AppError::Daemon`] so the caller can route them to
/// stderr and fail.
pub(crate) fn render_reply<W: Write>(
    request: &DaemonRequest,
    reply: &[u8],
    stdout: &mut W,
) -> Result<(), AppError> {
    if reply.starts_with(ERROR_PREFIX) {
        let line = std::str::from_utf8(reply).map_err(|_| AppError::InvalidReply)?;
        return Err(AppError::Daemon {
            line: line.trim_end().to_owned(),
        });
    }
    match request.format() {
        ReplyFormat::Nothing => Ok(()),
        _ if reply.is_empty() => Err(AppError::EmptyReply {
            command: request.command(),
        }),
        ReplyFormat::Tree => {
            let tree = Tree::from_binary(reply)?;
            writeln!(stdout, "{tree}").map_err(AppError::ForwardResponse)
        }
        ReplyFormat::RawTree | ReplyFormat::Text => {
            stdout.write_all(reply).map_err(AppError::ForwardResponse)
        }
    }
}

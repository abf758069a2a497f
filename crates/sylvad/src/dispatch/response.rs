//! Response payloads and the writer that puts them on the wire.

use std::io::Write;

use super::errors::DispatchError;

/// A fully computed response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Response {
    /// Newline-terminated UTF-8 text.
    Text(String),
    /// Raw bytes written without a terminator.
    Binary(Vec<u8>),
    /// Nothing is written; the connection simply closes.
    Empty,
}

impl Response {
    /// A single line of text; the terminator is appended here.
    pub(crate) fn line(text: impl Into<String>) -> Self {
        let mut text = text.into();
        text.push('\n');
        Self::Text(text)
    }

    /// One line per item.
    pub(crate) fn lines<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: std::fmt::Display,
    {
        let text = items.into_iter().fold(String::new(), |mut text, item| {
            text.push_str(&item.to_string());
            text.push('\n');
            text
        });
        Self::Text(text)
    }
}

/// Writes responses and error lines to a client stream.
pub(crate) struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    pub(crate) const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub(crate) fn write_response(&mut self, response: &Response) -> Result<(), DispatchError> {
        match response {
            Response::Text(text) => self.writer.write_all(text.as_bytes())?,
            Response::Binary(bytes) => self.writer.write_all(bytes)?,
            Response::Empty => return Ok(()),
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Writes `ERR <code> <message>\n`. Line breaks inside the message are
    /// flattened so the error always occupies exactly one line.
    pub(crate) fn write_error(&mut self, error: &DispatchError) -> Result<(), DispatchError> {
        let message = error.to_string().replace(['\r', '\n'], " ");
        writeln!(self.writer, "ERR {} {message}", error.wire_code())?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_newline_terminated() {
        let mut output = Vec::new();
        ResponseWriter::new(&mut output)
            .write_response(&Response::lines(["a(b-1, c-2)", "d(e-3, f-4)"]))
            .expect("write response");
        assert_eq!(output, b"a(b-1, c-2)\nd(e-3, f-4)\n");
    }

    #[test]
    fn binary_payloads_are_written_verbatim() {
        let mut output = Vec::new();
        ResponseWriter::new(&mut output)
            .write_response(&Response::Binary(vec![0, 1, 2]))
            .expect("write response");
        assert_eq!(output, [0, 1, 2]);
    }

    #[test]
    fn empty_responses_write_nothing() {
        let mut output = Vec::new();
        ResponseWriter::new(&mut output)
            .write_response(&Response::Empty)
            .expect("write response");
        assert!(output.is_empty());
    }

    #[test]
    fn errors_render_as_a_single_line() {
        let mut output = Vec::new();
        ResponseWriter::new(&mut output)
            .write_error(&DispatchError::internal("worker\ncrashed"))
            .expect("write error");
        assert_eq!(
            String::from_utf8(output).expect("utf8"),
            "ERR internal internal error: worker crashed\n"
        );
    }
}

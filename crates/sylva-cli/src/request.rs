//! Translation of parsed arguments into a protocol request line.

use crate::cli::CliCommand;
use crate::errors::AppError;

/// How the daemon's reply to a request should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReplyFormat {
    /// Text lines, forwarded as received.
    Text,
    /// A binary tree encoding, decoded to bracketed text.
    Tree,
    /// A binary tree encoding, forwarded untouched.
    RawTree,
    /// No reply is expected.
    Nothing,
}

/// One request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DaemonRequest {
    command: &'static str,
    line: String,
    format: ReplyFormat,
}

impl DaemonRequest {
    /// Builds the request line for `command`.
    pub(crate) fn from_command(command: &CliCommand) -> Result<Self, AppError> {
        match command {
            CliCommand::Tokenize(text) => {
                Self::with_text("tokenize", "tokenize", &text.joined(), ReplyFormat::Text)
            }
            CliCommand::Parse { binarized, text } => {
                let head = if *binarized { "parse:binarized" } else { "parse" };
                Self::with_text("parse", head, &text.joined(), ReplyFormat::Text)
            }
            CliCommand::Tree { raw, text } => {
                let format = if *raw {
                    ReplyFormat::RawTree
                } else {
                    ReplyFormat::Tree
                };
                Self::with_text("tree", "tree", &text.joined(), format)
            }
            CliCommand::Dependencies { mode, text } => {
                if mode.is_empty() || mode.contains(char::is_whitespace) {
                    return Err(AppError::InvalidMode { mode: mode.clone() });
                }
                let head = format!("dependencies:{mode}");
                Self::with_text("dependencies", &head, &text.joined(), ReplyFormat::Text)
            }
            CliCommand::Quit => Ok(Self {
                command: "quit",
                line: String::from("quit"),
                format: ReplyFormat::Nothing,
            }),
        }
    }

    fn with_text(
        command: &'static str,
        head: &str,
        text: &str,
        format: ReplyFormat,
    ) -> Result<Self, AppError> {
        if text.contains(['\n', '\r']) {
            return Err(AppError::MultilineText);
        }
        if text.trim().is_empty() {
            return Err(AppError::MissingText { command });
        }
        Ok(Self {
            command,
            line: format!("{head} {text}"),
            format,
        })
    }

    /// Name of the command, for diagnostics.
    pub(crate) const fn command(&self) -> &'static str {
        self.command
    }

    /// The request line without its terminating newline.
    pub(crate) fn line(&self) -> &str {
        &self.line
    }

    pub(crate) const fn format(&self) -> ReplyFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TextArgs;
    use rstest::rstest;

    fn text(words: &[&str]) -> TextArgs {
        TextArgs {
            words: words.iter().map(|word| (*word).to_owned()).collect(),
        }
    }

    #[rstest]
    #[case(CliCommand::Tokenize(text(&["Dogs", "bark."])), "tokenize Dogs bark.", ReplyFormat::Text)]
    #[case(CliCommand::Parse { binarized: false, text: text(&["Dogs bark."]) }, "parse Dogs bark.", ReplyFormat::Text)]
    #[case(CliCommand::Parse { binarized: true, text: text(&["Dogs", "bark."]) }, "parse:binarized Dogs bark.", ReplyFormat::Text)]
    #[case(CliCommand::Tree { raw: false, text: text(&["Dogs"]) }, "tree Dogs", ReplyFormat::Tree)]
    #[case(CliCommand::Tree { raw: true, text: text(&["Dogs"]) }, "tree Dogs", ReplyFormat::RawTree)]
    #[case(
        CliCommand::Dependencies { mode: String::from("COLLAPSED_TREE"), text: text(&["Dogs", "bark."]) },
        "dependencies:COLLAPSED_TREE Dogs bark.",
        ReplyFormat::Text
    )]
    #[case(CliCommand::Quit, "quit", ReplyFormat::Nothing)]
    fn builds_protocol_lines(
        #[case] command: CliCommand,
        #[case] line: &str,
        #[case] format: ReplyFormat,
    ) {
        let request = DaemonRequest::from_command(&command).expect("request builds");
        assert_eq!(request.line(), line);
        assert_eq!(request.format(), format);
    }

    #[rstest]
    #[case(CliCommand::Tokenize(text(&[])), "tokenize")]
    #[case(CliCommand::Parse { binarized: true, text: text(&["  "]) }, "parse")]
    #[case(CliCommand::Tree { raw: false, text: text(&[]) }, "tree")]
    fn text_is_required(#[case] command: CliCommand, #[case] expected: &str) {
        let error = DaemonRequest::from_command(&command).expect_err("missing text");
        assert!(
            matches!(error, AppError::MissingText { command } if command == expected),
            "unexpected error: {error:?}"
        );
    }

    #[test]
    fn embedded_newlines_are_rejected() {
        let command = CliCommand::Tokenize(text(&["one\ntwo"]));
        let error = DaemonRequest::from_command(&command).expect_err("multiline text");
        assert!(matches!(error, AppError::MultilineText));
    }

    #[test]
    fn modes_with_spaces_are_rejected() {
        let command = CliCommand::Dependencies {
            mode: String::from("BASIC TREE"),
            text: text(&["Dogs"]),
        };
        let error = DaemonRequest::from_command(&command).expect_err("bad mode");
        assert_eq!(
            error.to_string(),
            "dependency mode 'BASIC TREE' must be a single word"
        );
    }
}

//! Request line parsing.
//!
//! A request is one line of the form `command[:modifier][ argument]`. The
//! argument is the unsplit remainder after the first space, so it may itself
//! contain spaces and colons.

use super::errors::DispatchError;

/// Commands understood by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Quit,
    Tokenize,
    Parse,
    Tree,
    Dependencies,
}

impl Command {
    /// Parses a base command. Matching is exact and case-sensitive.
    pub(crate) fn parse(value: &str) -> Result<Self, DispatchError> {
        match value {
            "quit" => Ok(Self::Quit),
            "tokenize" => Ok(Self::Tokenize),
            "parse" => Ok(Self::Parse),
            "tree" => Ok(Self::Tree),
            "dependencies" => Ok(Self::Dependencies),
            _ => Err(DispatchError::unknown_command(value)),
        }
    }

    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::Tokenize => "tokenize",
            Self::Parse => "parse",
            Self::Tree => "tree",
            Self::Dependencies => "dependencies",
        }
    }
}

/// A parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Request {
    command: Command,
    modifier: Option<String>,
    argument: Option<String>,
}

impl Request {
    /// Parses a decoded request line, ignoring trailing whitespace including
    /// the line terminator.
    pub(crate) fn parse(line: &str) -> Result<Self, DispatchError> {
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            return Err(DispatchError::EmptyRequest);
        }
        let (token, argument) = match trimmed.split_once(' ') {
            Some((token, rest)) => (token, Some(rest)),
            None => (trimmed, None),
        };
        let (base, modifier) = match token.split_once(':') {
            Some((base, modifier)) => (base, Some(modifier)),
            None => (token, None),
        };
        Ok(Self {
            command: Command::parse(base)?,
            modifier: modifier.filter(|value| !value.is_empty()).map(str::to_owned),
            argument: argument.map(str::to_owned),
        })
    }

    pub(crate) const fn command(&self) -> Command {
        self.command
    }

    pub(crate) fn modifier(&self) -> Option<&str> {
        self.modifier.as_deref()
    }

    /// The argument text, or a `missing-argument` error naming the command.
    pub(crate) fn require_argument(&self) -> Result<&str, DispatchError> {
        self.argument
            .as_deref()
            .ok_or_else(|| DispatchError::missing_argument(self.command.as_str()))
    }
}

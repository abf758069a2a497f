//! Command-line definitions for the `sylva` client.

use clap::{Args, Parser, Subcommand};
use sylva_config::DEFAULT_PORT;

/// Host the client contacts when `--host` is not given.
pub(crate) const DEFAULT_DAEMON_HOST: &str = "127.0.0.1";

/// Dependency mode requested when `--mode` is not given.
pub(crate) const DEFAULT_DEPENDENCY_MODE: &str = "COLLAPSED_TREE";

/// Command-line interface for the sylva parsing daemon.
#[derive(Parser, Debug)]
#[command(
    name = "sylva",
    version,
    about = "Sends one request to a sylva parsing daemon and prints the reply",
    disable_help_subcommand = true,
    subcommand_required = true,
    arg_required_else_help = false
)]
pub(crate) struct Cli {
    /// Host name or address of the daemon.
    #[arg(long, default_value = DEFAULT_DAEMON_HOST)]
    pub(crate) host: String,
    /// TCP port of the daemon.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub(crate) port: u16,
    /// The request to send.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Requests understood by the daemon.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Splits text into tokens.
    Tokenize(TextArgs),
    /// Prints the bracketed constituency tree of the text.
    Parse {
        /// Requests the head-binarized tree.
        #[arg(long)]
        binarized: bool,
        #[command(flatten)]
        text: TextArgs,
    },
    /// Fetches the binary tree encoding and prints it decoded.
    Tree {
        /// Writes the encoded bytes to stdout untouched.
        #[arg(long)]
        raw: bool,
        #[command(flatten)]
        text: TextArgs,
    },
    /// Prints typed dependencies, one per line.
    Dependencies {
        /// Dependency extraction mode.
        #[arg(long, default_value = DEFAULT_DEPENDENCY_MODE)]
        mode: String,
        #[command(flatten)]
        text: TextArgs,
    },
    /// Asks the daemon to stop.
    Quit,
}

/// Free text following a subcommand.
#[derive(Args, Debug, Clone)]
pub(crate) struct TextArgs {
    /// Words to analyse; they are joined with single spaces.
    #[arg(
        value_name = "TEXT",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub(crate) words: Vec<String>,
}

impl TextArgs {
    /// The words joined into one line of text.
    pub(crate) fn joined(&self) -> String {
        self.words.join(" ")
    }
}

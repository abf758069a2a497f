//! Command routing.
//!
//! `quit` is handled here because it touches server state rather than the
//! engine. Every other command runs under the parse deadline.

use std::sync::Arc;

use sylva_engine::{DependencyMode, ParsingEngine};
use tracing::info;

use crate::state::ServerState;

use super::commands;
use super::deadline::Deadline;
use super::errors::DispatchError;
use super::request::{Command, Request};
use super::response::Response;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

const BINARIZED: &str = "binarized";

/// Routes parsed requests to their handlers.
pub(crate) struct CommandRouter {
    engine: Arc<dyn ParsingEngine>,
    state: Arc<ServerState>,
    deadline: Deadline,
}

impl CommandRouter {
    pub(crate) fn new(
        engine: Arc<dyn ParsingEngine>,
        state: Arc<ServerState>,
        deadline: Deadline,
    ) -> Self {
        Self {
            engine,
            state,
            deadline,
        }
    }

    pub(crate) fn route(&self, request: &Request) -> Result<Response, DispatchError> {
        match request.command() {
            Command::Quit => {
                if self.state.request_shutdown() {
                    info!(target: DISPATCH_TARGET, "shutdown requested by client");
                }
                Ok(Response::Empty)
            }
            Command::Tokenize => {
                let text = request.require_argument()?.to_owned();
                self.run(move |engine| commands::tokenize(engine, &text))
            }
            Command::Parse => {
                let text = request.require_argument()?.to_owned();
                let binarized = request.modifier() == Some(BINARIZED);
                self.run(move |engine| commands::parse(engine, &text, binarized))
            }
            Command::Tree => {
                let text = request.require_argument()?.to_owned();
                self.run(move |engine| commands::tree(engine, &text))
            }
            Command::Dependencies => {
                let text = request.require_argument()?.to_owned();
                let mode: DependencyMode = request
                    .modifier()
                    .ok_or(DispatchError::MissingMode)?
                    .parse()?;
                self.run(move |engine| commands::dependencies(engine, &text, mode))
            }
        }
    }

    fn run<F>(&self, handler: F) -> Result<Response, DispatchError>
    where
        F: FnOnce(&dyn ParsingEngine) -> Result<Response, DispatchError> + Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        self.deadline.run(move || handler(engine.as_ref()))
    }
}

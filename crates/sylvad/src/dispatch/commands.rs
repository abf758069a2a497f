//! Engine-backed command handlers.
//!
//! Each handler computes its complete response before anything is written,
//! so a failure never follows partial output.

use sylva_engine::{DependencyMode, ParsingEngine};

use super::errors::DispatchError;
use super::response::Response;

/// Tokens joined by single spaces.
pub(crate) fn tokenize(engine: &dyn ParsingEngine, text: &str) -> Result<Response, DispatchError> {
    let tokens = engine.tokenize(text)?;
    Ok(Response::line(tokens.join(" ")))
}

/// Canonical bracketed rendering, optionally binarized first.
pub(crate) fn parse(
    engine: &dyn ParsingEngine,
    text: &str,
    binarized: bool,
) -> Result<Response, DispatchError> {
    let tree = engine.parse(text)?;
    let rendered = if binarized {
        engine.binarize(&tree).to_string()
    } else {
        tree.to_string()
    };
    Ok(Response::line(rendered))
}

/// Versioned binary tree encoding.
pub(crate) fn tree(engine: &dyn ParsingEngine, text: &str) -> Result<Response, DispatchError> {
    let tree = engine.parse(text)?;
    Ok(Response::Binary(tree.to_binary()))
}

/// One `rel(head-i, dependent-j)` line per typed dependency.
pub(crate) fn dependencies(
    engine: &dyn ParsingEngine,
    text: &str,
    mode: DependencyMode,
) -> Result<Response, DispatchError> {
    let tree = engine.parse(text)?;
    let structure = engine.grammatical_structure(&tree)?;
    let dependencies = engine.typed_dependencies(&structure, mode)?;
    Ok(Response::lines(dependencies))
}

//! Syntactic analysis behind the sylva daemon.
//!
//! The daemon talks to analysers only through [`ParsingEngine`]. This crate
//! defines that seam, the owned [`Tree`] value with its bracketed rendering
//! and versioned binary encoding, typed dependencies, and [`RuleEngine`], a
//! deterministic lexicon-and-rules engine that needs no external models.

mod binarize;
mod chunker;
pub mod codec;
mod dependencies;
mod engine;
mod error;
mod heads;
mod lexicon;
mod rule_engine;
mod tagger;
mod tokenizer;
mod tree;

#[cfg(test)]
mod tests;

pub use dependencies::{GrammaticalStructure, IndexedWord, TypedDependency};
pub use engine::{DependencyMode, ParsingEngine};
pub use error::{DecodeError, EngineError};
pub use lexicon::BUILTIN_MODEL;
pub use rule_engine::RuleEngine;
pub use tree::Tree;

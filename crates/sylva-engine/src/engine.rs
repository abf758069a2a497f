//! The parsing engine seam.

use std::fmt;
use std::str::FromStr;

use crate::dependencies::{GrammaticalStructure, TypedDependency};
use crate::error::EngineError;
use crate::tree::Tree;

/// Operations a parsing engine exposes to the daemon.
///
/// Engines are loaded once and shared read-only between connections, so
/// implementations must be `Send + Sync` and must not require `&mut self`.
/// Rendering and binary serialisation live on [`Tree`] itself
/// ([`Tree`]'s `Display` impl and [`Tree::to_binary`]).
pub trait ParsingEngine: Send + Sync {
    /// Splits text into word tokens.
    ///
    /// # Errors
    ///
    /// Implementations may fail when the text cannot be tokenised.
    fn tokenize(&self, text: &str) -> Result<Vec<String>, EngineError>;

    /// Parses text into a constituency tree.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyInput`] when the text has no tokens, or an
    /// engine-specific error when no tree can be built.
    fn parse(&self, text: &str) -> Result<Tree, EngineError>;

    /// Returns a copy of the tree with at most two children per node.
    fn binarize(&self, tree: &Tree) -> Tree;

    /// Derives head-dependent relations from a tree.
    ///
    /// # Errors
    ///
    /// Returns an error when the tree has no words.
    fn grammatical_structure(&self, tree: &Tree) -> Result<GrammaticalStructure, EngineError>;

    /// Extracts typed dependencies in the requested representation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnsupportedMode`] for representations the
    /// engine does not implement.
    fn typed_dependencies(
        &self,
        structure: &GrammaticalStructure,
        mode: DependencyMode,
    ) -> Result<Vec<TypedDependency>, EngineError>;
}

/// Typed dependency representations a client may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyMode {
    /// One relation per word, prepositions kept as words.
    Basic,
    /// Prepositions and conjunctions folded into relation names; may form a graph.
    Collapsed,
    /// `Collapsed` with conjunct propagation.
    CcProcessed,
    /// Prepositions folded into relation names while keeping a tree.
    CollapsedTree,
}

impl DependencyMode {
    /// Canonical upper-case name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Collapsed => "COLLAPSED",
            Self::CcProcessed => "CC_PROCESSED",
            Self::CollapsedTree => "COLLAPSED_TREE",
        }
    }
}

impl fmt::Display for DependencyMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for DependencyMode {
    type Err = EngineError;

    /// Parses a mode name case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "BASIC" => Ok(Self::Basic),
            "COLLAPSED" => Ok(Self::Collapsed),
            "CC_PROCESSED" => Ok(Self::CcProcessed),
            "COLLAPSED_TREE" => Ok(Self::CollapsedTree),
            _ => Err(EngineError::unsupported_mode(value)),
        }
    }
}

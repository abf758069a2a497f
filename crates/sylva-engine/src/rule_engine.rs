//! The deterministic rule-based engine shipped with the daemon.

use crate::binarize::binarize;
use crate::chunker;
use crate::dependencies::{GrammaticalStructure, TypedDependency};
use crate::engine::{DependencyMode, ParsingEngine};
use crate::error::EngineError;
use crate::lexicon::Lexicon;
use crate::tagger;
use crate::tokenizer::tokenize;
use crate::tree::Tree;

/// A lexicon-driven tokenizer, tagger and chunk parser.
///
/// Output depends only on the input text and the loaded models, so repeated
/// requests always produce identical responses.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    lexicon: Lexicon,
}

impl RuleEngine {
    /// An engine using only the built-in lexicon.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            lexicon: Lexicon::builtin(),
        }
    }

    /// Loads the parser model and, when given, a tagger model whose entries
    /// override the parser model's.
    ///
    /// Each identifier is either `builtin` or a path to a JSON lexicon of the
    /// form `{"name": "...", "lexicon": {"word": "TAG"}}`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when a model file cannot be read or parsed, or
    /// assigns a tag outside the Penn Treebank tag set.
    pub fn load(model: &str, tagger: Option<&str>) -> Result<Self, EngineError> {
        let base = Lexicon::load(model)?;
        let lexicon = match tagger {
            Some(identifier) => base.overlay(Lexicon::load(identifier)?),
            None => base,
        };
        Ok(Self { lexicon })
    }

    /// Name of the loaded model, for logging.
    #[must_use]
    pub fn model_name(&self) -> &str {
        self.lexicon.name()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ParsingEngine for RuleEngine {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, EngineError> {
        Ok(tokenize(text))
    }

    fn parse(&self, text: &str) -> Result<Tree, EngineError> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        let tags = tagger::tag(&tokens, &self.lexicon);
        Ok(chunker::parse(&tokens, &tags))
    }

    fn binarize(&self, tree: &Tree) -> Tree {
        binarize(tree)
    }

    fn grammatical_structure(&self, tree: &Tree) -> Result<GrammaticalStructure, EngineError> {
        GrammaticalStructure::from_tree(tree)
    }

    fn typed_dependencies(
        &self,
        structure: &GrammaticalStructure,
        mode: DependencyMode,
    ) -> Result<Vec<TypedDependency>, EngineError> {
        match mode {
            DependencyMode::CollapsedTree => Ok(structure.collapsed_tree()),
            other => Err(EngineError::unsupported_mode(other.as_str())),
        }
    }
}

//! Parsing engine doubles.

use mockall::mock;
use sylva_config::Config;
use sylva_engine::{
    DependencyMode, EngineError, GrammaticalStructure, ParsingEngine, Tree, TypedDependency,
};

use crate::engine_provider::{EngineProvider, EngineStartupError, LoadedEngine};

mock! {
    pub Engine {}

    impl ParsingEngine for Engine {
        fn tokenize(&self, text: &str) -> Result<Vec<String>, EngineError>;
        fn parse(&self, text: &str) -> Result<Tree, EngineError>;
        fn binarize(&self, tree: &Tree) -> Tree;
        fn grammatical_structure(&self, tree: &Tree) -> Result<GrammaticalStructure, EngineError>;
        fn typed_dependencies(
            &self,
            structure: &GrammaticalStructure,
            mode: DependencyMode,
        ) -> Result<Vec<TypedDependency>, EngineError>;
    }
}

/// Provider that always fails to load its model.
pub struct FailingEngineProvider;

impl EngineProvider for FailingEngineProvider {
    fn load(&self, config: &Config) -> Result<LoadedEngine, EngineStartupError> {
        Err(EngineStartupError {
            model: config.model().to_owned(),
            source: EngineError::parse_failed("model deliberately unavailable"),
        })
    }
}

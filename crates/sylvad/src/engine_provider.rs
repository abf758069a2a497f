//! Loading of the parsing engine during bootstrap.

use std::sync::Arc;

use sylva_config::Config;
use sylva_engine::{EngineError, ParsingEngine, RuleEngine};
use thiserror::Error;

/// A loaded engine together with the model name used in health events.
#[derive(Clone)]
pub struct LoadedEngine {
    engine: Arc<dyn ParsingEngine>,
    name: String,
}

impl LoadedEngine {
    /// Pairs an engine with a display name.
    #[must_use]
    pub fn new(engine: Arc<dyn ParsingEngine>, name: impl Into<String>) -> Self {
        Self {
            engine,
            name: name.into(),
        }
    }

    /// Name of the loaded model.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the engine.
    #[must_use]
    pub fn engine(&self) -> Arc<dyn ParsingEngine> {
        Arc::clone(&self.engine)
    }
}

impl std::fmt::Debug for LoadedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedEngine")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Error raised when the configured models cannot be loaded.
#[derive(Debug, Error)]
#[error("failed to load parser model '{model}': {source}")]
pub struct EngineStartupError {
    /// Model identifier taken from configuration.
    pub model: String,
    /// Underlying engine failure.
    #[source]
    pub source: EngineError,
}

/// Builds the parsing engine from configuration.
pub trait EngineProvider: Send + Sync {
    /// Loads the engine named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineStartupError`] when the models cannot be loaded.
    fn load(&self, config: &Config) -> Result<LoadedEngine, EngineStartupError>;
}

/// Provider backed by [`RuleEngine`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleEngineProvider;

impl EngineProvider for RuleEngineProvider {
    fn load(&self, config: &Config) -> Result<LoadedEngine, EngineStartupError> {
        let engine =
            RuleEngine::load(config.model(), config.tagger()).map_err(|source| EngineStartupError {
                model: config.model().to_owned(),
                source,
            })?;
        let name = engine.model_name().to_owned();
        Ok(LoadedEngine::new(Arc::new(engine), name))
    }
}

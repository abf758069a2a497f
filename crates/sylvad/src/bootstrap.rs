//! Daemon bootstrap orchestration.

use std::net::SocketAddr;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use sylva_config::{Config, ConfigValidationError};
use sylva_engine::ParsingEngine;
use thiserror::Error;

use crate::dispatch::DispatchConnectionHandler;
use crate::engine_provider::{EngineProvider, EngineStartupError};
use crate::health::HealthReporter;
use crate::state::ServerState;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport::{ListenerError, ListenerHandle, SocketListener};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the daemon configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when any configuration layer is invalid.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader returning a configuration resolved elsewhere.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already resolved configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Configuration loaded but holds unusable values.
    #[error("invalid configuration: {source}")]
    Validation {
        /// Validation failure.
        #[source]
        source: ConfigValidationError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The parsing engine could not be loaded.
    #[error("failed to start parsing engine: {source}")]
    Engine {
        /// Underlying engine error.
        #[source]
        source: EngineStartupError,
    },
}

/// Errors raised while starting or running the listener.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The listener could not be bound or failed while running.
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// A bootstrapped server, ready to bind its listener.
pub struct Server {
    config: Config,
    engine: Arc<dyn ParsingEngine>,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Server {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the loaded engine.
    #[must_use]
    pub fn engine(&self) -> Arc<dyn ParsingEngine> {
        Arc::clone(&self.engine)
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Binds the configured address and starts accepting connections.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError`] when the address cannot be resolved or bound.
    pub fn start(&self) -> Result<RunningServer, ServeError> {
        let listener = SocketListener::bind(self.config.host(), self.config.port())?;
        let address = listener.local_addr();
        let state = Arc::new(ServerState::new(address.port()));
        let handler = Arc::new(DispatchConnectionHandler::new(
            Arc::clone(&self.engine),
            Arc::clone(&state),
            &self.config,
        ));
        let listener = listener.start(handler, Arc::clone(&state), self.config.max_connections())?;
        self.reporter.listener_ready(address);
        Ok(RunningServer {
            address,
            state,
            listener,
            reporter: Arc::clone(&self.reporter),
        })
    }

    /// Starts the listener and blocks until the server stops.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError`] when the listener cannot start or its thread
    /// panics.
    pub fn serve(&self) -> Result<(), ServeError> {
        self.start()?.wait()
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A server whose accept loop is running.
pub struct RunningServer {
    address: SocketAddr,
    state: Arc<ServerState>,
    listener: ListenerHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl RunningServer {
    /// Address the listener is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.address
    }

    /// Shared running state, e.g. for signal watchers.
    #[must_use]
    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Asks the accept loop to stop; in-flight connections still finish.
    pub fn shutdown(&self) {
        self.listener.shutdown();
    }

    /// Blocks until the accept loop exits and in-flight connections drain.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError`] when the listener thread panicked.
    pub fn wait(self) -> Result<(), ServeError> {
        let Self {
            listener, reporter, ..
        } = self;
        listener.join()?;
        reporter.server_stopped();
        Ok(())
    }
}

impl std::fmt::Debug for RunningServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningServer")
            .field("address", &self.address)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Bootstraps the daemon using the supplied collaborators.
///
/// # Errors
///
/// Returns [`BootstrapError`] when configuration, telemetry or the engine
/// fail. The failure is also reported through `reporter`.
pub fn bootstrap_with<P>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    provider: &P,
) -> Result<Server, BootstrapError>
where
    P: EngineProvider + ?Sized,
{
    reporter.bootstrap_starting();
    match bootstrap_steps(loader, reporter.as_ref(), provider) {
        Ok((config, engine, telemetry)) => {
            reporter.bootstrap_succeeded(&config);
            Ok(Server {
                config,
                engine,
                telemetry,
                reporter,
            })
        }
        Err(error) => {
            reporter.bootstrap_failed(&error);
            Err(error)
        }
    }
}

fn bootstrap_steps<P>(
    loader: &dyn ConfigLoader,
    reporter: &dyn HealthReporter,
    provider: &P,
) -> Result<(Config, Arc<dyn ParsingEngine>, TelemetryHandle), BootstrapError>
where
    P: EngineProvider + ?Sized,
{
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    config
        .validate()
        .map_err(|source| BootstrapError::Validation { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;

    reporter.engine_loading(config.model());
    let loaded = provider
        .load(&config)
        .map_err(|source| BootstrapError::Engine { source })?;
    reporter.engine_ready(loaded.name());

    Ok((config, loaded.engine(), telemetry))
}

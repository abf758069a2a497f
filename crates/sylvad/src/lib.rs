//! Core runtime for the sylva parser daemon.
//!
//! The daemon listens on a TCP port and answers one line-based request per
//! connection: `tokenize`, `parse[:binarized]`, `tree`,
//! `dependencies:MODE` or `quit`. Bootstrap follows the same sequence as any
//! long-lived service in this workspace. Configuration is loaded through
//! `ortho_config`, structured telemetry is installed, the parsing engine is
//! loaded once, and only then does the listener start accepting clients.
//!
//! Lifecycle events flow through [`HealthReporter`] so tests and operators
//! can observe bootstrap without scraping log lines.

mod bootstrap;
mod dispatch;
mod engine_provider;
mod health;
#[cfg(unix)]
mod signals;
mod state;
pub mod telemetry;
mod transport;

#[cfg(test)]
mod tests;

pub use bootstrap::{
    BootstrapError, ConfigLoader, RunningServer, ServeError, Server, StaticConfigLoader,
    SystemConfigLoader, bootstrap_with,
};
pub use engine_provider::{EngineProvider, EngineStartupError, LoadedEngine, RuleEngineProvider};
pub use health::{HealthReporter, StructuredHealthReporter};
#[cfg(unix)]
pub use signals::{ShutdownError, SignalWatcher, watch_signals};
pub use state::ServerState;
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;

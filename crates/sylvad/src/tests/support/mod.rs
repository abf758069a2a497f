//! Test harness utilities shared by the daemon's unit and behavioural suites.

mod config_loader;
mod engine;
mod reporter;
mod world;

pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use engine::{FailingEngineProvider, MockEngine};
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use world::{ServerWorld, world};

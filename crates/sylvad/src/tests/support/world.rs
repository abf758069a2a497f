//! BDD test world: owns the loader, reporter, bootstrapped server and the
//! replies clients received.

use std::cell::RefCell;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use sylva_config::Config;

use crate::bootstrap::{BootstrapError, ConfigLoader, RunningServer, Server, bootstrap_with};
use crate::engine_provider::RuleEngineProvider;

use super::config_loader::{FailingConfigLoader, TestConfigLoader};
use super::reporter::RecordingHealthReporter;

const STOP_DEADLINE: Duration = Duration::from_secs(3);

/// Scenario world shared across BDD steps.
pub struct ServerWorld {
    loader: Box<dyn ConfigLoader>,
    pub reporter: Arc<RecordingHealthReporter>,
    server: Option<Server>,
    running: Option<RunningServer>,
    bootstrap_error: Option<BootstrapError>,
    replies: Vec<Vec<u8>>,
}

impl ServerWorld {
    /// Builds a world with a successful configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            loader: Box::new(TestConfigLoader::new()),
            reporter: Arc::new(RecordingHealthReporter::default()),
            server: None,
            running: None,
            bootstrap_error: None,
            replies: Vec::new(),
        }
    }

    /// Installs a loader producing the test configuration adjusted by
    /// `adjust`.
    pub fn configure(&mut self, adjust: impl FnOnce(&mut Config)) {
        self.loader = Box::new(TestConfigLoader::new().with(adjust));
    }

    /// Installs a loader that always fails.
    pub fn use_failing_loader(&mut self) {
        self.loader = Box::new(FailingConfigLoader);
    }

    /// Runs the bootstrap sequence once.
    pub fn bootstrap(&mut self) {
        if self.server.is_some() || self.bootstrap_error.is_some() {
            return;
        }
        match bootstrap_with(&*self.loader, self.reporter.clone(), &RuleEngineProvider) {
            Ok(server) => self.server = Some(server),
            Err(error) => self.bootstrap_error = Some(error),
        }
    }

    /// Bootstraps if needed and starts the listener.
    pub fn start(&mut self) {
        self.bootstrap();
        if self.running.is_some() {
            return;
        }
        let server = self.server.as_ref().expect("bootstrap should succeed");
        self.running = Some(server.start().expect("listener should start"));
    }

    #[must_use]
    pub fn bootstrap_error(&self) -> Option<&BootstrapError> {
        self.bootstrap_error.as_ref()
    }

    #[must_use]
    pub fn server(&self) -> Option<&Server> {
        self.server.as_ref()
    }

    fn connect(&self) -> TcpStream {
        let running = self.running.as_ref().expect("server should be running");
        let stream = TcpStream::connect(running.local_addr()).expect("connect to daemon");
        stream
            .set_read_timeout(Some(STOP_DEADLINE))
            .expect("set client read timeout");
        stream
    }

    /// Sends one request line and records everything the daemon wrote.
    pub fn send(&mut self, request: &str) {
        let mut stream = self.connect();
        stream
            .write_all(format!("{request}\n").as_bytes())
            .expect("write request");
        self.replies.push(read_reply(&mut stream));
    }

    /// Connects and closes the write side without sending anything.
    pub fn send_nothing(&mut self) {
        let mut stream = self.connect();
        stream.shutdown(Shutdown::Write).expect("close write side");
        self.replies.push(read_reply(&mut stream));
    }

    #[must_use]
    pub fn replies(&self) -> &[Vec<u8>] {
        &self.replies
    }

    /// The most recent reply.
    #[must_use]
    pub fn last_reply(&self) -> &[u8] {
        self.replies.last().map_or(&[], Vec::as_slice)
    }

    /// The most recent reply as text.
    #[must_use]
    pub fn last_text(&self) -> String {
        String::from_utf8_lossy(self.last_reply()).into_owned()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| running.state().is_running())
    }

    /// Requests shutdown through the server handle.
    pub fn shutdown(&self) {
        if let Some(running) = self.running.as_ref() {
            running.shutdown();
        }
    }

    /// Waits for the accept loop to exit, returning whether it did so in
    /// time.
    pub fn wait_for_stop(&mut self) -> bool {
        let Some(running) = self.running.take() else {
            return true;
        };
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let outcome = running.wait().is_ok();
            sender.send(outcome).ok();
        });
        receiver.recv_timeout(STOP_DEADLINE).unwrap_or(false)
    }
}

impl Default for ServerWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ServerWorld {
    fn drop(&mut self) {
        self.shutdown();
        self.wait_for_stop();
    }
}

fn read_reply(stream: &mut TcpStream) -> Vec<u8> {
    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).expect("read reply");
    reply
}

/// Creates a fresh scenario world.
#[must_use]
pub fn world() -> RefCell<ServerWorld> {
    RefCell::new(ServerWorld::new())
}

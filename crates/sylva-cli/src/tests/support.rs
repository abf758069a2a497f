//! Test support for the sylva client.
//!
//! Supplies a fake daemon that answers a single connection with canned
//! bytes, and a world type that runs the CLI against it while capturing its
//! output.

use std::ffi::OsString;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result, anyhow};

/// A one-shot daemon that records the request line and writes `reply`.
pub(super) struct FakeDaemon {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeDaemon {
    pub(super) fn spawn(reply: Vec<u8>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake daemon")?;
        let port = listener.local_addr().context("fake daemon address")?.port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut line = String::new();
            let Ok(reader_stream) = stream.try_clone() else {
                return;
            };
            let mut reader = BufReader::new(reader_stream);
            if reader.read_line(&mut line).unwrap_or(0) > 0
                && let Ok(mut requests) = recorded.lock()
            {
                requests.push(line.trim_end_matches('\n').to_owned());
            }
            let mut writer = stream;
            let _ = writer.write_all(&reply);
            let _ = writer.flush();
        });
        Ok(Self {
            port,
            requests,
            handle: Some(handle),
        })
    }

    pub(super) const fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the daemon thread and returns what it received.
    pub(super) fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake daemon thread panicked"))?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|_| anyhow!("fake daemon request log poisoned"))?;
        Ok(requests.clone())
    }
}

/// Returns a port nothing is listening on.
pub(super) fn unused_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind throwaway listener")?;
    Ok(listener.local_addr().context("throwaway listener address")?.port())
}

#[derive(Default)]
pub(super) struct TestWorld {
    pub daemon: Option<FakeDaemon>,
    pub port: Option<u16>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
    pub requests: Vec<String>,
}

impl TestWorld {
    pub fn start_daemon(&mut self, reply: Vec<u8>) -> Result<()> {
        let daemon = FakeDaemon::spawn(reply)?;
        self.port = Some(daemon.port());
        self.daemon = Some(daemon);
        Ok(())
    }

    pub fn point_at_nothing(&mut self) -> Result<()> {
        self.port = Some(unused_port()?);
        Ok(())
    }

    pub fn run(&mut self, command: &str) -> Result<()> {
        self.stdout.clear();
        self.stderr.clear();
        self.requests.clear();
        let args = self.build_args(command)?;
        let exit = crate::run(args, &mut self.stdout, &mut self.stderr);
        self.exit_code = Some(exit);
        if let Some(daemon) = self.daemon.as_mut() {
            self.requests = daemon.take_requests()?;
        }
        Ok(())
    }

    fn build_args(&self, command: &str) -> Result<Vec<OsString>> {
        let port = self.port.context("no daemon port configured")?;
        let mut args = vec![
            OsString::from("sylva"),
            OsString::from("--port"),
            OsString::from(port.to_string()),
        ];
        args.extend(
            command
                .trim()
                .trim_matches('"')
                .split_whitespace()
                .map(OsString::from),
        );
        Ok(args)
    }

    pub fn stdout_text(&self) -> Result<String> {
        String::from_utf8(self.stdout.clone()).context("stdout utf8")
    }

    pub fn stderr_text(&self) -> Result<String> {
        String::from_utf8(self.stderr.clone()).context("stderr utf8")
    }

    pub fn exit_code(&self) -> Result<ExitCode> {
        self.exit_code.context("exit code recorded")
    }
}

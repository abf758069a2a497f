//! Listener implementation for the daemon's TCP socket.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::state::ServerState;

use super::{ConnectionHandler, LISTENER_TARGET, ListenerError};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// Listener bound to a TCP address.
#[derive(Debug)]
pub(crate) struct SocketListener {
    address: SocketAddr,
    listener: TcpListener,
}

impl SocketListener {
    /// Resolves `host` and binds the first address it yields.
    pub(crate) fn bind(host: &str, port: u16) -> Result<Self, ListenerError> {
        let listener = bind_tcp(host, port)?;
        let address = listener
            .local_addr()
            .map_err(|source| ListenerError::LocalAddr { source })?;
        Ok(Self { address, listener })
    }

    /// Address actually bound, with the kernel-assigned port when `0` was
    /// requested.
    pub(crate) const fn local_addr(&self) -> SocketAddr {
        self.address
    }

    /// Starts the accept loop on a background thread.
    ///
    /// The loop runs until `state` stops running, then waits for every
    /// in-flight connection before the thread exits.
    pub(crate) fn start(
        self,
        handler: Arc<dyn ConnectionHandler>,
        state: Arc<ServerState>,
        max_connections: usize,
    ) -> Result<ListenerHandle, ListenerError> {
        self.listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;
        let loop_state = Arc::clone(&state);
        let handle = thread::Builder::new()
            .name("sylvad-accept".to_owned())
            .spawn(move || run_accept_loop(&self, &loop_state, &handler, max_connections))
            .map_err(|source| ListenerError::Spawn { source })?;
        Ok(ListenerHandle {
            state,
            handle: Some(handle),
        })
    }
}

/// Handle to the background listener thread.
#[derive(Debug)]
pub(crate) struct ListenerHandle {
    state: Arc<ServerState>,
    handle: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    /// Asks the accept loop to stop.
    pub(crate) fn shutdown(&self) {
        if self.state.request_shutdown() {
            debug!(target: LISTENER_TARGET, "listener shutdown requested");
        }
    }

    /// Waits for the accept loop and its in-flight connections to finish.
    pub(crate) fn join(mut self) -> Result<(), ListenerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| ListenerError::ThreadPanic),
            None => Ok(()),
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        // Dropping without joining must not leave the accept loop spinning.
        if self.handle.is_some() {
            self.shutdown();
        }
    }
}

fn run_accept_loop(
    listener: &SocketListener,
    state: &ServerState,
    handler: &Arc<dyn ConnectionHandler>,
    max_connections: usize,
) {
    info!(
        target: LISTENER_TARGET,
        address = %listener.address,
        max_connections,
        "socket listener active"
    );
    let mut workers: Vec<JoinHandle<()>> = Vec::new();
    let mut last_error = None::<io::ErrorKind>;
    while state.is_running() {
        reap_finished(&mut workers);
        if workers.len() >= max_connections {
            thread::sleep(ACCEPT_BACKOFF);
            continue;
        }
        match accept_connection(&listener.listener) {
            Ok(Some((stream, peer))) => {
                last_error = None;
                debug!(target: LISTENER_TARGET, %peer, "accepted connection");
                if let Some(worker) = spawn_worker(stream, Arc::clone(handler)) {
                    workers.push(worker);
                }
            }
            Ok(None) => thread::sleep(ACCEPT_BACKOFF),
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: LISTENER_TARGET,
                        error = %error,
                        "socket accept error"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }

    let in_flight = workers.len();
    if in_flight > 0 {
        info!(target: LISTENER_TARGET, in_flight, "draining connections");
    }
    for worker in workers {
        join_worker(worker);
    }
    info!(target: LISTENER_TARGET, "socket listener stopped");
}

fn spawn_worker(stream: TcpStream, handler: Arc<dyn ConnectionHandler>) -> Option<JoinHandle<()>> {
    match thread::Builder::new()
        .name("sylvad-conn".to_owned())
        .spawn(move || handler.handle(stream))
    {
        Ok(worker) => Some(worker),
        Err(error) => {
            warn!(
                target: LISTENER_TARGET,
                error = %error,
                "failed to spawn connection worker"
            );
            None
        }
    }
}

fn reap_finished(workers: &mut Vec<JoinHandle<()>>) {
    let (finished, running): (Vec<_>, Vec<_>) =
        workers.drain(..).partition(JoinHandle::is_finished);
    *workers = running;
    for worker in finished {
        join_worker(worker);
    }
}

fn join_worker(worker: JoinHandle<()>) {
    if worker.join().is_err() {
        warn!(target: LISTENER_TARGET, "connection handler panicked");
    }
}

fn accept_connection(listener: &TcpListener) -> io::Result<Option<(TcpStream, SocketAddr)>> {
    match listener.accept() {
        Ok((stream, peer)) => {
            stream.set_nonblocking(false)?;
            Ok(Some((stream, peer)))
        }
        Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(error) => Err(error),
    }
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?;
    let addr = addrs.next().ok_or_else(|| ListenerError::ResolveEmpty {
        host: host.to_owned(),
        port,
    })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::BindTcp { addr, source })
}

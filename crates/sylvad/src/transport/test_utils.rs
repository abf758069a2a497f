//! Test helpers for the transport module.

use std::net::TcpStream;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
    mpsc::{self, Receiver, Sender},
};

use super::ConnectionHandler;

pub(crate) struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    pub(crate) fn new() -> (Arc<AtomicUsize>, Arc<Self>) {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(Self {
            count: Arc::clone(&count),
        });
        (count, handler)
    }
}

impl ConnectionHandler for CountingHandler {
    fn handle(&self, _stream: TcpStream) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Holds every connection open until the test releases it, tracking how many
/// handlers are running at once.
pub(crate) struct GatedHandler {
    active: AtomicUsize,
    peak: AtomicUsize,
    started: AtomicUsize,
    release: Mutex<Receiver<()>>,
}

impl GatedHandler {
    pub(crate) fn new() -> (Sender<()>, Arc<Self>) {
        let (sender, receiver) = mpsc::channel();
        let handler = Arc::new(Self {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            started: AtomicUsize::new(0),
            release: Mutex::new(receiver),
        });
        (sender, handler)
    }

    pub(crate) fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl ConnectionHandler for GatedHandler {
    fn handle(&self, _stream: TcpStream) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::SeqCst);
        let gate = self.release.lock().expect("gate mutex poisoned");
        gate.recv().expect("test keeps the release sender alive");
        drop(gate);
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

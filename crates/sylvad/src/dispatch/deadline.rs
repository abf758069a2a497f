//! Bounded execution of engine calls.
//!
//! Engine work runs on helper threads. A request that outlives its deadline
//! is answered with a timeout, but its computation keeps running until it
//! returns, so every computation holds one of a fixed number of engine slots
//! until it finishes. New work waits for a free slot within the same
//! deadline.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::errors::DispatchError;
use super::router::DISPATCH_TARGET;

/// Fixed pool of engine slots shared by every connection.
#[derive(Debug)]
pub(crate) struct EngineSlots {
    capacity: usize,
    busy: Mutex<usize>,
    freed: Condvar,
}

impl EngineSlots {
    pub(crate) fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            capacity: capacity.max(1),
            busy: Mutex::new(0),
            freed: Condvar::new(),
        })
    }

    /// Number of engine computations still running.
    pub(crate) fn busy(&self) -> usize {
        *self.busy.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits up to `wait` for a free slot.
    fn acquire(self: &Arc<Self>, wait: Duration) -> Option<EngineSlot> {
        let guard = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut busy, _) = self
            .freed
            .wait_timeout_while(guard, wait, |busy| *busy >= self.capacity)
            .unwrap_or_else(PoisonError::into_inner);
        if *busy >= self.capacity {
            return None;
        }
        *busy += 1;
        Some(EngineSlot {
            slots: Arc::clone(self),
        })
    }
}

/// A held engine slot, released on drop.
struct EngineSlot {
    slots: Arc<EngineSlots>,
}

impl Drop for EngineSlot {
    fn drop(&mut self) {
        let mut busy = self.slots.busy.lock().unwrap_or_else(PoisonError::into_inner);
        *busy = busy.saturating_sub(1);
        self.slots.freed.notify_one();
    }
}

/// Runs engine work on a helper thread and gives up after a limit.
///
/// An abandoned computation keeps running to completion on its own thread
/// and keeps its slot until then; its result is dropped.
#[derive(Debug, Clone)]
pub(crate) struct Deadline {
    limit: Option<Duration>,
    slots: Arc<EngineSlots>,
}

impl Deadline {
    /// `None` runs work inline with no limit.
    pub(crate) const fn new(limit: Option<Duration>, slots: Arc<EngineSlots>) -> Self {
        Self { limit, slots }
    }

    pub(crate) fn run<T, F>(&self, job: F) -> Result<T, DispatchError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, DispatchError> + Send + 'static,
    {
        let Some(limit) = self.limit else {
            return job();
        };
        let started = Instant::now();
        let Some(slot) = self.slots.acquire(limit) else {
            debug!(target: DISPATCH_TARGET, "no engine slot freed before the deadline");
            return Err(DispatchError::timeout(limit));
        };
        let (sender, receiver) = mpsc::sync_channel(1);
        thread::Builder::new()
            .name("sylvad-engine".to_owned())
            .spawn(move || {
                let outcome = job();
                drop(slot);
                if sender.send(outcome).is_err() {
                    debug!(target: DISPATCH_TARGET, "engine result arrived after the deadline");
                }
            })
            .map_err(|error| DispatchError::internal(format!("failed to start engine worker: {error}")))?;
        match receiver.recv_timeout(limit.saturating_sub(started.elapsed())) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(DispatchError::timeout(limit)),
            Err(RecvTimeoutError::Disconnected) => Err(DispatchError::internal(
                "engine worker stopped without a result",
            )),
        }
    }
}

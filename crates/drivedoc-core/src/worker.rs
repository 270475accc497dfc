/// Single-flight background worker.
///
/// At most one update runs at a time. The busy flag is cleared by a guard
/// that lives on the worker thread, so it is released on success, error
/// and panic alike.
use crate::error::WorkerError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct UpdateWorker {
    busy: Arc<AtomicBool>,
}

/// Holds the busy flag; clears it when dropped.
#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

impl UpdateWorker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Mark the worker busy, unless it already is.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    /// Run `job` on a named background thread.
    ///
    /// Fails with [`WorkerError::AlreadyRunning`] while a previous job is
    /// still running.
    pub fn spawn<F>(&self, name: &str, job: F) -> Result<thread::JoinHandle<()>, WorkerError>
    where
        F: FnOnce() + Send + 'static,
    {
        let guard = self.try_acquire().ok_or(WorkerError::AlreadyRunning)?;
        debug!("Starting worker thread {name}");
        thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || {
                let _guard = guard;
                job();
            })
            .map_err(WorkerError::Spawn)
    }
}

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::pipeline::Pipeline;

enum Job {
    File(PathBuf),
    Stop,
}

type PendingSet = Arc<Mutex<HashSet<PathBuf>>>;

fn lock(pending: &PendingSet) -> MutexGuard<'_, HashSet<PathBuf>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cloneable submission side of a [`Dispatcher`].
#[derive(Clone)]
pub struct DispatchHandle {
    tx: Sender<Job>,
    pending: PendingSet,
}

impl DispatchHandle {
    /// Queue `path` for processing.
    ///
    /// Returns `false` if the same path is already queued or being processed, or if the
    /// dispatcher has shut down.
    pub fn submit(&self, path: PathBuf) -> bool {
        if !lock(&self.pending).insert(path.clone()) {
            debug!(path = %path.display(), "already queued; ignoring duplicate event");
            return false;
        }
        if self.tx.send(Job::File(path.clone())).is_err() {
            lock(&self.pending).remove(&path);
            return false;
        }
        true
    }

    /// `true` while `path` is queued or in flight.
    pub fn is_pending(&self, path: &Path) -> bool {
        lock(&self.pending).contains(path)
    }
}

/// Single worker that runs queued files through a [`Pipeline`] one at a time.
///
/// Each file waits out the settle delay before it is read, so producers have time to finish
/// writing. A path is held in a pending set from submission until its task finishes, which keeps
/// at most one task per path in flight.
pub struct Dispatcher {
    handle: DispatchHandle,
    worker: JoinHandle<()>,
}

impl Dispatcher {
    /// Start the worker thread.
    pub fn spawn(pipeline: Arc<Pipeline>, settle_delay: Duration) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let pending: PendingSet = Arc::new(Mutex::new(HashSet::new()));
        let worker_pending = Arc::clone(&pending);
        let worker = thread::Builder::new()
            .name("report-dispatch".to_string())
            .spawn(move || run_worker(rx, pipeline, settle_delay, worker_pending))?;

        Ok(Self {
            handle: DispatchHandle { tx, pending },
            worker,
        })
    }

    /// A handle for submitting paths.
    pub fn handle(&self) -> DispatchHandle {
        self.handle.clone()
    }

    /// Finish everything already queued, then stop the worker.
    pub fn shutdown(self) {
        let _ = self.handle.tx.send(Job::Stop);
        if self.worker.join().is_err() {
            error!("dispatch worker panicked");
        }
    }
}

fn run_worker(rx: Receiver<Job>, pipeline: Arc<Pipeline>, settle_delay: Duration, pending: PendingSet) {
    while let Ok(job) = rx.recv() {
        let path = match job {
            Job::File(path) => path,
            Job::Stop => break,
        };

        if !settle_delay.is_zero() {
            thread::sleep(settle_delay);
        }
        let result = panic::catch_unwind(AssertUnwindSafe(|| pipeline.process(&path)));
        if result.is_err() {
            error!(path = %path.display(), "pipeline panicked while processing file");
        }
        lock(&pending).remove(&path);
    }
    info!("dispatch worker stopped");
}

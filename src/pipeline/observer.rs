use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::FailureKind;

use super::task::{FileTask, TaskOutcome, TaskState};

/// Observer interface for file task lifecycles.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait TaskObserver: Send + Sync {
    /// Called after every state change, including the initial `Detected`.
    fn on_transition(&self, _task: &FileTask) {}

    /// Called once with the terminal outcome.
    fn on_finished(&self, _task: &FileTask, _outcome: &TaskOutcome) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn TaskObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn TaskObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl TaskObserver for CompositeObserver {
    fn on_transition(&self, task: &FileTask) {
        for o in &self.observers {
            o.on_transition(task);
        }
    }

    fn on_finished(&self, task: &FileTask, outcome: &TaskOutcome) {
        for o in &self.observers {
            o.on_finished(task, outcome);
        }
    }
}

/// Emits every transition and outcome as a `tracing` event.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl TaskObserver for TracingObserver {
    fn on_transition(&self, task: &FileTask) {
        match task.state {
            TaskState::Detected => info!(file = %task.file_name(), "new file detected"),
            TaskState::Failed(_) => {}
            state => debug!(file = %task.file_name(), %state, "task advanced"),
        }
    }

    fn on_finished(&self, task: &FileTask, outcome: &TaskOutcome) {
        let file = task.file_name();
        match outcome {
            TaskOutcome::Archived {
                report,
                archived,
                rows,
                total_columns,
            } => info!(
                %file,
                report = %report.display(),
                archived = %archived.display(),
                rows,
                ?total_columns,
                "report generated and source archived"
            ),
            TaskOutcome::Failed {
                kind,
                error_type,
                message,
            } => match kind {
                FailureKind::Validation => debug!(%file, reason = %message, "skipping unsupported file"),
                FailureKind::Lock => warn!(
                    %file,
                    reason = %message,
                    "file is open in another program; close it and save again to retry"
                ),
                FailureKind::ArchiveCollision => error!(
                    %file,
                    reason = %message,
                    "archive already holds a file with this name; left in watch folder"
                ),
                FailureKind::Parse | FailureKind::Unknown => error!(
                    %file,
                    error_type,
                    reason = %message,
                    "error while processing file"
                ),
            },
        }
    }
}

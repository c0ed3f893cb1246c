use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::FailureKind;

/// Lifecycle state of a [`FileTask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// A qualifying event arrived for the path.
    Detected,
    /// The extension is a recognized tabular format.
    Validated,
    /// The file was read and parsed into a table.
    Parsed,
    /// The report was written to the output folder.
    Reported,
    /// The source was moved into the archive.
    Archived,
    /// Processing stopped; the source stays where it was.
    Failed(FailureKind),
}

impl TaskState {
    /// `true` for `Archived` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Archived | Self::Failed(_))
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(kind) => write!(f, "Failed({kind:?})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// One unit of pipeline work: a single dropped file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileTask {
    /// Path of the dropped file.
    pub source: PathBuf,
    /// When the task was created.
    pub detected_at: DateTime<Local>,
    /// Current lifecycle state.
    pub state: TaskState,
}

impl FileTask {
    /// New task in [`TaskState::Detected`].
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            detected_at: Local::now(),
            state: TaskState::Detected,
        }
    }

    /// Final path component, for log lines.
    pub fn file_name(&self) -> String {
        display_name(&self.source)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Terminal result of processing one file.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// Report written and source archived.
    Archived {
        /// Path of the generated report.
        report: PathBuf,
        /// Where the source now lives.
        archived: PathBuf,
        /// Data rows in the report.
        rows: usize,
        /// Columns that received a total.
        total_columns: Vec<String>,
    },
    /// Processing stopped; nothing was archived.
    Failed {
        /// Failure category.
        kind: FailureKind,
        /// Short error type name.
        error_type: &'static str,
        /// Human-readable cause.
        message: String,
    },
}

impl TaskOutcome {
    /// `true` when the file was fully processed.
    pub fn is_archived(&self) -> bool {
        matches!(self, Self::Archived { .. })
    }

    /// Failure category, if processing failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Failed { kind, .. } => Some(*kind),
            Self::Archived { .. } => None,
        }
    }
}

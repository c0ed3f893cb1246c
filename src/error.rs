use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type used across the crate.
pub type ReportResult<T> = Result<T, ReportError>;

/// Error type returned by ingestion, report building and the file pipeline.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Underlying I/O error (e.g. file vanished, disk full).
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// CSV tokenizer error (malformed quoting, invalid UTF-8, ragged rows).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet writer error.
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Folder subscription error.
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Configuration could not be read or is invalid.
    #[error("config error: {message}")]
    Config { message: String },

    /// The file does not have a recognized tabular extension.
    #[error("unsupported file format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The source file is held open or locked by another process.
    #[error("file is locked by another process: {} ({source})", path.display())]
    Locked {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input is not a well-formed table.
    #[error("malformed table: {message}")]
    Parse { message: String },

    /// The archive already holds a file with the same name.
    #[error("archive already contains {}", path.display())]
    ArchiveCollision { path: PathBuf },
}

/// Failure taxonomy reported for a file task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Wrong extension; skipped.
    Validation,
    /// Source held open elsewhere; eligible for a retry on a later event.
    Lock,
    /// Malformed tabular content.
    Parse,
    /// Archive destination already exists.
    ArchiveCollision,
    /// Anything else.
    Unknown,
}

impl ReportError {
    /// Map this error onto the task failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::UnsupportedFormat { .. } => FailureKind::Validation,
            Self::Locked { .. } => FailureKind::Lock,
            Self::Parse { .. } => FailureKind::Parse,
            Self::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => FailureKind::Unknown,
                _ => FailureKind::Parse,
            },
            Self::ArchiveCollision { .. } => FailureKind::ArchiveCollision,
            Self::Io(_) | Self::Xlsx(_) | Self::Watch(_) | Self::Config { .. } => FailureKind::Unknown,
        }
    }

    /// Short variant name used in log lines.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Io(_) => "Io",
            Self::Csv(_) => "Csv",
            Self::Xlsx(_) => "Xlsx",
            Self::Watch(_) => "Watch",
            Self::Config { .. } => "Config",
            Self::UnsupportedFormat { .. } => "UnsupportedFormat",
            Self::Locked { .. } => "Locked",
            Self::Parse { .. } => "Parse",
            Self::ArchiveCollision { .. } => "ArchiveCollision",
        }
    }
}

/// Whether an I/O error means "another process holds this file".
///
/// Unix reports this as a permission error; Windows uses sharing/lock violations (32/33).
pub fn is_lock_error(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    cfg!(windows) && matches!(err.raw_os_error(), Some(32) | Some(33))
}

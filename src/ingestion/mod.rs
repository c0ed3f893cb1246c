//! Input recognition and parsing.
//!
//! The watcher and pipeline use [`IngestionFormat::from_path`] to decide whether a dropped file is
//! something we can turn into a report; [`csv`] turns the bytes into a typed
//! [`crate::types::Table`].

pub mod csv;

use std::path::Path;

pub use self::csv::{ingest_csv_from_bytes, ingest_csv_from_path, ingest_csv_from_reader};

/// Recognized input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

/// `true` if the watcher should hand this path to the pipeline.
pub fn is_supported_path(path: &Path) -> bool {
    IngestionFormat::from_path(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(is_supported_path(Path::new("in/sales.csv")));
        assert!(is_supported_path(Path::new("in/SALES.CSV")));
        assert!(!is_supported_path(Path::new("in/sales.xlsx")));
        assert!(!is_supported_path(Path::new("in/sales")));
        assert!(!is_supported_path(Path::new("in/.csv.tmp")));
    }
}

//! Startup configuration.
//!
//! Read once from a JSON file (by default `config/settings.json`) and passed explicitly to the
//! pipeline and watcher.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// Default location of the settings file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/settings.json";

fn default_settle_delay_ms() -> u64 {
    1_000
}

/// Folders and behavior switches for the watcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Folder monitored for new CSV files.
    pub watch_folder: PathBuf,
    /// Folder receiving generated reports.
    pub output_folder: PathBuf,
    /// Folder receiving processed source files.
    pub archive_folder: PathBuf,
    /// Ask on the terminal which columns to total.
    #[serde(default)]
    pub ask_user_for_totals: bool,
    /// Fixed list of columns to total; overrides auto-detection when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_columns: Option<Vec<String>>,
    /// Pause after a create event before the file is read.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Config {
    /// Config with the three folders and every switch at its default.
    pub fn new(
        watch_folder: impl Into<PathBuf>,
        output_folder: impl Into<PathBuf>,
        archive_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            watch_folder: watch_folder.into(),
            output_folder: output_folder.into(),
            archive_folder: archive_folder.into(),
            ask_user_for_totals: false,
            total_columns: None,
            settle_delay_ms: default_settle_delay_ms(),
        }
    }

    /// Load and validate a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> ReportResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ReportError::Config {
            message: format!("cannot open {}: {e}", path.display()),
        })?;
        let config: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| ReportError::Config {
                message: format!("invalid settings in {}: {e}", path.display()),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> ReportResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ReportError::Config {
            message: format!("invalid settings: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ReportResult<()> {
        for (key, path) in self.folders() {
            if path.as_os_str().is_empty() {
                return Err(ReportError::Config {
                    message: format!("{key} must not be empty"),
                });
            }
        }
        Ok(())
    }

    /// The three working folders with their setting names.
    pub fn folders(&self) -> [(&'static str, &Path); 3] {
        [
            ("watch_folder", self.watch_folder.as_path()),
            ("output_folder", self.output_folder.as_path()),
            ("archive_folder", self.archive_folder.as_path()),
        ]
    }

    /// Create the watch, output and archive folders if they are missing.
    pub fn ensure_directories(&self) -> ReportResult<()> {
        for (key, path) in self.folders() {
            fs::create_dir_all(path).map_err(|e| ReportError::Config {
                message: format!("cannot create {key} {}: {e}", path.display()),
            })?;
        }
        Ok(())
    }

    /// Settle delay as a [`Duration`].
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

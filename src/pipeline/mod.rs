//! Per-file processing: validate → parse → report → archive.
//!
//! [`Pipeline::process`] runs one [`FileTask`] through its state machine and always returns a
//! [`TaskOutcome`]; failures stay local to the file. Every state change is reported to a
//! [`TaskObserver`] (by default [`TracingObserver`]).
//!
//! On failure the source file is left in the watch folder:
//!
//! - wrong extension: skipped, logged at debug level
//! - file held open elsewhere: nothing touched, retried on the next event for that path
//! - malformed CSV: no report written
//! - archive name taken: no report left behind, nothing overwritten

pub mod archive;
mod observer;
mod task;

use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ReportError, ReportResult};
use crate::ingestion::{ingest_csv_from_bytes, is_supported_path};
use crate::processing::{classify, normalize};
use crate::prompt::TotalsPrompt;
use crate::report::ReportBuilder;
use crate::types::Table;

pub use observer::{CompositeObserver, TaskObserver, TracingObserver};
pub use task::{FileTask, TaskOutcome, TaskState};

/// Turns dropped CSV files into reports and archives them.
pub struct Pipeline {
    config: Config,
    observer: Arc<dyn TaskObserver>,
    prompt: Option<Arc<dyn TotalsPrompt>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("prompt_set", &self.prompt.is_some())
            .finish()
    }
}

impl Pipeline {
    /// Pipeline logging through [`TracingObserver`], with no interactive prompt.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            observer: Arc::new(TracingObserver),
            prompt: None,
        }
    }

    /// Replace the lifecycle observer.
    pub fn with_observer(mut self, observer: Arc<dyn TaskObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Prompt consulted for total columns when `ask_user_for_totals` is set.
    pub fn with_prompt(mut self, prompt: Arc<dyn TotalsPrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process one dropped file to a terminal state.
    pub fn process(&self, source: &Path) -> TaskOutcome {
        let mut task = FileTask::new(source);
        self.observer.on_transition(&task);

        let outcome = match self.run(&mut task) {
            Ok(outcome) => outcome,
            Err(e) => {
                let kind = e.kind();
                self.advance(&mut task, TaskState::Failed(kind));
                TaskOutcome::Failed {
                    kind,
                    error_type: e.type_name(),
                    message: e.to_string(),
                }
            }
        };

        self.observer.on_finished(&task, &outcome);
        outcome
    }

    fn run(&self, task: &mut FileTask) -> ReportResult<TaskOutcome> {
        if !is_supported_path(&task.source) {
            return Err(ReportError::UnsupportedFormat {
                path: task.source.clone(),
            });
        }
        self.advance(task, TaskState::Validated);

        let bytes = archive::read_source(&task.source)?;
        let mut table = ingest_csv_from_bytes(&bytes)?;
        info!(
            file = %task.file_name(),
            rows = table.row_count(),
            columns = table.column_count(),
            "csv file read"
        );
        self.advance(task, TaskState::Parsed);

        let archived = archive::archive_destination(&self.config.archive_folder, &task.source)?;

        let stats = normalize(&mut table);
        if !stats.coerced_columns.is_empty() {
            debug!(
                coerced = ?stats.coerced_columns,
                nulled_cells = stats.nulled_cells,
                "normalized decorated numeric columns"
            );
        }

        let explicit = self.explicit_columns(&table);
        let total_columns = classify(&table, explicit.as_deref());
        info!(
            numeric = ?numeric_columns(&table),
            selected = ?total_columns,
            explicit = explicit.is_some(),
            "columns selected for total row"
        );

        let report = ReportBuilder::new().build(&table, &total_columns);
        let bytes = report.save_to_buffer()?;
        let report_path =
            archive::write_unique_report(&self.config.output_folder, Local::now(), &bytes)?;
        self.advance(task, TaskState::Reported);

        if let Err(e) = archive::move_no_clobber(&task.source, &archived) {
            if let Err(cleanup) = std::fs::remove_file(&report_path) {
                warn!(report = %report_path.display(), error = %cleanup, "could not remove orphaned report");
            }
            return Err(e);
        }
        self.advance(task, TaskState::Archived);

        Ok(TaskOutcome::Archived {
            report: report_path,
            archived,
            rows: table.row_count(),
            total_columns,
        })
    }

    fn explicit_columns(&self, table: &Table) -> Option<Vec<String>> {
        if self.config.ask_user_for_totals {
            if let Some(prompt) = &self.prompt {
                if let Some(answer) = prompt.explicit_columns(&table.column_names()) {
                    return Some(answer);
                }
            }
        }
        self.config.total_columns.clone()
    }

    fn advance(&self, task: &mut FileTask, state: TaskState) {
        task.state = state;
        self.observer.on_transition(task);
    }
}

fn numeric_columns(table: &Table) -> Vec<&str> {
    table
        .schema
        .fields
        .iter()
        .filter(|f| f.data_type.is_numeric())
        .map(|f| f.name.as_str())
        .collect()
}

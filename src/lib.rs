//! `csv-report-watcher` watches a folder for dropped CSV files and turns each one into a
//! formatted `.xlsx` report with a total row, then moves the source into an archive folder.
//!
//! ## Pipeline
//!
//! For every arrival the [`pipeline::Pipeline`] runs:
//!
//! 1. **validate**: only `.csv` (case-insensitive) is accepted
//! 2. **parse**: [`ingestion::ingest_csv_from_bytes`] infers `Int64` / `Float64` / `Utf8` columns
//! 3. **normalize**: [`processing::normalize`] turns `$1,200.50`, `€3`, `15%` into floats
//! 4. **classify**: [`processing::classify`] picks the numeric columns that get a `SUM` formula,
//!    skipping identifier-like names (`id`, `age`, `year`, ...) unless a list is given explicitly
//! 5. **build**: [`report::ReportBuilder`] lays out the sheet:
//!    - row 1: `Report Date:` and today's date
//!    - row 3: table header, followed by the data rows (styled as an Excel table)
//!    - next row: `=SUM(...)` per total column, with a `Total:` label to its left
//! 6. **persist**: `report_<YYYYMMDD>_<HHMMSS>.xlsx` in the output folder
//! 7. **archive**: the source is moved into the archive folder, never overwriting
//!
//! Failures stay local to the file and are logged through `tracing`; see
//! [`error::FailureKind`] for the taxonomy.
//!
//! ## Quick example: build a report from CSV text
//!
//! ```rust
//! use csv_report_watcher::ingestion::ingest_csv_from_bytes;
//! use csv_report_watcher::processing::{classify, normalize};
//! use csv_report_watcher::report::ReportBuilder;
//!
//! let mut table = ingest_csv_from_bytes(b"ID,Item,Price\n1,Pen,$2.50\n2,Ink,$4.00\n3,Pad,$1.00\n").unwrap();
//! normalize(&mut table);
//! let totals = classify(&table, None);
//! assert_eq!(totals, vec!["Price"]);
//!
//! let report = ReportBuilder::new().build(&table, &totals);
//! assert_eq!(report.total_formulas(), vec![(3, "=SUM(C4:C6)")]);
//! ```
//!
//! ## Modules
//!
//! - [`config`]: JSON settings (`watch_folder`, `output_folder`, `archive_folder`, ...)
//! - [`ingestion`]: format recognition and CSV parsing
//! - [`processing`]: normalization and total-column selection
//! - [`report`]: report layout and `.xlsx` serialization
//! - [`pipeline`]: per-file state machine, archival and lifecycle observers
//! - [`watcher`]: folder subscription and the single dispatch worker
//! - [`prompt`]: interactive choice of total columns
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
pub mod prompt;
pub mod report;
pub mod types;
pub mod watcher;

pub use config::Config;
pub use error::{FailureKind, ReportError, ReportResult};

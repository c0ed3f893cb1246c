//! Report layout and serialization.
//!
//! - [`layout`]: row/column geometry and A1 references (bijective column letters)
//! - [`builder`]: [`ReportBuilder`] producing an in-memory [`Report`]
//! - [`writer`]: rendering a [`Report`] into a `rust_xlsxwriter` workbook
//!
//! ```rust
//! use chrono::NaiveDate;
//! use csv_report_watcher::ingestion::ingest_csv_from_bytes;
//! use csv_report_watcher::report::ReportBuilder;
//!
//! let table = ingest_csv_from_bytes(b"Item,Price\nPen,2.5\nInk,4\nPad,1\n").unwrap();
//! let report = ReportBuilder::new()
//!     .with_date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
//!     .build(&table, &["Price".to_string()]);
//!
//! assert_eq!(report.total_formulas(), vec![(2, "=SUM(B4:B6)")]);
//! let bytes = report.save_to_buffer().unwrap();
//! assert!(!bytes.is_empty());
//! ```

pub mod builder;
pub mod layout;
pub mod writer;

pub use builder::{CellContent, Report, ReportBuilder, ReportCell};
pub use layout::{cell_ref, column_letter, ReportLayout};
pub use writer::{SHEET_NAME, TABLE_NAME};

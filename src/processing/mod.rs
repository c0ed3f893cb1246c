//! In-memory table transformations that run between parsing and report building.
//!
//! - [`normalize()`]: turn decorated numeric text (`$1,200`, `15%`) into floats
//! - [`classify()`]: pick the columns that get a total-row formula
//!
//! ## Example: normalize → classify
//!
//! ```rust
//! use csv_report_watcher::ingestion::ingest_csv_from_bytes;
//! use csv_report_watcher::processing::{classify, normalize};
//!
//! let mut table = ingest_csv_from_bytes(b"OrderID,Item,Price\n1,Pen,$2.50\n2,Ink,$4.00\n").unwrap();
//! normalize(&mut table);
//!
//! // OrderID is numeric but identifier-like, so only Price is totaled.
//! assert_eq!(classify(&table, None), vec!["Price"]);
//! ```

pub mod classify;
pub mod normalize;

pub use classify::{classify, classify_columns, ColumnClass};
pub use normalize::{normalize, NormalizeStats};

//! Report construction.
//!
//! [`ReportBuilder::build`] turns a normalized [`Table`] plus the chosen total columns into a
//! [`Report`]: a sparse grid of cells with formatting, widths and the table region. Nothing here
//! touches the filesystem; see [`Report::to_workbook`] for serialization.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Local, NaiveDate};

use crate::types::{Table, Value};

use super::layout::ReportLayout;

/// Label written in A1.
pub const REPORT_DATE_LABEL: &str = "Report Date:";
/// Label written to the left of the first total formula.
pub const TOTAL_LABEL: &str = "Total:";
/// Extra character widths added to every auto-sized column.
pub const COLUMN_PADDING: usize = 2;

/// What a report cell holds.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// Literal text.
    Text(String),
    /// Literal number.
    Number(f64),
    /// Formula, including the leading `=`.
    Formula(String),
}

impl fmt::Display for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Formula(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A single written cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCell {
    /// Cell value.
    pub content: CellContent,
    /// Whether the cell is bold.
    pub bold: bool,
}

/// A fully laid-out report sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Region geometry.
    pub layout: ReportLayout,
    /// Table header names, in column order.
    pub headers: Vec<String>,
    /// Columns that received a total formula, in write order.
    pub total_columns: Vec<String>,
    /// Width (in characters) of every used column, index 0 = column A.
    pub column_widths: Vec<f64>,
    cells: BTreeMap<(u32, usize), ReportCell>,
}

impl Report {
    /// Cell at 1-based `row` and `col`, if anything was written there.
    pub fn cell(&self, row: u32, col: usize) -> Option<&ReportCell> {
        self.cells.get(&(row, col))
    }

    /// All written cells in row-major order as `((row, col), cell)`, 1-based.
    pub fn cells(&self) -> impl Iterator<Item = ((u32, usize), &ReportCell)> {
        self.cells.iter().map(|(k, v)| (*k, v))
    }

    /// Cells of a single row, left to right.
    pub fn row(&self, row: u32) -> impl Iterator<Item = (usize, &ReportCell)> {
        self.cells
            .range((row, 0)..(row + 1, 0))
            .map(|((_, col), cell)| (*col, cell))
    }

    /// Formulas in the total row as `(col, formula)`.
    pub fn total_formulas(&self) -> Vec<(usize, &str)> {
        self.row(self.layout.total_row())
            .filter_map(|(col, cell)| match &cell.content {
                CellContent::Formula(f) => Some((col, f.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Number of used columns (at least the table width).
    pub fn used_columns(&self) -> usize {
        self.cells.keys().map(|(_, c)| *c).max().unwrap_or(0)
    }

    fn put(&mut self, row: u32, col: usize, content: CellContent, bold: bool) {
        self.cells.insert((row, col), ReportCell { content, bold });
    }

    fn is_empty_at(&self, row: u32, col: usize) -> bool {
        match self.cells.get(&(row, col)) {
            None => true,
            Some(cell) => matches!(&cell.content, CellContent::Text(s) if s.is_empty()),
        }
    }
}

/// Lays out reports; holds the date stamped into the header.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    report_date: NaiveDate,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self {
            report_date: Local::now().date_naive(),
        }
    }
}

impl ReportBuilder {
    /// Builder stamping today's local date.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a fixed date instead of today.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.report_date = date;
        self
    }

    /// Date that will appear in B1.
    pub fn report_date(&self) -> NaiveDate {
        self.report_date
    }

    /// Lay out `table` with total formulas for `total_columns`.
    ///
    /// `total_columns` is processed in order. Names that are not table columns are ignored.
    pub fn build(&self, table: &Table, total_columns: &[String]) -> Report {
        let layout = ReportLayout::new(table.row_count(), table.column_count());
        let mut report = Report {
            layout,
            headers: table.column_names(),
            total_columns: Vec::new(),
            column_widths: Vec::new(),
            cells: BTreeMap::new(),
        };

        let meta = ReportLayout::METADATA_ROW;
        report.put(meta, 1, CellContent::Text(REPORT_DATE_LABEL.to_string()), true);
        report.put(
            meta,
            2,
            CellContent::Text(self.report_date.format("%Y-%m-%d").to_string()),
            true,
        );

        for (idx, name) in report.headers.clone().into_iter().enumerate() {
            report.put(ReportLayout::HEADER_ROW, idx + 1, CellContent::Text(name), true);
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let sheet_row = layout.data_row(row_idx);
            for (col_idx, value) in row.iter().enumerate() {
                let content = match value {
                    Value::Null => continue,
                    Value::Int64(v) => CellContent::Number(*v as f64),
                    Value::Float64(v) => CellContent::Number(*v),
                    Value::Utf8(s) => CellContent::Text(s.clone()),
                };
                report.put(sheet_row, col_idx + 1, content, false);
            }
        }

        let total_row = layout.total_row();
        for name in total_columns {
            let Some(idx) = table.schema.index_of(name) else {
                continue;
            };
            let col = idx + 1;
            report.put(total_row, col, CellContent::Formula(layout.sum_formula(col)), true);
            if col > 1 && report.is_empty_at(total_row, col - 1) {
                report.put(total_row, col - 1, CellContent::Text(TOTAL_LABEL.to_string()), true);
            }
            report.total_columns.push(name.clone());
        }

        report.column_widths = auto_widths(&report);
        report
    }
}

fn auto_widths(report: &Report) -> Vec<f64> {
    let mut widths = vec![0usize; report.used_columns()];
    for ((_, col), cell) in report.cells() {
        let len = cell.content.to_string().chars().count();
        if len > 0 {
            let slot = &mut widths[col - 1];
            *slot = (*slot).max(len);
        }
    }
    widths
        .into_iter()
        .map(|w| (w + COLUMN_PADDING) as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema};

    fn priced(rows: usize) -> Table {
        let schema = Schema::new(vec![
            Field::new("Item", DataType::Utf8),
            Field::new("Price", DataType::Float64),
        ]);
        let rows = (0..rows)
            .map(|i| vec![Value::Utf8(format!("item-{i}")), Value::Float64(i as f64 + 0.5)])
            .collect();
        Table::try_new(schema, rows).unwrap()
    }

    fn builder() -> ReportBuilder {
        ReportBuilder::new().with_date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
    }

    fn text(report: &Report, row: u32, col: usize) -> Option<String> {
        report.cell(row, col).map(|c| c.content.to_string())
    }

    #[test]
    fn header_block_and_data_rows() {
        let report = builder().build(&priced(2), &[]);

        assert_eq!(text(&report, 1, 1).as_deref(), Some("Report Date:"));
        assert_eq!(text(&report, 1, 2).as_deref(), Some("2024-03-09"));
        assert!(report.cell(1, 1).unwrap().bold && report.cell(1, 2).unwrap().bold);
        assert_eq!(report.row(ReportLayout::SEPARATOR_ROW).count(), 0);
        assert_eq!(text(&report, 3, 1).as_deref(), Some("Item"));
        assert!(report.cell(3, 2).unwrap().bold);
        assert_eq!(text(&report, 4, 1).as_deref(), Some("item-0"));
        assert_eq!(report.cell(5, 2).unwrap().content, CellContent::Number(1.5));
        assert!(!report.cell(5, 2).unwrap().bold);
    }

    #[test]
    fn three_rows_sum_into_row_seven() {
        let report = builder().build(&priced(3), &["Price".to_string()]);

        assert_eq!(report.total_formulas(), vec![(2, "=SUM(B4:B6)")]);
        assert!(report.cell(7, 2).unwrap().bold);
        let label = report.cell(7, 1).unwrap();
        assert_eq!(label.content, CellContent::Text("Total:".into()));
        assert!(label.bold);
    }

    #[test]
    fn no_total_columns_means_empty_total_row() {
        let report = builder().build(&priced(3), &[]);
        assert_eq!(report.row(report.layout.total_row()).count(), 0);
        assert!(report.cells().all(|(_, c)| c.content != CellContent::Text("Total:".into())));
    }

    #[test]
    fn zero_rows_put_totals_under_the_header() {
        let report = builder().build(&priced(0), &["Price".to_string()]);
        assert_eq!(report.layout.total_row(), 4);
        assert_eq!(report.total_formulas(), vec![(2, "=SUM(B4:B3)")]);
    }

    #[test]
    fn label_never_overwrites_and_formulas_win() {
        let schema = Schema::new(vec![
            Field::new("a", DataType::Int64),
            Field::new("b", DataType::Int64),
            Field::new("c", DataType::Int64),
        ]);
        let table = Table::try_new(
            schema,
            vec![vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)]],
        )
        .unwrap();

        let report = builder().build(&table, &["c".to_string(), "b".to_string()]);
        assert_eq!(text(&report, 5, 1).as_deref(), Some("Total:"));
        assert_eq!(text(&report, 5, 2).as_deref(), Some("=SUM(B4:B4)"));
        assert_eq!(text(&report, 5, 3).as_deref(), Some("=SUM(C4:C4)"));

        let report = builder().build(&table, &["a".to_string(), "b".to_string()]);
        assert_eq!(text(&report, 5, 1).as_deref(), Some("=SUM(A4:A4)"));
        assert_eq!(report.row(5).count(), 2);
    }

    #[test]
    fn widths_are_longest_text_plus_padding() {
        let report = builder().build(&priced(3), &["Price".to_string()]);
        // Column A: "Report Date:" (12); column B: "=SUM(B4:B6)" (11).
        assert_eq!(report.column_widths, vec![14.0, 13.0]);
    }

    #[test]
    fn nulls_are_left_blank() {
        let schema = Schema::new(vec![Field::new("Price", DataType::Float64)]);
        let table = Table::try_new(schema, vec![vec![Value::Null]]).unwrap();
        let report = builder().build(&table, &[]);
        assert!(report.cell(4, 1).is_none());
    }
}

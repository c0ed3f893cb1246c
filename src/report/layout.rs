//! Row/column geometry of a report sheet.
//!
//! All row and column numbers here are 1-based, as they appear in spreadsheet references.

/// Convert a 1-based column number to its letter name (`1 → A`, `27 → AA`, `703 → AAA`).
///
/// Uses bijective base-26, so there is no upper bound short of `usize`. Column `0` has no name and
/// yields an empty string.
pub fn column_letter(col: usize) -> String {
    let mut n = col;
    let mut out: Vec<u8> = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// A1-style reference for a 1-based row and column.
pub fn cell_ref(row: u32, col: usize) -> String {
    format!("{}{row}", column_letter(col))
}

/// Positions of the four regions of a report sheet.
///
/// ```text
/// row 1        metadata (label + date)
/// row 2        blank separator
/// row 3        table header
/// rows 4..     data rows
/// next row     total row
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLayout {
    /// Number of data rows below the header.
    pub data_rows: usize,
    /// Number of table columns.
    pub columns: usize,
}

impl ReportLayout {
    /// Row holding the report label and date.
    pub const METADATA_ROW: u32 = 1;
    /// Blank row between metadata and table.
    pub const SEPARATOR_ROW: u32 = 2;
    /// Table header row.
    pub const HEADER_ROW: u32 = 3;

    /// Layout for a table of the given shape.
    pub fn new(data_rows: usize, columns: usize) -> Self {
        Self { data_rows, columns }
    }

    /// First data row (even when there are no data rows).
    pub fn first_data_row(&self) -> u32 {
        Self::HEADER_ROW + 1
    }

    /// Last row of the table region; the header row when there is no data.
    pub fn last_data_row(&self) -> u32 {
        Self::HEADER_ROW + self.data_rows as u32
    }

    /// Row directly below the table region.
    pub fn total_row(&self) -> u32 {
        self.last_data_row() + 1
    }

    /// 1-based sheet row of the 0-based data row `idx`.
    pub fn data_row(&self, idx: usize) -> u32 {
        self.first_data_row() + idx as u32
    }

    /// A1-style range covering header through last data row, e.g. `A3:C6`.
    pub fn table_range(&self) -> String {
        format!(
            "{}:{}",
            cell_ref(Self::HEADER_ROW, 1),
            cell_ref(self.last_data_row(), self.columns.max(1))
        )
    }

    /// Sum formula for a 1-based table column over all data rows.
    pub fn sum_formula(&self, col: usize) -> String {
        let letter = column_letter(col);
        format!(
            "=SUM({letter}{}:{letter}{})",
            self.first_data_row(),
            self.last_data_row()
        )
    }
}

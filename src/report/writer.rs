//! Serialization of a [`Report`] through `rust_xlsxwriter`.

use rust_xlsxwriter::{Format, Formula, Table, TableColumn, TableStyle, Workbook};
use tracing::debug;

use crate::error::ReportResult;

use super::builder::{CellContent, Report};
use super::layout::ReportLayout;

/// Name of the single worksheet in every report.
pub const SHEET_NAME: &str = "Report";
/// Display name of the styled table region.
pub const TABLE_NAME: &str = "DataTable";

impl Report {
    /// Render into a new workbook with one `Report` worksheet.
    pub fn to_workbook(&self) -> ReportResult<Workbook> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let plain = Format::new();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for ((row, col), cell) in self.cells() {
            let (r, c) = (row - 1, (col - 1) as u16);
            let format = if cell.bold { &bold } else { &plain };
            match &cell.content {
                CellContent::Text(s) => {
                    worksheet.write_string_with_format(r, c, s, format)?;
                }
                CellContent::Number(n) => {
                    worksheet.write_number_with_format(r, c, *n, format)?;
                }
                CellContent::Formula(f) => {
                    worksheet.write_formula_with_format(r, c, Formula::new(f), format)?;
                }
            }
        }

        // A native table needs at least one data row below its header.
        if self.layout.data_rows > 0 && !self.headers.is_empty() {
            let columns: Vec<TableColumn> = self
                .headers
                .iter()
                .map(|h| TableColumn::new().set_header(h).set_header_format(bold.clone()))
                .collect();
            let table = Table::new()
                .set_name(TABLE_NAME)
                .set_style(TableStyle::Medium9)
                .set_banded_rows(true)
                .set_first_column(false)
                .set_last_column(false)
                .set_columns(&columns);
            worksheet.add_table(
                ReportLayout::HEADER_ROW - 1,
                0,
                self.layout.last_data_row() - 1,
                (self.headers.len() - 1) as u16,
                &table,
            )?;
        } else {
            debug!(range = %self.layout.table_range(), "header-only table; skipping table object");
        }

        for (idx, width) in self.column_widths.iter().enumerate() {
            worksheet.set_column_width(idx as u16, *width)?;
        }

        Ok(workbook)
    }

    /// Render and serialize to `.xlsx` bytes.
    pub fn save_to_buffer(&self) -> ReportResult<Vec<u8>> {
        let mut workbook = self.to_workbook()?;
        Ok(workbook.save_to_buffer()?)
    }
}

//! Numeric normalization for text columns.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{DataType, Table, Value};

/// A cell "looks numeric" when it starts with a digit, optionally behind a currency sign and whitespace.
static NUMERIC_LOOKING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[$€£]?\s*\d").expect("valid numeric-looking pattern"));

/// Summary of what [`normalize`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    /// Columns retyped from `Utf8` to `Float64`, in table order.
    pub coerced_columns: Vec<String>,
    /// Cells in coerced columns that could not be parsed and became null.
    pub nulled_cells: usize,
}

/// Strip currency, percentage and thousands decoration from text columns in place.
///
/// Any `Utf8` column with at least one numeric-looking cell is committed to `Float64`: every cell
/// keeps only ASCII digits, `.` and `-`, and is parsed as a float; failures become
/// [`Value::Null`]. Other columns are left untouched. Row count never changes.
pub fn normalize(table: &mut Table) -> NormalizeStats {
    let mut stats = NormalizeStats::default();

    for idx in 0..table.column_count() {
        if table.schema.fields[idx].data_type != DataType::Utf8 {
            continue;
        }
        let commit = table.column_values(idx).any(|v| match v {
            Value::Utf8(s) => NUMERIC_LOOKING.is_match(s),
            _ => false,
        });
        if !commit {
            continue;
        }

        for row in &mut table.rows {
            let cell = &mut row[idx];
            let coerced = match cell {
                Value::Utf8(s) => parse_decorated(s),
                _ => None,
            };
            if coerced.is_none() && !cell.is_null() {
                stats.nulled_cells += 1;
            }
            *cell = coerced.map(Value::Float64).unwrap_or(Value::Null);
        }

        let field = &mut table.schema.fields[idx];
        field.data_type = DataType::Float64;
        stats.coerced_columns.push(field.name.clone());
    }

    stats
}

fn parse_decorated(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

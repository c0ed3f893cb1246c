//! Choosing which columns get a total.

use crate::types::Table;

/// Name fragments that mark a numeric column as an identifier or a date part.
///
/// Matched case-insensitively as substrings; includes Turkish spellings of year/age/birth.
pub const EXCLUDED_KEYWORDS: &[&str] = &["id", "age", "year", "yıl", "yas", "doğum", "dogum"];

/// Role of a column in the total row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnClass {
    /// Numeric and summed.
    Totalable,
    /// Numeric, but identifier/temporal-like; never summed.
    Excluded,
    /// Not numeric.
    NonNumeric,
}

/// `true` if `name` contains one of [`EXCLUDED_KEYWORDS`].
pub fn is_excluded_name(name: &str) -> bool {
    let normalized = name.trim().to_lowercase();
    EXCLUDED_KEYWORDS.iter().any(|kw| normalized.contains(kw))
}

/// Tag every column of `table` in column order.
pub fn classify_columns(table: &Table) -> Vec<(String, ColumnClass)> {
    table
        .schema
        .fields
        .iter()
        .map(|f| {
            let class = if !f.data_type.is_numeric() {
                ColumnClass::NonNumeric
            } else if is_excluded_name(&f.name) {
                ColumnClass::Excluded
            } else {
                ColumnClass::Totalable
            };
            (f.name.clone(), class)
        })
        .collect()
}

/// Columns that receive a total, in the order they should be written.
///
/// With `explicit`, returns the listed names that exist in `table` (caller's order, trimmed,
/// duplicates dropped) and applies no heuristics. Without it, returns every
/// [`ColumnClass::Totalable`] column in table order. An empty result means "no total row".
pub fn classify(table: &Table, explicit: Option<&[String]>) -> Vec<String> {
    match explicit {
        Some(names) => {
            let mut out: Vec<String> = Vec::new();
            for name in names.iter().map(|n| n.trim()) {
                if table.schema.index_of(name).is_some() && !out.iter().any(|o| o == name) {
                    out.push(name.to_owned());
                }
            }
            out
        }
        None => classify_columns(table)
            .into_iter()
            .filter(|(_, class)| *class == ColumnClass::Totalable)
            .map(|(name, _)| name)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema, Table};

    fn table(fields: &[(&str, DataType)]) -> Table {
        let schema = Schema::new(fields.iter().map(|(n, t)| Field::new(*n, *t)).collect());
        Table::try_new(schema, vec![]).unwrap()
    }

    #[test]
    fn auto_skips_identifier_and_temporal_columns() {
        let t = table(&[
            ("CustomerID", DataType::Int64),
            ("Price", DataType::Float64),
            ("Age", DataType::Int64),
            ("Fiscal Year", DataType::Int64),
            ("Doğum Yılı", DataType::Int64),
            ("Name", DataType::Utf8),
            ("Qty", DataType::Int64),
        ]);
        assert_eq!(classify(&t, None), vec!["Price", "Qty"]);
    }

    #[test]
    fn substring_match_is_aggressive() {
        // "Paid" contains "id"; the heuristic is a plain substring test.
        let t = table(&[("Paid", DataType::Float64), ("Package", DataType::Float64)]);
        assert!(classify(&t, None).is_empty());
    }

    #[test]
    fn explicit_list_drops_unknown_names_and_keeps_order() {
        let t = table(&[("Budget", DataType::Float64), ("Name", DataType::Utf8)]);
        let explicit = vec!["Budget".to_string(), "Ghost".to_string()];
        assert_eq!(classify(&t, Some(&explicit)), vec!["Budget"]);

        let t = table(&[("a", DataType::Int64), ("b", DataType::Int64)]);
        let explicit = vec![" b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(classify(&t, Some(&explicit)), vec!["b", "a"]);
    }

    #[test]
    fn explicit_list_bypasses_exclusions() {
        let t = table(&[("id", DataType::Int64)]);
        let explicit = vec!["id".to_string()];
        assert_eq!(classify(&t, Some(&explicit)), vec!["id"]);
    }

    #[test]
    fn classify_columns_tags_every_column() {
        let t = table(&[
            ("id", DataType::Int64),
            ("amount", DataType::Float64),
            ("name", DataType::Utf8),
        ]);
        let tags: Vec<_> = classify_columns(&t).into_iter().map(|(_, c)| c).collect();
        assert_eq!(
            tags,
            vec![ColumnClass::Excluded, ColumnClass::Totalable, ColumnClass::NonNumeric]
        );
    }
}

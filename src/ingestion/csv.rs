//! CSV ingestion with column type inference.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{ReportError, ReportResult};
use crate::types::{DataType, Field, Schema, Table, Value};

/// Cell contents treated as a missing value (compared after trimming).
const NULL_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A"];

/// Ingest a CSV file into an in-memory [`Table`].
///
/// Rules:
///
/// - The first record is the header row; an input without one is a parse error.
/// - Every record must have as many fields as the header.
/// - Blank header cells are named `Unnamed: <idx>` (0-based position).
/// - Repeated header names, compared ignoring case, get `.1`, `.2`, ... suffixes.
/// - Column types are inferred: all non-null cells are integers → `Int64`, all are finite floats →
///   `Float64`, otherwise `Utf8`. Columns with only nulls are `Utf8`.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> ReportResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data that has already been read into memory.
pub fn ingest_csv_from_bytes(bytes: &[u8]) -> ReportResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> ReportResult<Table> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(ReportError::Parse {
            message: "no header row".to_string(),
        });
    }
    let names = dedupe_names(headers.iter());

    let mut raw: Vec<csv::StringRecord> = Vec::new();
    for result in rdr.records() {
        raw.push(result?);
    }

    let types: Vec<DataType> = (0..names.len())
        .map(|idx| infer_type(raw.iter().map(|r| r.get(idx).unwrap_or(""))))
        .collect();

    let rows = raw
        .iter()
        .map(|record| {
            types
                .iter()
                .enumerate()
                .map(|(idx, dt)| typed_value(*dt, record.get(idx).unwrap_or("")))
                .collect()
        })
        .collect();

    let schema = Schema::new(
        names
            .into_iter()
            .zip(types)
            .map(|(name, dt)| Field::new(name, dt))
            .collect(),
    );
    Table::try_new(schema, rows)
}

fn is_null_token(raw: &str) -> bool {
    NULL_TOKENS.contains(&raw.trim())
}

fn dedupe_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    // Spreadsheet table headers must be unique ignoring case.
    let mut seen: HashSet<String> = HashSet::new();
    for (idx, raw) in headers.enumerate() {
        let name = if raw.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            raw.to_string()
        };
        let mut candidate = name.clone();
        let mut n = 0;
        while !seen.insert(candidate.to_lowercase()) {
            n += 1;
            candidate = format!("{name}.{n}");
        }
        out.push(candidate);
    }
    out
}

fn infer_type<'a>(cells: impl Iterator<Item = &'a str>) -> DataType {
    let mut seen = false;
    let mut all_int = true;
    let mut all_float = true;
    for raw in cells.filter(|c| !is_null_token(c)) {
        seen = true;
        let trimmed = raw.trim();
        if all_int && trimmed.parse::<i64>().is_err() {
            all_int = false;
        }
        if !all_int && !trimmed.parse::<f64>().is_ok_and(f64::is_finite) {
            all_float = false;
            break;
        }
    }
    match (seen, all_int, all_float) {
        (false, _, _) => DataType::Utf8,
        (true, true, _) => DataType::Int64,
        (true, false, true) => DataType::Float64,
        _ => DataType::Utf8,
    }
}

fn typed_value(data_type: DataType, raw: &str) -> Value {
    if is_null_token(raw) {
        return Value::Null;
    }
    let trimmed = raw.trim();
    match data_type {
        DataType::Int64 => trimmed.parse().map(Value::Int64).unwrap_or(Value::Null),
        DataType::Float64 => trimmed.parse().map(Value::Float64).unwrap_or(Value::Null),
        DataType::Utf8 => Value::Utf8(raw.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_int_float_and_text() {
        let table = ingest_csv_from_bytes(b"id,price,name\n1,2.5,Ada\n2,3,Grace\n").unwrap();
        let types: Vec<_> = table.schema.fields.iter().map(|f| f.data_type).collect();
        assert_eq!(types, vec![DataType::Int64, DataType::Float64, DataType::Utf8]);
        assert_eq!(table.rows[1][1], Value::Float64(3.0));
    }

    #[test]
    fn null_tokens_do_not_break_inference() {
        let table = ingest_csv_from_bytes(b"qty\n1\n\nNA\n4\n").unwrap();
        assert_eq!(table.schema.fields[0].data_type, DataType::Int64);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows[1][0], Value::Null);
    }

    #[test]
    fn all_null_column_is_text() {
        let table = ingest_csv_from_bytes(b"a,b\n1,\n2,\n").unwrap();
        assert_eq!(table.schema.fields[1].data_type, DataType::Utf8);
    }

    #[test]
    fn repeated_headers_get_suffixes() {
        let table = ingest_csv_from_bytes(b"x,x,x\n1,2,3\n").unwrap();
        assert_eq!(table.column_names(), vec!["x", "x.1", "x.2"]);
    }

    #[test]
    fn headers_differing_only_in_case_are_suffixed() {
        let table = ingest_csv_from_bytes(b"Price,price,PRICE\n1,2,3\n").unwrap();
        assert_eq!(table.column_names(), vec!["Price", "price.1", "PRICE.2"]);
    }

    #[test]
    fn blank_headers_are_named_by_position() {
        let table = ingest_csv_from_bytes(b"a,,b, \n1,2,3,4\n").unwrap();
        assert_eq!(table.column_names(), vec!["a", "Unnamed: 1", "b", "Unnamed: 3"]);
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        let err = ingest_csv_from_bytes(b"").unwrap_err();
        assert!(err.to_string().contains("no header row"));
    }

    #[test]
    fn currency_text_stays_text_until_normalized() {
        let table = ingest_csv_from_bytes(b"price\n$1\n$2\n").unwrap();
        assert_eq!(table.schema.fields[0].data_type, DataType::Utf8);
        assert_eq!(table.rows[0][0], Value::Utf8("$1".into()));
    }
}

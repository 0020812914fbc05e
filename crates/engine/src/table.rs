//! Table model: an ordered column list plus rows of named cells.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A single row: column name → cell value.
pub type Row = FxHashMap<String, Value>;

static NULL: Value = Value::Null;

/// Read a cell by column name. Absent keys read as `Null`.
pub fn cell<'a>(row: &'a Row, col: &str) -> &'a Value {
    row.get(col).unwrap_or(&NULL)
}

/// An in-memory table.
///
/// `columns` is unique and order-significant: it defines display and export
/// order, and it is the field order for canonical row signatures. Rows are
/// maps, so a row may briefly carry keys outside `columns` mid-computation;
/// reads go through [`cell`] and normalize absent keys to `Null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Empty table: no columns, no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }
}

/// Canonical row identity for duplicate detection.
///
/// Serializes the row's cells as a JSON array in explicit column order, so
/// the signature is stable regardless of map iteration order. Cells that
/// cannot serialize (non-finite floats) degrade to JSON null.
pub fn row_signature(columns: &[String], row: &Row) -> String {
    let cells: Vec<serde_json::Value> = columns
        .iter()
        .map(|c| serde_json::to_value(cell(row, c)).unwrap_or(serde_json::Value::Null))
        .collect();
    serde_json::Value::Array(cells).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn absent_key_reads_as_null() {
        let r = row(&[("A", Value::Number(1.0))]);
        assert_eq!(cell(&r, "A"), &Value::Number(1.0));
        assert_eq!(cell(&r, "B"), &Value::Null);
    }

    #[test]
    fn signature_follows_column_order() {
        let cols_ab = vec!["A".to_string(), "B".to_string()];
        let cols_ba = vec!["B".to_string(), "A".to_string()];
        let r = row(&[("A", Value::Number(1.0)), ("B", Value::Text("x".into()))]);

        assert_eq!(row_signature(&cols_ab, &r), r#"[1.0,"x"]"#);
        assert_eq!(row_signature(&cols_ba, &r), r#"["x",1.0]"#);
    }

    #[test]
    fn signature_identical_for_equal_rows() {
        let cols = vec!["A".to_string(), "B".to_string()];
        let r1 = row(&[("A", Value::Null), ("B", Value::Text("y".into()))]);
        // Same cells, built in a different insertion order
        let r2 = row(&[("B", Value::Text("y".into())), ("A", Value::Null)]);
        assert_eq!(row_signature(&cols, &r1), row_signature(&cols, &r2));
    }

    #[test]
    fn signature_treats_missing_as_null() {
        let cols = vec!["A".to_string(), "B".to_string()];
        let explicit = row(&[("A", Value::Number(1.0)), ("B", Value::Null)]);
        let missing = row(&[("A", Value::Number(1.0))]);
        assert_eq!(row_signature(&cols, &explicit), row_signature(&cols, &missing));
    }
}

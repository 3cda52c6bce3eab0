use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// In-memory results table: named columns, one row per trial, JSON
/// scalars as cells. Every row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultsTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row. The cell count must match the column count.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::ColumnMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    /// Cell at (row, column name), if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// One entry per row: the cell coerced to f64 where possible,
    /// `None` for nulls and non-numeric values.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| coerce_numeric(&r[idx])).collect())
    }

    /// One label per row, for grouping and chart axes. Strings pass
    /// through unquoted, nulls become the empty string.
    pub fn label_column(&self, name: &str) -> Result<Vec<String>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| cell_label(&r[idx])).collect())
    }

    /// Row indices grouped by a column's labels, groups in first-seen
    /// order, indices in row order within each group.
    pub fn group_rows(&self, column: &str) -> Result<Vec<(String, Vec<usize>)>> {
        let labels = self.label_column(column)?;
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        for (i, label) in labels.into_iter().enumerate() {
            match groups.iter_mut().find(|(l, _)| *l == label) {
                Some((_, idxs)) => idxs.push(i),
                None => groups.push((label, vec![i])),
            }
        }
        Ok(groups)
    }

    /// Column names starting with `prefix` whose non-null cells all
    /// coerce to numbers (and at least one does).
    pub fn numeric_columns_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.columns
            .iter()
            .filter(|name| name.starts_with(prefix))
            .filter(|name| self.is_numeric_column(name))
            .cloned()
            .collect()
    }

    /// All numeric columns, regardless of prefix.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.numeric_columns_with_prefix("")
    }

    fn is_numeric_column(&self, name: &str) -> bool {
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => return false,
        };
        let mut seen = false;
        for row in &self.rows {
            match &row[idx] {
                Value::Null => {}
                v => {
                    if coerce_numeric(v).is_none() {
                        return false;
                    }
                    seen = true;
                }
            }
        }
        seen
    }

    /// One JSON object per row, keyed by column name.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

/// `pd.to_numeric(errors="coerce")` semantics: numbers pass through,
/// numeric strings parse, bools map to 0/1, everything else is None.
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn cell_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        v => v.to_string(),
    }
}

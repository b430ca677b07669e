use std::fmt;

use anyhow::{Result, bail};

// ---------------------------------------------------------------------------
// Value – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes of the source dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Null => write!(f, ""),
        }
    }
}

impl Value {
    /// Interpret the value as `f64` for numeric work.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Interpret the value as `i64` (floats are truncated).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(v) if v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – ordered rows with a fixed named-column schema
// ---------------------------------------------------------------------------

/// Ordered sequence of rows over a fixed set of named columns.
///
/// Every pipeline stage takes a `&Table` and returns a new `Table`; nothing
/// mutates a table in place after it is built, so the loaded dataset can be
/// shared read-only across all chart recomputations.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given column schema.
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column in the schema.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (row, column name); `None` when either is out of range.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Append a row. The row must match the schema width.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            bail!(
                "row has {} cells but table has {} columns",
                row.len(),
                self.columns.len()
            );
        }
        self.rows.push(row);
        Ok(())
    }

    /// Project onto a subset of columns, in the given order.
    /// Fails on an unknown column name.
    pub fn project(&self, columns: &[String]) -> Result<Table> {
        let indices: Vec<usize> = columns
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| anyhow::anyhow!("unknown column '{name}'"))
            })
            .collect::<Result<_>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(Table {
            columns: columns.to_vec(),
            rows,
        })
    }

    /// Return a new table with an extra column appended.
    /// `values` must have one entry per row.
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> Result<Table> {
        if values.len() != self.rows.len() {
            bail!(
                "column '{name}' has {} values but table has {} rows",
                values.len(),
                self.rows.len()
            );
        }
        let mut columns = self.columns.clone();
        columns.push(name.to_string());

        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, v)| {
                let mut row = row.clone();
                row.push(v);
                row
            })
            .collect();

        Ok(Table { columns, rows })
    }

    /// Extract a column as `f64`, with `NaN` for missing / non-numeric cells.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| anyhow::anyhow!("unknown column '{name}'"))?;
        Ok(self
            .rows
            .iter()
            .map(|row| row[idx].as_f64().unwrap_or(f64::NAN))
            .collect())
    }

    /// Keep only the rows for which `keep` returns true, preserving order.
    pub fn retain_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[Value]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(vec!["Year".into(), "State".into(), "Robbery".into()]);
        t.push_row(vec![
            Value::Integer(2010),
            Value::Text("Texas".into()),
            Value::Float(5.0),
        ])
        .unwrap();
        t.push_row(vec![
            Value::Integer(2011),
            Value::Text("Texas".into()),
            Value::Null,
        ])
        .unwrap();
        t
    }

    #[test]
    fn project_reorders_and_subsets() {
        let t = sample();
        let p = t.project(&["Robbery".into(), "Year".into()]).unwrap();
        assert_eq!(p.columns(), ["Robbery", "Year"]);
        assert_eq!(p.cell(0, "Year"), Some(&Value::Integer(2010)));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn project_unknown_column_fails() {
        assert!(sample().project(&["nope".into()]).is_err());
    }

    #[test]
    fn with_column_appends() {
        let t = sample();
        let t2 = t
            .with_column("total_crimes", vec![Value::Float(5.0), Value::Float(0.0)])
            .unwrap();
        assert_eq!(
            t2.columns().last().map(String::as_str),
            Some("total_crimes")
        );
        assert_eq!(t2.cell(1, "total_crimes"), Some(&Value::Float(0.0)));
        // source table untouched
        assert_eq!(t.columns().len(), 3);
    }

    #[test]
    fn with_column_length_mismatch_fails() {
        assert!(sample().with_column("total", vec![Value::Null]).is_err());
    }

    #[test]
    fn numeric_column_nan_for_missing() {
        let vals = sample().numeric_column("Robbery").unwrap();
        assert_eq!(vals[0], 5.0);
        assert!(vals[1].is_nan());
    }

    #[test]
    fn push_row_width_checked() {
        let mut t = sample();
        assert!(t.push_row(vec![Value::Null]).is_err());
    }
}

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Table, Value};
use super::schema::{BASE_COLUMNS, CRIME_TYPES_ORIGINAL, VARIABLES, display_name};

/// Where the merged dataset lives relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/year_df.csv";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset file is missing/unreadable or an expected column is absent.
    /// There is no partial load: the whole dataset is rejected.
    #[error("dataset unavailable: {0}")]
    DataUnavailable(String),

    /// The file was found but its contents could not be parsed.
    #[error("malformed dataset: {0:#}")]
    Malformed(anyhow::Error),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the dataset from the fixed default location.
pub fn load_default() -> Result<Table, LoadError> {
    load(Path::new(DEFAULT_DATA_PATH))
}

/// Load the merged state-level dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – delimited file with one header row (primary format)
/// * `.json`    – records-oriented array `[{ "Year": 2010, ... }, ...]`
/// * `.parquet` – flat columnar file with the same columns
///
/// Whatever the format, the result is restricted to the identifier,
/// variable, and crime columns of [`super::schema`], with the crime columns
/// renamed to their Title Case display names.
pub fn load(path: &Path) -> Result<Table, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(LoadError::DataUnavailable(format!(
                "unsupported file extension: .{other}"
            )));
        }
    };

    select_and_rename(&raw)
}

/// Project the raw table onto the expected columns and rename the crime
/// columns to display form. A missing expected column fails the whole load.
fn select_and_rename(raw: &Table) -> Result<Table, LoadError> {
    let mut source_names: Vec<&str> = Vec::new();
    let mut output_names: Vec<String> = Vec::new();

    for col in BASE_COLUMNS.iter().chain(VARIABLES.iter()) {
        source_names.push(*col);
        output_names.push((*col).to_string());
    }
    for col in CRIME_TYPES_ORIGINAL {
        source_names.push(col);
        output_names.push(display_name(col));
    }

    let indices: Vec<usize> = source_names
        .iter()
        .map(|name| {
            raw.column_index(name)
                .ok_or_else(|| LoadError::DataUnavailable(format!("missing column '{name}'")))
        })
        .collect::<Result<_, _>>()?;

    let mut table = Table::new(output_names);
    for row in raw.rows() {
        let cells = indices.iter().map(|&i| row[i].clone()).collect();
        table.push_row(cells).map_err(LoadError::Malformed)?;
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table, LoadError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| LoadError::DataUnavailable(format!("{}: {e}", path.display())))?;

    read_csv_rows(&mut reader).map_err(LoadError::Malformed)
}

fn read_csv_rows<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Table> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = Table::new(headers);
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells = record.iter().map(parse_cell).collect();
        table.push_row(cells)?;
    }
    Ok(table)
}

/// Type inference for a CSV cell: integer, then float, else text.
fn parse_cell(s: &str) -> Value {
    let s = s.trim();
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')` layout:
///
/// ```json
/// [
///   { "Year": 2010, "State": "Texas", "State_Abbrev": "TX", "robbery": 5, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table, LoadError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| LoadError::DataUnavailable(format!("{}: {e}", path.display())))?;

    parse_json_records(&text).map_err(LoadError::Malformed)
}

fn parse_json_records(text: &str) -> Result<Table> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("expected top-level JSON array")?;

    // Column order comes from the first record; later records may list keys
    // in any order but must not introduce new ones.
    let mut columns: Vec<String> = Vec::new();
    if let Some(first) = records.first() {
        let obj = first.as_object().context("row 0 is not a JSON object")?;
        columns = obj.keys().cloned().collect();
    }

    let mut table = Table::new(columns.clone());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))?;

        let cells = columns
            .iter()
            .map(|col| obj.get(col).map(json_to_value).unwrap_or(Value::Null))
            .collect();
        table.push_row(cells)?;
    }
    Ok(table)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::Text(n.to_string())
            }
        }
        JsonValue::Null => Value::Null,
        other => Value::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Flat Parquet file with scalar columns. Works with files written by both
/// Pandas (`df.to_parquet()`) and Polars (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table, LoadError> {
    let file = std::fs::File::open(path)
        .map_err(|e| LoadError::DataUnavailable(format!("{}: {e}", path.display())))?;

    read_parquet_rows(file).map_err(LoadError::Malformed)
}

fn read_parquet_rows(file: std::fs::File) -> Result<Table> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut table: Option<Table> = None;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let table = table.get_or_insert_with(|| {
            Table::new(schema.fields().iter().map(|f| f.name().clone()).collect())
        });

        for row in 0..batch.num_rows() {
            let cells = (0..batch.num_columns())
                .map(|col| {
                    extract_value(batch.column(col), row)
                        .with_context(|| format!("column '{}'", schema.field(col).name()))
                })
                .collect::<Result<_>>()?;
            table.push_row(cells)?;
        }
    }

    Ok(table.unwrap_or_default())
}

/// Extract a single scalar cell from an Arrow column at a given row.
/// A column type outside the supported scalar set fails the whole load;
/// silently coercing it would corrupt every row of that column.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                Value::Text(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                Value::Text(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>();
            arr.map_or(Value::Null, |a| Value::Integer(a.value(row) as i64))
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>();
            arr.map_or(Value::Null, |a| Value::Integer(a.value(row)))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>();
            arr.map_or(Value::Null, |a| Value::Float(a.value(row) as f64))
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>();
            arr.map_or(Value::Null, |a| Value::Float(a.value(row)))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>();
            arr.map_or(Value::Null, |a| Value::Integer(i64::from(a.value(row))))
        }
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}

//! Column-oriented CSV tables backed by Arrow's CSV reader

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};

use crate::{Error, Result};

/// A single table column
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Numeric cells (integers are widened to f64); `None` for empty cells
    Numeric(Vec<Option<f64>>),
    /// Everything else, kept verbatim
    Text(Vec<Option<String>>),
}

impl Column {
    fn empty_for(data_type: &DataType) -> Self {
        if *data_type == DataType::Float64 {
            Column::Numeric(Vec::new())
        } else {
            Column::Text(Vec::new())
        }
    }

    fn extend_from(&mut self, name: &str, array: &ArrayRef) -> Result<()> {
        match self {
            Column::Numeric(values) => {
                let arr = array.as_any().downcast_ref::<Float64Array>().ok_or_else(|| {
                    Error::Data(format!("column '{name}' is not Float64"))
                })?;
                values.extend(arr.iter());
            }
            Column::Text(values) => {
                let arr = array.as_any().downcast_ref::<StringArray>().ok_or_else(|| {
                    Error::Data(format!("column '{name}' is not Utf8"))
                })?;
                values.extend(arr.iter().map(|v| v.map(str::to_string)));
            }
        }
        Ok(())
    }

    /// Number of cells, including empty ones
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    /// Whether the column holds no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }
}

/// A CSV table held column-wise, in header order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    names: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
}

impl FeatureTable {
    /// Build a table from named columns
    ///
    /// Columns shorter than the longest one are treated as ragged input and
    /// rejected.
    pub fn from_columns(columns: Vec<(String, Column)>) -> Result<Self> {
        let rows = columns.iter().map(|(_, c)| c.len()).max().unwrap_or(0);
        if let Some((name, _)) = columns.iter().find(|(_, c)| c.len() != rows) {
            return Err(Error::Data(format!("column '{name}' has a different length")));
        }
        let (names, columns) = columns.into_iter().unzip();
        Ok(Self { names, columns, rows })
    }

    /// Load a CSV file with a header row
    ///
    /// Column types are inferred from the data. Numeric columns are read as
    /// `f64`; all other columns (strings, booleans, timestamps) are read as text.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (inferred, _) = Format::default()
            .with_header(true)
            .infer_schema(File::open(path)?, None)?;
        let schema = Arc::new(normalize_schema(&inferred));

        let reader = ReaderBuilder::new(schema.clone())
            .with_header(true)
            .build(File::open(path)?)?;

        let names: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
        let mut columns: Vec<Column> = schema
            .fields()
            .iter()
            .map(|f| Column::empty_for(f.data_type()))
            .collect();

        let mut rows = 0;
        for batch in reader {
            let batch = batch?;
            rows += batch.num_rows();
            for (idx, column) in columns.iter_mut().enumerate() {
                column.extend_from(&names[idx], batch.column(idx))?;
            }
        }

        tracing::debug!(path = %path.display(), rows, columns = names.len(), "loaded feature table");
        Ok(Self { names, columns, rows })
    }

    /// Column names in header order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Names of numeric columns, in header order
    pub fn numeric_columns(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .zip(&self.columns)
            .filter(|(_, c)| c.is_numeric())
            .map(|(n, _)| n.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names.iter().position(|n| n == name).map(|idx| &self.columns[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Finite values of a numeric column, empty cells dropped
    ///
    /// Returns `None` if the column is absent or not numeric.
    pub fn numeric_values(&self, name: &str) -> Option<Vec<f64>> {
        match self.column(name)? {
            Column::Numeric(values) => {
                Some(values.iter().flatten().copied().filter(|v| v.is_finite()).collect())
            }
            Column::Text(_) => None,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Map every inferred type to Float64 (numeric) or Utf8 (everything else)
fn normalize_schema(inferred: &Schema) -> Schema {
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| {
            let data_type =
                if f.data_type().is_numeric() { DataType::Float64 } else { DataType::Utf8 };
            Field::new(f.name(), data_type, true)
        })
        .collect();
    Schema::new(fields)
}

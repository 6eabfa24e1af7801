use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One column of a [`Dataset`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Numeric observations; NaN and infinities are treated as missing
    Numeric(Vec<f64>),
    /// Text labels; `None` is missing
    Text(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Text(_) => "text",
        }
    }
}

/// A table of observations with uniquely named, equally long columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Start building a dataset
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::new()
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Column names in insertion order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    /// Numeric values of a column
    ///
    /// Fails with `InvalidInput` if the column is missing or not numeric.
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name) {
            Some(Column::Numeric(values)) => Ok(values),
            Some(other) => Err(Error::InvalidInput(format!(
                "column '{name}' is {}, expected numeric",
                other.type_name()
            ))),
            None => Err(Error::missing_column(name)),
        }
    }
}

/// Builder for [`Dataset`]
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a numeric column
    pub fn numeric(self, name: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        self.column(name, Column::Numeric(values.into()))
    }

    /// Add a text column with no missing labels
    pub fn text<S: ToString>(self, name: impl Into<String>, values: &[S]) -> Self {
        let values = values.iter().map(|v| Some(v.to_string())).collect();
        self.column(name, Column::Text(values))
    }

    /// Add a text column that may contain missing labels
    pub fn optional_text(self, name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        self.column(name, Column::Text(values))
    }

    /// Add an already constructed column
    pub fn column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.names.push(name.into());
        self.columns.push(column);
        self
    }

    /// Build the dataset
    ///
    /// Fails with `InvalidInput` when there are no columns, a name repeats,
    /// or the columns differ in length.
    pub fn build(self) -> Result<Dataset> {
        let Some(first) = self.columns.first() else {
            return Err(Error::InvalidInput("dataset has no columns".to_string()));
        };
        let n_rows = first.len();

        for (i, name) in self.names.iter().enumerate() {
            if name.is_empty() {
                return Err(Error::InvalidInput("column names must not be empty".to_string()));
            }
            if self.names[..i].contains(name) {
                return Err(Error::InvalidInput(format!("duplicate column '{name}'")));
            }
            let len = self.columns[i].len();
            if len != n_rows {
                return Err(Error::size_mismatch(n_rows, len, &format!("column '{name}'")));
            }
        }

        Ok(Dataset {
            names: self.names,
            columns: self.columns,
            n_rows,
        })
    }
}

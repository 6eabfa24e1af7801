use super::{Column, Dataset};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of one longitudinal unit
///
/// Keys compare by their textual form. Numeric keys are rendered through
/// `f64`'s `Display`, so `1.0` becomes `"1"`; `-0.0` is the same key as
/// `0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseKey(String);

impl CaseKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for CaseKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Rows of the dataset that share one case key
#[derive(Debug, Clone, PartialEq)]
pub struct CasePartition {
    pub key: CaseKey,
    /// Row indices into the dataset, ascending
    pub rows: Vec<usize>,
}

impl CasePartition {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Dataset {
    /// Case key of every row of `key_column`
    ///
    /// Fails with `InvalidInput` when the column does not exist or a row has
    /// no key (null label, non-finite number).
    pub fn case_keys(&self, key_column: &str) -> Result<Vec<CaseKey>> {
        let column = self
            .column(key_column)
            .ok_or_else(|| Error::missing_column(key_column))?;

        let missing = |row: usize| {
            Error::InvalidInput(format!(
                "row {row} has no value in case key column '{key_column}'"
            ))
        };

        match column {
            Column::Numeric(values) => values
                .iter()
                .enumerate()
                .map(|(row, &v)| {
                    if v.is_finite() {
                        // -0.0 + 0.0 == +0.0
                        Ok(CaseKey((v + 0.0).to_string()))
                    } else {
                        Err(missing(row))
                    }
                })
                .collect(),
            Column::Text(values) => values
                .iter()
                .enumerate()
                .map(|(row, v)| v.as_deref().map(CaseKey::from).ok_or_else(|| missing(row)))
                .collect(),
        }
    }

    /// Group rows by exact case key
    ///
    /// Cases come out in first-occurrence order; rows within a case keep
    /// their dataset order.
    pub fn partition(&self, key_column: &str) -> Result<Vec<CasePartition>> {
        let keys = self.case_keys(key_column)?;

        let mut index: HashMap<CaseKey, usize> = HashMap::new();
        let mut partitions: Vec<CasePartition> = Vec::new();

        for (row, key) in keys.into_iter().enumerate() {
            match index.get(&key) {
                Some(&i) => partitions[i].rows.push(row),
                None => {
                    index.insert(key.clone(), partitions.len());
                    partitions.push(CasePartition {
                        key,
                        rows: vec![row],
                    });
                }
            }
        }

        Ok(partitions)
    }
}

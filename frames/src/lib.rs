//! Shared tabular data model for panel query results.
//!
//! This crate owns the in-memory representation consumed by the scene core
//! (`$data` nodes), the `traces` transform, and the host binary. Frames are
//! column-oriented: each [`Field`] carries a name and one JSON value per row.
//! Cell values intentionally stay flexible (`serde_json::Value`) so any query
//! result shape can be carried without a schema registry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error returned when loading or validating panel data.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The raw text could not be parsed as panel data JSON.
    #[error("failed to parse panel data: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field does not have one value per row.
    #[error("field `{field}` has {actual} values, expected {expected}")]
    RaggedField {
        field: String,
        expected: usize,
        actual: usize,
    },
}

/// Lifecycle status of a query result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadingState {
    /// No query has been issued yet.
    NotStarted,
    /// A query is in flight.
    Loading,
    /// Partial results are arriving.
    Streaming,
    /// Results are complete.
    #[default]
    Done,
    /// The query failed.
    Error,
}

/// A named column of values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self { name: name.into(), values }
    }

    /// String value at `row`. Numbers are not coerced.
    #[must_use]
    pub fn str_at(&self, row: usize) -> Option<&str> {
        self.values.get(row).and_then(Value::as_str)
    }

    /// Numeric value at `row`. Numeric strings are accepted.
    #[must_use]
    pub fn f64_at(&self, row: usize) -> Option<f64> {
        match self.values.get(row)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Raw value at `row`, treating JSON `null` as absent.
    #[must_use]
    pub fn value_at(&self, row: usize) -> Option<&Value> {
        self.values.get(row).filter(|v| !v.is_null())
    }
}

/// Column-oriented table returned by a single query.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFrame {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ref_id: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl DataFrame {
    #[must_use]
    pub fn new(fields: Vec<Field>) -> Self {
        Self { name: None, ref_id: None, fields }
    }

    /// Number of rows, taken from the first field.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.first().map_or(0, |f| f.values.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a field by exact name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check that every field carries one value per row.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::RaggedField`] for the first field whose length
    /// differs from the first field's.
    pub fn validate(&self) -> Result<(), FrameError> {
        let expected = self.len();
        match self.fields.iter().find(|f| f.values.len() != expected) {
            Some(field) => Err(FrameError::RaggedField {
                field: field.name.clone(),
                expected,
                actual: field.values.len(),
            }),
            None => Ok(()),
        }
    }
}

/// Reference to the datasource a query targets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceRef {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuery {
    pub ref_id: String,
    #[serde(default)]
    pub datasource: Option<DataSourceRef>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQueryRequest {
    #[serde(default)]
    pub targets: Vec<DataQuery>,
}

/// Result set delivered to a panel: the frames plus the request that produced them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelData {
    #[serde(default)]
    pub state: LoadingState,
    #[serde(default)]
    pub series: Vec<DataFrame>,
    #[serde(default)]
    pub request: Option<DataQueryRequest>,
}

impl PanelData {
    #[must_use]
    pub fn from_series(series: Vec<DataFrame>) -> Self {
        Self { state: LoadingState::Done, series, request: None }
    }

    /// Parse panel data from JSON and validate every frame.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Parse`] for malformed JSON and
    /// [`FrameError::RaggedField`] for frames with uneven columns.
    pub fn from_json(raw: &str) -> Result<Self, FrameError> {
        let data: Self = serde_json::from_str(raw)?;
        for frame in &data.series {
            frame.validate()?;
        }
        Ok(data)
    }

    /// Datasource uid of the first query target, if any.
    #[must_use]
    pub fn first_target_datasource_uid(&self) -> Option<&str> {
        self.request
            .as_ref()?
            .targets
            .first()?
            .datasource
            .as_ref()?
            .uid
            .as_deref()
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;

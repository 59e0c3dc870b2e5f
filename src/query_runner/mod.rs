//! QueryRunner trait: the execution collaborator every proxy talks to
//!
//! Proxies never open connections themselves. They build a Cypher string and a
//! parameter map and hand both to a `QueryRunner`, which returns the rows.
//!
//! Implemented by:
//! - `HttpQueryRunner`: Neo4j HTTP transactional endpoint
//! - `RecordingQueryRunner`: in-process, canned results (tests, offline use)

mod http;
mod recording;

pub use http::HttpQueryRunner;
pub use recording::{RecordedQuery, RecordingQueryRunner};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Index;
use std::sync::Arc;

use crate::error::{GdsError, GdsResult};

/// A single result row: column name → value, in column order
pub type Row = IndexMap<String, Value>;

/// Named query parameters (`$graph_name`, `$config`, ...)
pub type Params = serde_json::Map<String, Value>;

/// Runner shared between the facade, proxies and the handles they return
pub type SharedQueryRunner = Arc<dyn QueryRunner>;

/// Sends a query with optional parameters to the server and returns the rows.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    /// Execute a Cypher query
    async fn run_query(&self, query: &str, params: Option<Params>) -> GdsResult<QueryResult>;
}

/// Tabular result of a query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names
    pub columns: Vec<String>,
    /// Result rows
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// Build a result from rows, taking the column order from the first row.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        Self { columns, rows }
    }

    /// Build a result from a JSON array of objects, e.g. `[{"score": 0.42}]`.
    pub fn from_json(value: Value) -> GdsResult<Self> {
        let rows: Vec<Row> = serde_json::from_value(value)?;
        Ok(Self::from_rows(rows))
    }

    /// Number of result rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row, if any
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Look up a (possibly nested) field of the first row.
    ///
    /// `path` walks into JSON objects: `["modelInfo", "modelName"]` reads
    /// `row["modelInfo"]["modelName"]`.
    pub fn first_value(&self, path: &[&str]) -> GdsResult<&Value> {
        let dotted = path.join(".");
        let row = self
            .first()
            .ok_or_else(|| GdsError::EmptyResult { field: dotted.clone() })?;

        let (head, rest) = path
            .split_first()
            .ok_or_else(|| GdsError::MissingField { field: dotted.clone() })?;
        let mut current = row
            .get(*head)
            .ok_or_else(|| GdsError::MissingField { field: dotted.clone() })?;

        for key in rest {
            current = current
                .get(*key)
                .ok_or_else(|| GdsError::MissingField { field: dotted.clone() })?;
        }
        Ok(current)
    }

    /// Numeric field of the first row as `f64`
    pub fn first_f64(&self, path: &[&str]) -> GdsResult<f64> {
        self.first_value(path)?
            .as_f64()
            .ok_or_else(|| GdsError::UnexpectedType {
                field: path.join("."),
                expected: "a number",
            })
    }

    /// Integer field of the first row as `u64`
    pub fn first_u64(&self, path: &[&str]) -> GdsResult<u64> {
        self.first_value(path)?
            .as_u64()
            .ok_or_else(|| GdsError::UnexpectedType {
                field: path.join("."),
                expected: "a non-negative integer",
            })
    }

    /// String field of the first row
    pub fn first_str(&self, path: &[&str]) -> GdsResult<&str> {
        self.first_value(path)?
            .as_str()
            .ok_or_else(|| GdsError::UnexpectedType {
                field: path.join("."),
                expected: "a string",
            })
    }

    /// Boolean field of the first row
    pub fn first_bool(&self, path: &[&str]) -> GdsResult<bool> {
        self.first_value(path)?
            .as_bool()
            .ok_or_else(|| GdsError::UnexpectedType {
                field: path.join("."),
                expected: "a boolean",
            })
    }
}

impl Index<usize> for QueryResult {
    type Output = Row;

    fn index(&self, index: usize) -> &Row {
        &self.rows[index]
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for QueryResult {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

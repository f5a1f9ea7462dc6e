//! Raw query passthrough.

use serde_json::Value;

use super::QueryBuilder;
use crate::error::QueryError;

/// Wraps a caller-supplied query DSL structure.
///
/// No validation takes place: the literal is assumed to be valid engine syntax and is
/// returned unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQueryBuilder {
    /// The literal query.
    query: Value,
}

impl RawQueryBuilder {
    /// Creates a builder for the given literal query, e.g. `json!({"match_all": {}})`.
    pub fn new(query: Value) -> Self {
        Self { query }
    }

    /// Replaces the literal query.
    pub fn query(mut self, query: Value) -> Self {
        self.query = query;
        self
    }
}

impl From<Value> for RawQueryBuilder {
    fn from(query: Value) -> Self {
        Self::new(query)
    }
}

impl QueryBuilder for RawQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        Ok(self.query.clone())
    }
}

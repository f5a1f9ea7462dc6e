//! The transport seam between scout and a search engine.

use serde_json::Value;

use crate::error::BoxError;

/// Sends a search request body to a set of indices and returns the raw response.
///
/// Implementations own the HTTP client, authentication and retries. Any function or closure
/// with the matching signature is a transport.
pub trait SearchTransport {
    /// Executes a search against `indices`.
    fn search(&self, indices: &[String], body: &Value) -> Result<Value, BoxError>;
}

impl<F> SearchTransport for F
where
    F: Fn(&[String], &Value) -> Result<Value, BoxError>,
{
    fn search(&self, indices: &[String], body: &Value) -> Result<Value, BoxError> {
        self(indices, body)
    }
}

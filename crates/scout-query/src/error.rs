//! Error types for query building.
//!
//! Query builders only check the shape of individual values when they are set. Whether the
//! parameters that belong together are all present is decided when the query is built, and
//! reported through [`QueryError`].

use std::{error::Error, fmt};

/// A configuration error raised while building a query fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The query type being built (e.g. `term`), if known.
    pub query_type: Option<String>,
}

/// The specific kind of query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Parameters that must be set together are missing.
    MissingParameters {
        /// Names of the missing parameters, in declaration order.
        names: Vec<String>,
    },
    /// None of a set of alternative parameters was set.
    MissingAnyOf {
        /// Names of the alternatives.
        names: Vec<String>,
    },
    /// A parameter value has the wrong shape.
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Description of the problem.
        message: String,
    },
}

impl QueryError {
    /// Creates an error for required parameters that were never set.
    pub fn missing_parameters<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: QueryErrorKind::MissingParameters {
                names: names.into_iter().map(Into::into).collect(),
            },
            query_type: None,
        }
    }

    /// Creates an error for a set of alternatives of which none was set.
    pub fn missing_any_of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: QueryErrorKind::MissingAnyOf {
                names: names.into_iter().map(Into::into).collect(),
            },
            query_type: None,
        }
    }

    /// Creates an error for a parameter whose value has the wrong shape.
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::InvalidParameter {
                name: name.into(),
                message: message.into(),
            },
            query_type: None,
        }
    }

    /// Records the query type this error was raised for.
    ///
    /// An already recorded type is kept, so errors from nested queries keep pointing at the
    /// innermost query.
    pub fn in_query(mut self, query_type: impl Into<String>) -> Self {
        if self.query_type.is_none() {
            self.query_type = Some(query_type.into());
        }
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        match &self.kind {
            QueryErrorKind::MissingParameters { names } => {
                format!("missing required parameters: {}", names.join(", "))
            }
            QueryErrorKind::MissingAnyOf { names } => {
                format!("expected at least one of: {}", names.join(", "))
            }
            QueryErrorKind::InvalidParameter { name, message } => {
                format!("invalid parameter '{name}': {message}")
            }
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match &self.kind {
            QueryErrorKind::MissingParameters { names } if names.iter().any(|n| n == "field") => {
                Some("call .field(..) to choose the document field the query applies to")
            }
            QueryErrorKind::MissingAnyOf { .. } => {
                Some("set at least one of the listed parameters before building the query")
            }
            _ => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "query error: {}", self.message())?;

        if let Some(query_type) = &self.query_type {
            write!(f, "\n  in `{query_type}` query")?;
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "\nhint: {suggestion}")?;
        }

        Ok(())
    }
}

impl Error for QueryError {}

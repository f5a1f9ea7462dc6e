//! Compound and constant query builders.

use serde_json::{Map, Value};

use super::{QueryBuilder, parameterized, wrap};
use crate::{
    error::QueryError,
    parameter::{ParameterCollection, Scalar},
    transform::Transformer,
    validate::Validator,
};

/// Builds a `match_all` query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchAllQueryBuilder {
    /// Optional relevance boost.
    boost: Option<f64>,
}

impl MatchAllQueryBuilder {
    /// Creates a builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the constant score given to every document.
    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }
}

impl QueryBuilder for MatchAllQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        let mut parameters = ParameterCollection::new(Validator::Null, Transformer::Flat);
        if let Some(boost) = self.boost {
            parameters.add("boost", boost);
        }
        parameterized("match_all", &parameters)
    }
}

/// Builds a `match_none` query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchNoneQueryBuilder;

impl MatchNoneQueryBuilder {
    /// Creates a builder.
    pub fn new() -> Self {
        Self
    }
}

impl QueryBuilder for MatchNoneQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        Ok(wrap("match_none", Value::Object(Map::new())))
    }
}

/// Clause kinds of a `bool` query, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Occurrence {
    /// Must match and contributes to the score.
    Must,
    /// Must not match.
    MustNot,
    /// Should match.
    Should,
    /// Must match, without scoring.
    Filter,
}

impl Occurrence {
    /// All kinds, in emission order.
    const ALL: [Self; 4] = [Self::Must, Self::MustNot, Self::Should, Self::Filter];

    /// Returns the DSL key of this clause kind.
    fn key(self) -> &'static str {
        match self {
            Self::Must => "must",
            Self::MustNot => "must_not",
            Self::Should => "should",
            Self::Filter => "filter",
        }
    }
}

/// Builds a `bool` query from nested query builders.
#[derive(Debug, Default)]
pub struct BoolQueryBuilder {
    /// Clauses in the order they were added.
    clauses: Vec<(Occurrence, Box<dyn QueryBuilder>)>,
    /// Minimum number of `should` clauses that must match.
    minimum_should_match: Option<Scalar>,
    /// Relevance boost.
    boost: Option<f64>,
}

impl BoolQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clause that must match.
    pub fn must(self, query: impl QueryBuilder + 'static) -> Self {
        self.clause(Occurrence::Must, query)
    }

    /// Adds a clause that must not match.
    pub fn must_not(self, query: impl QueryBuilder + 'static) -> Self {
        self.clause(Occurrence::MustNot, query)
    }

    /// Adds a clause that should match.
    pub fn should(self, query: impl QueryBuilder + 'static) -> Self {
        self.clause(Occurrence::Should, query)
    }

    /// Adds a non-scoring clause that must match.
    pub fn filter(self, query: impl QueryBuilder + 'static) -> Self {
        self.clause(Occurrence::Filter, query)
    }

    /// Sets how many `should` clauses must match.
    pub fn minimum_should_match(mut self, value: impl Into<Scalar>) -> Self {
        self.minimum_should_match = Some(value.into());
        self
    }

    /// Sets the relevance boost.
    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Appends a clause.
    fn clause(mut self, occurrence: Occurrence, query: impl QueryBuilder + 'static) -> Self {
        let query: Box<dyn QueryBuilder> = Box::new(query);
        self.clauses.push((occurrence, query));
        self
    }
}

impl QueryBuilder for BoolQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        let mut parameters = ParameterCollection::new(
            Validator::OneOf(&["must", "must_not", "should", "filter"]),
            Transformer::Flat,
        );

        for occurrence in Occurrence::ALL {
            let built = self
                .clauses
                .iter()
                .filter(|(o, _)| *o == occurrence)
                .map(|(_, query)| query.build_query())
                .collect::<Result<Vec<Value>, QueryError>>()?;
            if !built.is_empty() {
                parameters.add(occurrence.key(), built);
            }
        }

        if let Some(value) = &self.minimum_should_match {
            parameters.add("minimum_should_match", value.clone());
        }
        if let Some(boost) = self.boost {
            parameters.add("boost", boost);
        }

        parameterized("bool", &parameters)
    }
}

/// Builds a `nested` query over an object array field.
#[derive(Debug, Default)]
pub struct NestedQueryBuilder {
    /// Path of the nested object field.
    path: Option<String>,
    /// Query run against the nested objects.
    query: Option<Box<dyn QueryBuilder>>,
    /// How child scores combine into the parent score.
    score_mode: Option<String>,
    /// Whether an unmapped path is ignored.
    ignore_unmapped: Option<bool>,
}

impl NestedQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the nested object path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the query run against the nested objects.
    pub fn query(mut self, query: impl QueryBuilder + 'static) -> Self {
        let query: Box<dyn QueryBuilder> = Box::new(query);
        self.query = Some(query);
        self
    }

    /// Sets the score mode (`avg`, `max`, `min`, `none`, `sum`).
    pub fn score_mode(mut self, score_mode: impl Into<String>) -> Self {
        self.score_mode = Some(score_mode.into());
        self
    }

    /// Ignores an unmapped path instead of failing.
    pub fn ignore_unmapped(mut self, ignore_unmapped: bool) -> Self {
        self.ignore_unmapped = Some(ignore_unmapped);
        self
    }
}

impl QueryBuilder for NestedQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        let mut parameters =
            ParameterCollection::new(Validator::AllOf(&["path", "query"]), Transformer::Flat);

        if let Some(path) = &self.path {
            parameters.add("path", path.as_str());
        }
        if let Some(query) = &self.query {
            parameters.add("query", query.build_query()?);
        }
        if let Some(score_mode) = &self.score_mode {
            parameters.add("score_mode", score_mode.as_str());
        }
        if let Some(ignore_unmapped) = self.ignore_unmapped {
            parameters.add("ignore_unmapped", ignore_unmapped);
        }

        parameterized("nested", &parameters)
    }
}

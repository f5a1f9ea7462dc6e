//! Full-text query builders.
//!
//! Full-text queries analyze the query text with the field's analyzer before matching.

use serde_json::Value;

use super::{QueryBuilder, parameterized};
use crate::{
    error::QueryError,
    parameter::{ParameterCollection, Scalar},
    transform::Transformer,
    validate::Validator,
};

/// Builds a `match` query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQueryBuilder {
    /// Query parameters, grouped by field.
    parameters: ParameterCollection,
}

impl Default for MatchQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            parameters: ParameterCollection::new(
                Validator::AllOf(&["field", "query"]),
                Transformer::GroupedBy("field"),
            ),
        }
    }

    /// Sets the field to search.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.parameters.add("field", field.into());
        self
    }

    /// Sets the text to search for.
    pub fn query(mut self, query: impl Into<Scalar>) -> Self {
        self.parameters.add("query", query.into());
        self
    }

    /// Sets the analyzer applied to the query text.
    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.parameters.add("analyzer", analyzer.into());
        self
    }

    /// Creates match phrase queries for multi-term synonyms.
    pub fn auto_generate_synonyms_phrase_query(mut self, enabled: bool) -> Self {
        self.parameters
            .add("auto_generate_synonyms_phrase_query", enabled);
        self
    }

    /// Sets the allowed edit distance, e.g. `1` or `"AUTO"`.
    pub fn fuzziness(mut self, fuzziness: impl Into<Scalar>) -> Self {
        self.parameters.add("fuzziness", fuzziness.into());
        self
    }

    /// Sets the maximum number of terms a fuzzy term expands to.
    pub fn max_expansions(mut self, max_expansions: u64) -> Self {
        self.parameters.add("max_expansions", max_expansions);
        self
    }

    /// Sets the number of leading characters left unchanged by fuzzy matching.
    pub fn prefix_length(mut self, prefix_length: u64) -> Self {
        self.parameters.add("prefix_length", prefix_length);
        self
    }

    /// Allows swaps of two adjacent characters in fuzzy matching.
    pub fn fuzzy_transpositions(mut self, enabled: bool) -> Self {
        self.parameters.add("fuzzy_transpositions", enabled);
        self
    }

    /// Sets the rewrite method for fuzzy terms.
    pub fn fuzzy_rewrite(mut self, rewrite: impl Into<String>) -> Self {
        self.parameters.add("fuzzy_rewrite", rewrite.into());
        self
    }

    /// Ignores format-based errors, such as text for a numeric field.
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.parameters.add("lenient", lenient);
        self
    }

    /// Sets the boolean operator combining analyzed terms (`OR` or `AND`).
    pub fn operator(mut self, operator: impl Into<String>) -> Self {
        self.parameters.add("operator", operator.into());
        self
    }

    /// Sets the minimum number of clauses that must match, e.g. `2` or `"75%"`.
    pub fn minimum_should_match(mut self, value: impl Into<Scalar>) -> Self {
        self.parameters.add("minimum_should_match", value.into());
        self
    }

    /// Sets what to return when the analyzer removes every token (`none` or `all`).
    pub fn zero_terms_query(mut self, value: impl Into<String>) -> Self {
        self.parameters.add("zero_terms_query", value.into());
        self
    }

    /// Sets the relevance boost.
    pub fn boost(mut self, boost: f64) -> Self {
        self.parameters.add("boost", boost);
        self
    }
}

impl QueryBuilder for MatchQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        parameterized("match", &self.parameters)
    }
}

/// Builds a `match_phrase` query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPhraseQueryBuilder {
    /// Query parameters, grouped by field.
    parameters: ParameterCollection,
}

impl Default for MatchPhraseQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchPhraseQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            parameters: ParameterCollection::new(
                Validator::AllOf(&["field", "query"]),
                Transformer::GroupedBy("field"),
            ),
        }
    }

    /// Sets the field to search.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.parameters.add("field", field.into());
        self
    }

    /// Sets the phrase to search for.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.parameters.add("query", query.into());
        self
    }

    /// Sets the analyzer applied to the phrase.
    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.parameters.add("analyzer", analyzer.into());
        self
    }

    /// Sets the maximum number of positions allowed between matching tokens.
    pub fn slop(mut self, slop: u64) -> Self {
        self.parameters.add("slop", slop);
        self
    }

    /// Sets what to return when the analyzer removes every token (`none` or `all`).
    pub fn zero_terms_query(mut self, value: impl Into<String>) -> Self {
        self.parameters.add("zero_terms_query", value.into());
        self
    }

    /// Sets the relevance boost.
    pub fn boost(mut self, boost: f64) -> Self {
        self.parameters.add("boost", boost);
        self
    }
}

impl QueryBuilder for MatchPhraseQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        parameterized("match_phrase", &self.parameters)
    }
}

/// Builds a `multi_match` query across several fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMatchQueryBuilder {
    /// Query parameters, emitted flat.
    parameters: ParameterCollection,
}

impl Default for MultiMatchQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiMatchQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            parameters: ParameterCollection::new(Validator::AllOf(&["query"]), Transformer::Flat),
        }
    }

    /// Sets the fields to search; supports `^` boosts such as `title^3`.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<Value> = fields
            .into_iter()
            .map(|f| Value::String(f.into()))
            .collect();
        self.parameters.add("fields", fields);
        self
    }

    /// Sets the text to search for.
    pub fn query(mut self, query: impl Into<Scalar>) -> Self {
        self.parameters.add("query", query.into());
        self
    }

    /// Sets how the query is executed, e.g. `best_fields` or `cross_fields`.
    pub fn query_type(mut self, query_type: impl Into<String>) -> Self {
        self.parameters.add("type", query_type.into());
        self
    }

    /// Sets the analyzer applied to the query text.
    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.parameters.add("analyzer", analyzer.into());
        self
    }

    /// Sets the allowed edit distance.
    pub fn fuzziness(mut self, fuzziness: impl Into<Scalar>) -> Self {
        self.parameters.add("fuzziness", fuzziness.into());
        self
    }

    /// Sets the boolean operator combining analyzed terms.
    pub fn operator(mut self, operator: impl Into<String>) -> Self {
        self.parameters.add("operator", operator.into());
        self
    }

    /// Sets the minimum number of clauses that must match.
    pub fn minimum_should_match(mut self, value: impl Into<Scalar>) -> Self {
        self.parameters.add("minimum_should_match", value.into());
        self
    }

    /// Sets the score contribution of non-best matching fields.
    pub fn tie_breaker(mut self, tie_breaker: f64) -> Self {
        self.parameters.add("tie_breaker", tie_breaker);
        self
    }

    /// Sets the relevance boost.
    pub fn boost(mut self, boost: f64) -> Self {
        self.parameters.add("boost", boost);
        self
    }
}

impl QueryBuilder for MultiMatchQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        parameterized("multi_match", &self.parameters)
    }
}

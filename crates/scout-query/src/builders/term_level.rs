//! Term-level query builders.
//!
//! Term-level queries match exact values in structured fields, without analysis of the
//! query input.

use serde_json::{Map, Value};

use super::{QueryBuilder, parameterized, wrap};
use crate::{
    error::QueryError,
    parameter::{ParameterCollection, Scalar},
    transform::Transformer,
    validate::Validator,
};

/// Builds a `term` query: exact match of a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQueryBuilder {
    /// Query parameters, grouped by field.
    parameters: ParameterCollection,
}

impl Default for TermQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TermQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            parameters: ParameterCollection::new(
                Validator::AllOf(&["field", "value"]),
                Transformer::GroupedBy("field"),
            ),
        }
    }

    /// Sets the field to match.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.parameters.add("field", field.into());
        self
    }

    /// Sets the exact value to match.
    pub fn value(mut self, value: impl Into<Scalar>) -> Self {
        self.parameters.add("value", value.into());
        self
    }

    /// Sets the relevance boost.
    pub fn boost(mut self, boost: f64) -> Self {
        self.parameters.add("boost", boost);
        self
    }

    /// Enables ASCII case-insensitive matching.
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.parameters.add("case_insensitive", case_insensitive);
        self
    }
}

impl QueryBuilder for TermQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        parameterized("term", &self.parameters)
    }
}

/// Builds a `terms` query: match any of several exact values in one field.
///
/// The field name itself is the key of the values list, as in
/// `{"terms": {"tags": [..], "boost": 1}}`, so a field can't share a name with another
/// parameter of the query.
#[derive(Debug, Clone, PartialEq)]
pub struct TermsQueryBuilder {
    /// Field and the values to match in it.
    terms: Option<(String, Vec<Value>)>,
    /// Other query parameters, emitted flat after the values list.
    parameters: ParameterCollection,
}

impl Default for TermsQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TermsQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            terms: None,
            parameters: ParameterCollection::new(Validator::Null, Transformer::Flat),
        }
    }

    /// Sets the field and the values to match. Replaces any earlier call.
    pub fn terms<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        let values = values
            .into_iter()
            .map(|v| {
                let scalar: Scalar = v.into();
                Value::from(scalar)
            })
            .collect();
        self.terms = Some((field.into(), values));
        self
    }

    /// Sets the relevance boost.
    pub fn boost(mut self, boost: f64) -> Self {
        self.parameters.add("boost", boost);
        self
    }
}

impl QueryBuilder for TermsQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        let Some((field, values)) = &self.terms else {
            return Err(QueryError::missing_parameters(["terms"]).in_query("terms"));
        };
        if values.is_empty() {
            return Err(
                QueryError::invalid_parameter(field.as_str(), "terms must be a non-empty list")
                    .in_query("terms"),
            );
        }
        if self.parameters.contains(field) {
            return Err(QueryError::invalid_parameter(
                field.as_str(),
                "field name collides with a query parameter of the same name",
            )
            .in_query("terms"));
        }

        let mut body = Map::new();
        body.insert(field.clone(), Value::Array(values.clone()));
        if let Value::Object(options) = self
            .parameters
            .to_value()
            .map_err(|err| err.in_query("terms"))?
        {
            body.extend(options);
        }
        Ok(wrap("terms", Value::Object(body)))
    }
}

/// Builds a `regexp` query: match values against a regular expression.
#[derive(Debug, Clone, PartialEq)]
pub struct RegexpQueryBuilder {
    /// Query parameters, grouped by field.
    parameters: ParameterCollection,
}

impl Default for RegexpQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegexpQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            parameters: ParameterCollection::new(
                Validator::AllOf(&["field", "value"]),
                Transformer::GroupedBy("field"),
            ),
        }
    }

    /// Sets the field to match.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.parameters.add("field", field.into());
        self
    }

    /// Sets the regular expression.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.parameters.add("value", value.into());
        self
    }

    /// Enables optional operators, e.g. `ALL` or `COMPLEMENT|INTERVAL`.
    pub fn flags(mut self, flags: impl Into<String>) -> Self {
        self.parameters.add("flags", flags.into());
        self
    }

    /// Enables ASCII case-insensitive matching.
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.parameters.add("case_insensitive", case_insensitive);
        self
    }

    /// Limits the number of automaton states the expression may compile to.
    pub fn max_determinized_states(mut self, states: u64) -> Self {
        self.parameters.add("max_determinized_states", states);
        self
    }

    /// Sets the rewrite method.
    pub fn rewrite(mut self, rewrite: impl Into<String>) -> Self {
        self.parameters.add("rewrite", rewrite.into());
        self
    }

    /// Sets the relevance boost.
    pub fn boost(mut self, boost: f64) -> Self {
        self.parameters.add("boost", boost);
        self
    }
}

impl QueryBuilder for RegexpQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        parameterized("regexp", &self.parameters)
    }
}

/// Builds a `prefix` query: match values starting with a prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixQueryBuilder {
    /// Query parameters, grouped by field.
    parameters: ParameterCollection,
}

impl Default for PrefixQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            parameters: ParameterCollection::new(
                Validator::AllOf(&["field", "value"]),
                Transformer::GroupedBy("field"),
            ),
        }
    }

    /// Sets the field to match.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.parameters.add("field", field.into());
        self
    }

    /// Sets the prefix.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.parameters.add("value", value.into());
        self
    }

    /// Enables ASCII case-insensitive matching.
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.parameters.add("case_insensitive", case_insensitive);
        self
    }

    /// Sets the rewrite method.
    pub fn rewrite(mut self, rewrite: impl Into<String>) -> Self {
        self.parameters.add("rewrite", rewrite.into());
        self
    }
}

impl QueryBuilder for PrefixQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        parameterized("prefix", &self.parameters)
    }
}

/// Builds a `wildcard` query: match values against a `*`/`?` pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct WildcardQueryBuilder {
    /// Query parameters, grouped by field.
    parameters: ParameterCollection,
}

impl Default for WildcardQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WildcardQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            parameters: ParameterCollection::new(
                Validator::AllOf(&["field", "value"]),
                Transformer::GroupedBy("field"),
            ),
        }
    }

    /// Sets the field to match.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.parameters.add("field", field.into());
        self
    }

    /// Sets the wildcard pattern.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.parameters.add("value", value.into());
        self
    }

    /// Enables ASCII case-insensitive matching.
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.parameters.add("case_insensitive", case_insensitive);
        self
    }

    /// Sets the rewrite method.
    pub fn rewrite(mut self, rewrite: impl Into<String>) -> Self {
        self.parameters.add("rewrite", rewrite.into());
        self
    }

    /// Sets the relevance boost.
    pub fn boost(mut self, boost: f64) -> Self {
        self.parameters.add("boost", boost);
        self
    }
}

impl QueryBuilder for WildcardQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        parameterized("wildcard", &self.parameters)
    }
}

/// Builds a `fuzzy` query: match values within an edit distance.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyQueryBuilder {
    /// Query parameters, grouped by field.
    parameters: ParameterCollection,
}

impl Default for FuzzyQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzyQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            parameters: ParameterCollection::new(
                Validator::AllOf(&["field", "value"]),
                Transformer::GroupedBy("field"),
            ),
        }
    }

    /// Sets the field to match.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.parameters.add("field", field.into());
        self
    }

    /// Sets the value to match approximately.
    pub fn value(mut self, value: impl Into<Scalar>) -> Self {
        self.parameters.add("value", value.into());
        self
    }

    /// Sets the allowed edit distance, e.g. `2` or `"AUTO"`.
    pub fn fuzziness(mut self, fuzziness: impl Into<Scalar>) -> Self {
        self.parameters.add("fuzziness", fuzziness.into());
        self
    }

    /// Sets the maximum number of variations created.
    pub fn max_expansions(mut self, max_expansions: u64) -> Self {
        self.parameters.add("max_expansions", max_expansions);
        self
    }

    /// Sets the number of leading characters left unchanged.
    pub fn prefix_length(mut self, prefix_length: u64) -> Self {
        self.parameters.add("prefix_length", prefix_length);
        self
    }

    /// Allows swaps of two adjacent characters.
    pub fn transpositions(mut self, transpositions: bool) -> Self {
        self.parameters.add("transpositions", transpositions);
        self
    }

    /// Sets the rewrite method.
    pub fn rewrite(mut self, rewrite: impl Into<String>) -> Self {
        self.parameters.add("rewrite", rewrite.into());
        self
    }

    /// Sets the relevance boost.
    pub fn boost(mut self, boost: f64) -> Self {
        self.parameters.add("boost", boost);
        self
    }
}

impl QueryBuilder for FuzzyQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        parameterized("fuzzy", &self.parameters)
    }
}

/// Builds an `exists` query: match documents with an indexed value for a field.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistsQueryBuilder {
    /// Query parameters, emitted flat.
    parameters: ParameterCollection,
}

impl Default for ExistsQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExistsQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            parameters: ParameterCollection::new(Validator::AllOf(&["field"]), Transformer::Flat),
        }
    }

    /// Sets the field that must exist.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.parameters.add("field", field.into());
        self
    }

    /// Sets the relevance boost.
    pub fn boost(mut self, boost: f64) -> Self {
        self.parameters.add("boost", boost);
        self
    }
}

impl QueryBuilder for ExistsQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        parameterized("exists", &self.parameters)
    }
}

/// Builds a `range` query: match values within bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQueryBuilder {
    /// Query parameters, grouped by field.
    parameters: ParameterCollection,
}

impl Default for RangeQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            parameters: ParameterCollection::new(
                Validator::Compound(vec![
                    Validator::AllOf(&["field"]),
                    Validator::OneOf(&["gt", "gte", "lt", "lte"]),
                ]),
                Transformer::GroupedBy("field"),
            ),
        }
    }

    /// Sets the field to match.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.parameters.add("field", field.into());
        self
    }

    /// Sets an exclusive lower bound.
    pub fn gt(mut self, value: impl Into<Scalar>) -> Self {
        self.parameters.add("gt", value.into());
        self
    }

    /// Sets an inclusive lower bound.
    pub fn gte(mut self, value: impl Into<Scalar>) -> Self {
        self.parameters.add("gte", value.into());
        self
    }

    /// Sets an exclusive upper bound.
    pub fn lt(mut self, value: impl Into<Scalar>) -> Self {
        self.parameters.add("lt", value.into());
        self
    }

    /// Sets an inclusive upper bound.
    pub fn lte(mut self, value: impl Into<Scalar>) -> Self {
        self.parameters.add("lte", value.into());
        self
    }

    /// Sets the date format used to parse bounds.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.parameters.add("format", format.into());
        self
    }

    /// Sets how range fields are matched (`INTERSECTS`, `CONTAINS`, `WITHIN`).
    pub fn relation(mut self, relation: impl Into<String>) -> Self {
        self.parameters.add("relation", relation.into());
        self
    }

    /// Sets the time zone used to convert date bounds.
    pub fn time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.parameters.add("time_zone", time_zone.into());
        self
    }

    /// Sets the relevance boost.
    pub fn boost(mut self, boost: f64) -> Self {
        self.parameters.add("boost", boost);
        self
    }
}

impl QueryBuilder for RangeQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        parameterized("range", &self.parameters)
    }
}

/// Builds an `ids` query: match documents by identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct IdsQueryBuilder {
    /// Query parameters, emitted flat.
    parameters: ParameterCollection,
}

impl Default for IdsQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IdsQueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            parameters: ParameterCollection::new(Validator::AllOf(&["values"]), Transformer::Flat),
        }
    }

    /// Sets the document identifiers to match.
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<Value> = values
            .into_iter()
            .map(|v| Value::String(v.into()))
            .collect();
        self.parameters.add("values", values);
        self
    }
}

impl QueryBuilder for IdsQueryBuilder {
    fn build_query(&self) -> Result<Value, QueryError> {
        parameterized("ids", &self.parameters)
    }
}

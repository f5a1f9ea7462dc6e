//! Query builders.
//!
//! Each builder owns a [`ParameterCollection`] configured for one query family and exposes
//! fluent setters for its parameters. Setters consume and return the builder; required
//! parameters are checked by [`QueryBuilder::build_query`].

mod compound;
mod full_text;
mod raw;
mod term_level;

use std::fmt;

pub use compound::{
    BoolQueryBuilder, MatchAllQueryBuilder, MatchNoneQueryBuilder, NestedQueryBuilder,
};
pub use full_text::{MatchPhraseQueryBuilder, MatchQueryBuilder, MultiMatchQueryBuilder};
pub use raw::RawQueryBuilder;
use serde_json::{Map, Value};
pub use term_level::{
    ExistsQueryBuilder, FuzzyQueryBuilder, IdsQueryBuilder, PrefixQueryBuilder,
    RangeQueryBuilder, RegexpQueryBuilder, TermQueryBuilder, TermsQueryBuilder,
    WildcardQueryBuilder,
};

use crate::{error::QueryError, parameter::ParameterCollection};

/// Produces a query DSL fragment.
pub trait QueryBuilder: fmt::Debug {
    /// Builds the fragment, e.g. `{"term": {"title": {"value": "foo"}}}`.
    fn build_query(&self) -> Result<Value, QueryError>;
}

impl<Q: QueryBuilder + ?Sized> QueryBuilder for Box<Q> {
    fn build_query(&self) -> Result<Value, QueryError> {
        (**self).build_query()
    }
}

/// Builds `{query_type: <transformed parameters>}`, tagging errors with the query type.
pub(crate) fn parameterized(
    query_type: &str,
    parameters: &ParameterCollection,
) -> Result<Value, QueryError> {
    let body = parameters
        .to_value()
        .map_err(|err| err.in_query(query_type))?;
    Ok(wrap(query_type, body))
}

/// Wraps a body under a single key.
pub(crate) fn wrap(key: &str, body: Value) -> Value {
    let mut object = Map::new();
    object.insert(key.to_string(), body);
    Value::Object(object)
}

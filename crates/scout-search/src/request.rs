//! The immutable search request produced by [`SearchRequestBuilder`](crate::SearchRequestBuilder).

use std::{collections::BTreeMap, fmt, iter};

use serde_json::{Map, Value};

/// Sort direction for [`SearchRequestBuilder::sort`](crate::SearchRequestBuilder::sort).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Returns the DSL name of the direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the engine counts total hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackTotalHits {
    /// Count every hit (`true`) or skip counting (`false`).
    Enabled(bool),
    /// Count accurately up to this many hits.
    UpTo(u64),
}

impl TrackTotalHits {
    /// Whether the response will carry a total.
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::Enabled(false))
    }

    /// Renders the DSL value.
    pub fn to_value(self) -> Value {
        match self {
            Self::Enabled(enabled) => Value::Bool(enabled),
            Self::UpTo(limit) => Value::from(limit),
        }
    }
}

impl From<bool> for TrackTotalHits {
    fn from(enabled: bool) -> Self {
        Self::Enabled(enabled)
    }
}

impl From<u64> for TrackTotalHits {
    fn from(limit: u64) -> Self {
        Self::UpTo(limit)
    }
}

/// A fully validated search request.
///
/// Produced by [`SearchRequestBuilder::build`](crate::SearchRequestBuilder::build). The body
/// is rendered against index names by [`SearchRequest::body`], so the same request can be
/// sent through engines with different index prefixes.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Primary domain type.
    pub(crate) domain_type: String,
    /// Joined domain types, in join order.
    pub(crate) joined: Vec<String>,
    /// Primary query clause.
    pub(crate) query: Option<Value>,
    /// Post filter clause.
    pub(crate) post_filter: Option<Value>,
    /// Highlight clause.
    pub(crate) highlight: Option<Value>,
    /// Sort entries, in order.
    pub(crate) sort: Vec<Value>,
    /// Aggregations by name.
    pub(crate) aggregations: Map<String, Value>,
    /// Suggesters by name.
    pub(crate) suggest: Map<String, Value>,
    /// Field collapsing clause.
    pub(crate) collapse: Option<Value>,
    /// `_source` filtering clause.
    pub(crate) source: Option<Value>,
    /// Offset of the first hit.
    pub(crate) from: Option<usize>,
    /// Number of hits to return.
    pub(crate) size: Option<usize>,
    /// Total hit tracking mode.
    pub(crate) track_total_hits: Option<TrackTotalHits>,
    /// Whether scores are computed when sorting on a field.
    pub(crate) track_scores: Option<bool>,
    /// Minimum score of returned hits.
    pub(crate) min_score: Option<f64>,
    /// Per domain type boosts, in insertion order.
    pub(crate) indices_boost: Vec<(String, f64)>,
    /// Relations to eager load, per domain type.
    pub(crate) relations: BTreeMap<String, Vec<String>>,
}

impl SearchRequest {
    /// Returns the primary domain type.
    pub fn domain_type(&self) -> &str {
        &self.domain_type
    }

    /// Returns the joined domain types.
    pub fn joined_types(&self) -> &[String] {
        &self.joined
    }

    /// Returns every searched domain type, primary first.
    pub fn domain_types(&self) -> impl Iterator<Item = &str> {
        iter::once(self.domain_type.as_str()).chain(self.joined.iter().map(String::as_str))
    }

    /// Whether a domain type is searched by this request.
    pub fn searches(&self, domain_type: &str) -> bool {
        self.domain_types().any(|t| t == domain_type)
    }

    /// Returns the relations to eager load for a domain type.
    pub fn relations(&self, domain_type: &str) -> &[String] {
        self.relations
            .get(domain_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the primary query clause.
    pub fn query(&self) -> Option<&Value> {
        self.query.as_ref()
    }

    /// Returns the offset of the first hit.
    pub fn from(&self) -> Option<usize> {
        self.from
    }

    /// Returns the number of hits to return.
    pub fn size(&self) -> Option<usize> {
        self.size
    }

    /// Returns the total hit tracking mode.
    pub fn track_total_hits(&self) -> Option<TrackTotalHits> {
        self.track_total_hits
    }

    /// Returns a copy restricted to one page of hits.
    pub(crate) fn window(&self, from: usize, size: usize) -> Self {
        let mut request = self.clone();
        request.from = Some(from);
        request.size = Some(size);
        request
    }

    /// Renders the request body.
    ///
    /// `index_name` maps a domain type to its index; it's used for `indices_boost`.
    pub fn body(&self, index_name: impl Fn(&str) -> String) -> Value {
        let mut body = Map::new();

        if let Some(query) = &self.query {
            body.insert("query".into(), query.clone());
        }
        if let Some(post_filter) = &self.post_filter {
            body.insert("post_filter".into(), post_filter.clone());
        }
        if let Some(highlight) = &self.highlight {
            body.insert("highlight".into(), highlight.clone());
        }
        if !self.sort.is_empty() {
            body.insert("sort".into(), Value::Array(self.sort.clone()));
        }
        if !self.aggregations.is_empty() {
            body.insert("aggs".into(), Value::Object(self.aggregations.clone()));
        }
        if !self.suggest.is_empty() {
            body.insert("suggest".into(), Value::Object(self.suggest.clone()));
        }
        if let Some(collapse) = &self.collapse {
            body.insert("collapse".into(), collapse.clone());
        }
        if let Some(source) = &self.source {
            body.insert("_source".into(), source.clone());
        }
        if let Some(from) = self.from {
            body.insert("from".into(), Value::from(from));
        }
        if let Some(size) = self.size {
            body.insert("size".into(), Value::from(size));
        }
        if let Some(track_total_hits) = self.track_total_hits {
            body.insert("track_total_hits".into(), track_total_hits.to_value());
        }
        if let Some(track_scores) = self.track_scores {
            body.insert("track_scores".into(), Value::Bool(track_scores));
        }
        if let Some(min_score) = self.min_score {
            body.insert("min_score".into(), Value::from(min_score));
        }
        if !self.indices_boost.is_empty() {
            let boosts = self
                .indices_boost
                .iter()
                .map(|(domain_type, boost)| {
                    let mut entry = Map::new();
                    entry.insert(index_name(domain_type), Value::from(*boost));
                    Value::Object(entry)
                })
                .collect();
            body.insert("indices_boost".into(), Value::Array(boosts));
        }

        Value::Object(body)
    }
}

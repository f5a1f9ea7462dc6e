//! Fluent construction of search requests.

use std::collections::BTreeMap;

use scout_query::{QueryBuilder, RawQueryBuilder};
use serde_json::{Map, Value, json};

use crate::{
    engine::SearchEngine,
    error::SearchError,
    model::Model,
    paginator::Paginator,
    request::{SearchRequest, SortOrder, TrackTotalHits},
    result::{SearchMatch, SearchResult},
    transport::SearchTransport,
};

/// Collects the primary query and request options for one search.
///
/// Every option method consumes the builder and returns it. Configuration mistakes are
/// reported by [`build`](Self::build), which the terminal methods call before anything is
/// sent. Terminal methods borrow the builder, so one builder can fetch several pages.
///
/// ```
/// use scout_query::MatchQueryBuilder;
/// use scout_search::{SearchRequestBuilder, SortOrder};
/// use serde_json::json;
///
/// let request = SearchRequestBuilder::new("books")
///     .query(MatchQueryBuilder::new().field("title").query("dune"))
///     .sort("published", SortOrder::Desc)
///     .size(5)
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     request.body(str::to_string),
///     json!({
///         "query": {"match": {"title": {"query": "dune"}}},
///         "sort": [{"published": {"order": "desc"}}],
///         "size": 5
///     })
/// );
/// ```
#[derive(Debug)]
pub struct SearchRequestBuilder {
    /// Primary domain type.
    domain_type: String,
    /// Joined domain types, in join order.
    joined: Vec<String>,
    /// Primary query clauses; more than one is an error at build time.
    queries: Vec<Box<dyn QueryBuilder>>,
    /// Post filter clause.
    post_filter: Option<Value>,
    /// Highlight clause.
    highlight: Option<Value>,
    /// Sort entries.
    sort: Vec<Value>,
    /// Aggregations by name.
    aggregations: Map<String, Value>,
    /// Suggesters by name.
    suggest: Map<String, Value>,
    /// Field collapsing clause.
    collapse: Option<Value>,
    /// `_source` filtering clause.
    source: Option<Value>,
    /// Explicit offset.
    from: Option<usize>,
    /// Explicit page size.
    size: Option<usize>,
    /// Total hit tracking mode.
    track_total_hits: Option<TrackTotalHits>,
    /// Score tracking when sorting on a field.
    track_scores: Option<bool>,
    /// Minimum score.
    min_score: Option<f64>,
    /// Per domain type boosts.
    indices_boost: Vec<(String, f64)>,
    /// Relations to eager load, per domain type.
    relations: BTreeMap<String, Vec<String>>,
}

impl SearchRequestBuilder {
    /// Starts a request that searches `domain_type`.
    pub fn new(domain_type: impl Into<String>) -> Self {
        Self {
            domain_type: domain_type.into(),
            joined: Vec::new(),
            queries: Vec::new(),
            post_filter: None,
            highlight: None,
            sort: Vec::new(),
            aggregations: Map::new(),
            suggest: Map::new(),
            collapse: None,
            source: None,
            from: None,
            size: None,
            track_total_hits: None,
            track_scores: None,
            min_score: None,
            indices_boost: Vec::new(),
            relations: BTreeMap::new(),
        }
    }

    /// Sets the primary query.
    pub fn query(mut self, query: impl QueryBuilder + 'static) -> Self {
        let query: Box<dyn QueryBuilder> = Box::new(query);
        self.queries.push(query);
        self
    }

    /// Sets the primary query from a DSL literal.
    pub fn raw_query(self, query: Value) -> Self {
        self.query(RawQueryBuilder::new(query))
    }

    /// Appends a sort on `field`.
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        let mut entry = Map::new();
        entry.insert(field.into(), json!({ "order": order.as_str() }));
        self.sort.push(Value::Object(entry));
        self
    }

    /// Appends raw sort entries.
    pub fn sort_raw(mut self, entries: impl IntoIterator<Item = Value>) -> Self {
        self.sort.extend(entries);
        self
    }

    /// Sets the offset of the first hit.
    pub fn from(mut self, from: usize) -> Self {
        self.from = Some(from);
        self
    }

    /// Sets the number of hits to return.
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Highlights `field` with the given options (`json!({})` for defaults).
    ///
    /// Highlighting the same field again replaces its options.
    pub fn highlight(mut self, field: impl Into<String>, options: Value) -> Self {
        let mut clause = self
            .highlight
            .take()
            .and_then(into_object)
            .unwrap_or_default();
        let fields = clause
            .entry("fields")
            .or_insert_with(|| Value::Object(Map::new()));
        if !fields.is_object() {
            *fields = Value::Object(Map::new());
        }
        if let Some(fields) = fields.as_object_mut() {
            fields.insert(field.into(), options);
        }
        self.highlight = Some(Value::Object(clause));
        self
    }

    /// Replaces the whole highlight clause.
    pub fn highlight_raw(mut self, highlight: Value) -> Self {
        self.highlight = Some(highlight);
        self
    }

    /// Adds a named aggregation, replacing one with the same name.
    pub fn aggregate(mut self, name: impl Into<String>, aggregation: Value) -> Self {
        self.aggregations.insert(name.into(), aggregation);
        self
    }

    /// Adds several named aggregations, replacing ones with the same names.
    pub fn aggregate_raw(mut self, aggregations: Map<String, Value>) -> Self {
        self.aggregations.extend(aggregations);
        self
    }

    /// Sets the post filter to `{ query_type: body }`.
    pub fn post_filter(mut self, query_type: impl Into<String>, body: Value) -> Self {
        let mut filter = Map::new();
        filter.insert(query_type.into(), body);
        self.post_filter = Some(Value::Object(filter));
        self
    }

    /// Sets the post filter from a DSL literal.
    pub fn post_filter_raw(mut self, filter: Value) -> Self {
        self.post_filter = Some(filter);
        self
    }

    /// Collapses hits on `field`, keeping the top hit per value.
    pub fn collapse(mut self, field: impl Into<String>) -> Self {
        self.collapse = Some(json!({ "field": field.into() }));
        self
    }

    /// Sets the collapse clause from a DSL literal.
    pub fn collapse_raw(mut self, collapse: Value) -> Self {
        self.collapse = Some(collapse);
        self
    }

    /// Adds a named suggester, replacing one with the same name.
    pub fn suggest(mut self, name: impl Into<String>, suggester: Value) -> Self {
        self.suggest.insert(name.into(), suggester);
        self
    }

    /// Adds several named suggesters, replacing ones with the same names.
    pub fn suggest_raw(mut self, suggesters: Map<String, Value>) -> Self {
        self.suggest.extend(suggesters);
        self
    }

    /// Returns only these stored fields.
    ///
    /// An empty list returns no stored fields at all; engines read an empty `_source` list as
    /// "no filtering", so it is sent as `false`.
    pub fn source(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let fields: Vec<Value> = fields
            .into_iter()
            .map(|field| Value::String(field.into()))
            .collect();
        self.source = Some(if fields.is_empty() {
            Value::Bool(false)
        } else {
            Value::Array(fields)
        });
        self
    }

    /// Sets the `_source` clause from a DSL literal; `json!(false)` drops stored fields.
    pub fn source_raw(mut self, source: Value) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets how total hits are counted.
    pub fn track_total_hits(mut self, track: impl Into<TrackTotalHits>) -> Self {
        self.track_total_hits = Some(track.into());
        self
    }

    /// Counts total hits accurately up to `limit`.
    pub fn track_total_hits_up_to(self, limit: u64) -> Self {
        self.track_total_hits(TrackTotalHits::UpTo(limit))
    }

    /// Computes scores even when sorting on a field.
    pub fn track_scores(mut self, track: bool) -> Self {
        self.track_scores = Some(track);
        self
    }

    /// Drops hits scoring below `min_score`.
    pub fn min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Also searches the index of another domain type.
    pub fn join(mut self, domain_type: impl Into<String>) -> Self {
        let domain_type = domain_type.into();
        if domain_type != self.domain_type && !self.joined.contains(&domain_type) {
            self.joined.push(domain_type);
        }
        self
    }

    /// Multiplies the scores of hits from a searched domain type's index.
    pub fn boost_index(mut self, domain_type: impl Into<String>, boost: f64) -> Self {
        let domain_type = domain_type.into();
        match self.indices_boost.iter_mut().find(|(t, _)| *t == domain_type) {
            Some(entry) => entry.1 = boost,
            None => self.indices_boost.push((domain_type, boost)),
        }
        self
    }

    /// Eager loads relations on the primary domain type's records.
    pub fn load(self, relations: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let domain_type = self.domain_type.clone();
        self.load_for(domain_type, relations)
    }

    /// Eager loads relations on a searched domain type's records.
    pub fn load_for(
        mut self,
        domain_type: impl Into<String>,
        relations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let loaded = self.relations.entry(domain_type.into()).or_default();
        for relation in relations {
            let relation = relation.into();
            if !loaded.contains(&relation) {
                loaded.push(relation);
            }
        }
        self
    }

    /// Validates the configuration and produces the request.
    ///
    /// Building doesn't change the builder; calling it twice gives equal requests.
    pub fn build(&self) -> Result<SearchRequest, SearchError> {
        if self.queries.len() > 1 {
            return Err(SearchError::ConflictingQuery);
        }
        let query = self
            .queries
            .first()
            .map(|query| query.build_query())
            .transpose()?;

        let referenced = self
            .indices_boost
            .iter()
            .map(|(domain_type, _)| domain_type)
            .chain(self.relations.keys());
        for domain_type in referenced {
            if !self.searches(domain_type) {
                return Err(SearchError::UnsearchedType {
                    domain_type: domain_type.clone(),
                });
            }
        }

        Ok(SearchRequest {
            domain_type: self.domain_type.clone(),
            joined: self.joined.clone(),
            query,
            post_filter: self.post_filter.clone(),
            highlight: self.highlight.clone(),
            sort: self.sort.clone(),
            aggregations: self.aggregations.clone(),
            suggest: self.suggest.clone(),
            collapse: self.collapse.clone(),
            source: self.source.clone(),
            from: self.from,
            size: self.size,
            track_total_hits: self.track_total_hits,
            track_scores: self.track_scores,
            min_score: self.min_score,
            indices_boost: self.indices_boost.clone(),
            relations: self.relations.clone(),
        })
    }

    /// Builds and executes the request, returning a materialized result.
    pub fn execute<T, M>(&self, engine: &SearchEngine<T, M>) -> Result<SearchResult<M>, SearchError>
    where
        T: SearchTransport,
        M: Model,
    {
        engine.search(&self.build()?)
    }

    /// Builds and executes the request, returning the raw engine response.
    pub fn raw<T, M>(&self, engine: &SearchEngine<T, M>) -> Result<Value, SearchError>
    where
        T: SearchTransport,
        M: Model,
    {
        engine.search_raw(&self.build()?)
    }

    /// Fetches one page of matches.
    ///
    /// `per_page` and `page_name` fall back to the engine settings. Pages start at 1. The
    /// request must not set `from` or `size` itself and must keep total hit tracking on.
    pub fn paginate<T, M>(
        &self,
        engine: &SearchEngine<T, M>,
        per_page: Option<usize>,
        page_name: Option<&str>,
        page: usize,
    ) -> Result<Paginator<SearchMatch<M>>, SearchError>
    where
        T: SearchTransport,
        M: Model,
    {
        if self.from.is_some() || self.size.is_some() {
            return Err(SearchError::PaginationConflict);
        }
        if self
            .track_total_hits
            .is_some_and(|track| !track.is_enabled())
        {
            return Err(SearchError::TotalHitsNotTracked);
        }

        let settings = engine.settings();
        let per_page = per_page.unwrap_or(settings.per_page);
        let invalid = || SearchError::InvalidPage { page, per_page };
        if page == 0 || per_page == 0 {
            return Err(invalid());
        }
        let from = (page - 1).checked_mul(per_page).ok_or_else(invalid)?;
        let page_name = page_name.unwrap_or(&settings.page_name).to_string();

        let request = self.build()?.window(from, per_page);
        let result = engine.search(&request)?;
        let total = result
            .total()
            .ok_or_else(|| SearchError::malformed("paginated response has no `hits.total`"))?;

        Ok(Paginator::new(
            result.into_matches(),
            total,
            per_page,
            page,
            page_name,
        ))
    }

    /// Whether a domain type is primary or joined.
    fn searches(&self, domain_type: &str) -> bool {
        self.domain_type == domain_type || self.joined.iter().any(|t| t == domain_type)
    }
}

/// Returns the map inside an object value.
fn into_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use scout_query::{IdsQueryBuilder, MatchQueryBuilder, TermQueryBuilder, TermsQueryBuilder};

    use super::*;

    fn body(builder: &SearchRequestBuilder) -> Value {
        builder.build().unwrap().body(str::to_string)
    }

    #[test]
    fn match_query_body() {
        let builder = SearchRequestBuilder::new("books")
            .query(MatchQueryBuilder::new().field("title").query("bar"));
        assert_eq!(
            body(&builder),
            json!({"query": {"match": {"title": {"query": "bar"}}}})
        );
    }

    #[test]
    fn term_and_terms_bodies() {
        let term = SearchRequestBuilder::new("books")
            .query(TermQueryBuilder::new().field("year").value(2020));
        assert_eq!(
            body(&term),
            json!({"query": {"term": {"year": {"value": 2020}}}})
        );

        let terms = SearchRequestBuilder::new("books")
            .query(TermsQueryBuilder::new().terms("tags", ["a", "b"]).boost(2.0));
        assert_eq!(
            body(&terms),
            json!({"query": {"terms": {"tags": ["a", "b"], "boost": 2.0}}})
        );
    }

    #[test]
    fn raw_query_is_passed_through() {
        let builder =
            SearchRequestBuilder::new("books").raw_query(json!({"match_all": {"boost": 1.0}}));
        assert_eq!(body(&builder), json!({"query": {"match_all": {"boost": 1.0}}}));
    }

    #[test]
    fn no_query_means_no_query_key() {
        let builder = SearchRequestBuilder::new("books").size(0);
        assert_eq!(body(&builder), json!({"size": 0}));
    }

    #[test]
    fn second_primary_query_conflicts() {
        let builder = SearchRequestBuilder::new("books")
            .query(IdsQueryBuilder::new().values(["1"]))
            .raw_query(json!({"match_all": {}}));
        assert!(matches!(builder.build(), Err(SearchError::ConflictingQuery)));
    }

    #[test]
    fn query_errors_surface_at_build() {
        let builder =
            SearchRequestBuilder::new("books").query(MatchQueryBuilder::new().field("title"));
        assert!(matches!(builder.build(), Err(SearchError::Query(_))));
    }

    #[test]
    fn sort_accumulates_in_order() {
        let builder = SearchRequestBuilder::new("books")
            .sort("published", SortOrder::Desc)
            .sort_raw([json!("_score")])
            .sort("_id", SortOrder::Asc);
        assert_eq!(
            body(&builder)["sort"],
            json!([{"published": {"order": "desc"}}, "_score", {"_id": {"order": "asc"}}])
        );
    }

    #[test]
    fn highlight_accumulates_fields() {
        let builder = SearchRequestBuilder::new("books")
            .highlight("title", json!({}))
            .highlight("body", json!({"fragment_size": 50}))
            .highlight("title", json!({"number_of_fragments": 1}));
        assert_eq!(
            body(&builder)["highlight"],
            json!({"fields": {
                "title": {"number_of_fragments": 1},
                "body": {"fragment_size": 50}
            }})
        );
    }

    #[test]
    fn highlight_raw_replaces_and_highlight_extends_it() {
        let replaced = SearchRequestBuilder::new("books")
            .highlight("title", json!({}))
            .highlight_raw(json!({"pre_tags": ["<b>"], "fields": {"body": {}}}));
        assert_eq!(
            body(&replaced)["highlight"],
            json!({"pre_tags": ["<b>"], "fields": {"body": {}}})
        );

        let extended = replaced.highlight("title", json!({}));
        assert_eq!(
            body(&extended)["highlight"],
            json!({"pre_tags": ["<b>"], "fields": {"body": {}, "title": {}}})
        );
    }

    #[test]
    fn aggregations_and_suggesters_overwrite_by_name() {
        let mut more = Map::new();
        more.insert("min_price".into(), json!({"min": {"field": "price"}}));
        more.insert("max_price".into(), json!({"max": {"field": "price"}}));

        let builder = SearchRequestBuilder::new("books")
            .aggregate("max_price", json!({"max": {"field": "old"}}))
            .aggregate_raw(more)
            .suggest("title", json!({"text": "wirld", "term": {"field": "title"}}))
            .suggest("title", json!({"text": "world", "term": {"field": "title"}}));

        let body = body(&builder);
        assert_eq!(
            body["aggs"],
            json!({
                "max_price": {"max": {"field": "price"}},
                "min_price": {"min": {"field": "price"}}
            })
        );
        assert_eq!(
            body["suggest"],
            json!({"title": {"text": "world", "term": {"field": "title"}}})
        );
    }

    #[test]
    fn last_post_filter_and_collapse_win() {
        let builder = SearchRequestBuilder::new("books")
            .post_filter("term", json!({"published": "2020-06-07"}))
            .post_filter("term", json!({"author_id": 3}))
            .collapse("author_id")
            .collapse_raw(json!({"field": "publisher", "inner_hits": {"name": "latest"}}));
        let body = body(&builder);
        assert_eq!(body["post_filter"], json!({"term": {"author_id": 3}}));
        assert_eq!(
            body["collapse"],
            json!({"field": "publisher", "inner_hits": {"name": "latest"}})
        );
    }

    #[test]
    fn request_level_options() {
        let builder = SearchRequestBuilder::new("books")
            .source(["title", "price"])
            .from(10)
            .size(5)
            .track_total_hits(100_u64)
            .track_scores(true)
            .min_score(0.5);
        assert_eq!(
            body(&builder),
            json!({
                "_source": ["title", "price"],
                "from": 10,
                "size": 5,
                "track_total_hits": 100,
                "track_scores": true,
                "min_score": 0.5
            })
        );

        let no_source = SearchRequestBuilder::new("books")
            .source_raw(json!(false))
            .track_total_hits(false);
        assert_eq!(
            body(&no_source),
            json!({"_source": false, "track_total_hits": false})
        );
    }

    #[test]
    fn empty_source_list_returns_no_fields() {
        let builder = SearchRequestBuilder::new("books").source(Vec::<String>::new());
        assert_eq!(body(&builder), json!({"_source": false}));
    }

    #[test]
    fn track_total_hits_up_to_takes_plain_literals() {
        let builder = SearchRequestBuilder::new("books").track_total_hits_up_to(5);
        assert_eq!(body(&builder), json!({"track_total_hits": 5}));
    }

    #[test]
    fn joins_and_relations() {
        let request = SearchRequestBuilder::new("books")
            .join("authors")
            .join("authors")
            .join("books")
            .load(["author"])
            .load(["author", "publisher"])
            .load_for("authors", ["books"])
            .build()
            .unwrap();

        assert_eq!(request.joined_types(), ["authors".to_string()]);
        assert_eq!(
            request.relations("books"),
            ["author".to_string(), "publisher".to_string()]
        );
        assert_eq!(request.relations("authors"), ["books".to_string()]);
        assert!(request.searches("authors"));
        assert!(!request.searches("reviews"));
    }

    #[test]
    fn options_for_unsearched_types_fail() {
        let relations = SearchRequestBuilder::new("books").load_for("authors", ["books"]);
        assert!(matches!(
            relations.build(),
            Err(SearchError::UnsearchedType { ref domain_type }) if domain_type == "authors"
        ));

        let boost = SearchRequestBuilder::new("books").boost_index("authors", 2.0);
        assert!(matches!(
            boost.build(),
            Err(SearchError::UnsearchedType { .. })
        ));

        // Joining later makes both valid.
        assert!(boost.join("authors").build().is_ok());
    }

    #[test]
    fn boost_index_overwrites_per_type() {
        let request = SearchRequestBuilder::new("books")
            .boost_index("books", 1.0)
            .boost_index("books", 2.0)
            .build()
            .unwrap();
        assert_eq!(
            request.body(str::to_string)["indices_boost"],
            json!([{"books": 2.0}])
        );
    }

    #[test]
    fn build_is_idempotent() {
        let builder = SearchRequestBuilder::new("books")
            .query(TermQueryBuilder::new().field("year").value(2020))
            .highlight("title", json!({}))
            .load(["author"]);
        assert_eq!(builder.build().unwrap(), builder.build().unwrap());
    }
}

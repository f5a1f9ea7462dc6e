//! Search results and the matches they contain.

use std::{collections::BTreeMap, fmt, rc::Rc};

use serde_json::{Map, Value};

use crate::{
    document::{Document, Highlight, Suggestion},
    error::SearchError,
    lazy::LazyModelFactory,
    model::Model,
};

/// One hit of a search, paired with its lazily loaded domain record.
pub struct SearchMatch<M> {
    /// Domain type the hit belongs to.
    pub(crate) domain_type: String,
    /// Index the hit came from.
    pub(crate) index_name: String,
    /// Stored document.
    pub(crate) document: Document,
    /// Relevance score, when the engine computed one.
    pub(crate) score: Option<f64>,
    /// Highlighted fragments.
    pub(crate) highlight: Option<Highlight>,
    /// Resolution context shared with the other matches of the result.
    pub(crate) factory: Rc<LazyModelFactory<M>>,
}

impl<M: Model> SearchMatch<M> {
    /// Returns the domain type of the hit.
    pub fn domain_type(&self) -> &str {
        &self.domain_type
    }

    /// Returns the index the hit came from.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Returns the stored document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the document id.
    pub fn id(&self) -> &str {
        self.document.id()
    }

    /// Returns the relevance score.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// Returns the highlighted fragments.
    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    /// Returns the domain record behind the hit.
    ///
    /// The first call on any match of a result loads the records of every match. Returns
    /// `None` if the record no longer exists.
    pub fn model(&self) -> Result<Option<&M>, SearchError> {
        self.factory.model(&self.domain_type, self.document.id())
    }
}

impl<M> fmt::Debug for SearchMatch<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchMatch")
            .field("domain_type", &self.domain_type)
            .field("index_name", &self.index_name)
            .field("document", &self.document)
            .field("score", &self.score)
            .field("highlight", &self.highlight)
            .finish_non_exhaustive()
    }
}

/// The materialized outcome of a search.
pub struct SearchResult<M> {
    /// Matches in response order.
    pub(crate) matches: Vec<SearchMatch<M>>,
    /// Total hits, when tracked.
    pub(crate) total: Option<u64>,
    /// Aggregation results by name.
    pub(crate) aggregations: Map<String, Value>,
    /// Suggester results by name.
    pub(crate) suggestions: BTreeMap<String, Vec<Suggestion>>,
    /// Resolution context shared by the matches.
    pub(crate) factory: Rc<LazyModelFactory<M>>,
}

impl<M: Model> SearchResult<M> {
    /// Returns every match, in response order.
    pub fn matches(&self) -> &[SearchMatch<M>] {
        &self.matches
    }

    /// Consumes the result, returning its matches.
    pub fn into_matches(self) -> Vec<SearchMatch<M>> {
        self.matches
    }

    /// Returns the domain records of the matches, in response order.
    ///
    /// Matches whose record no longer exists are left out.
    pub fn models(&self) -> Result<Vec<&M>, SearchError> {
        self.factory.models()
    }

    /// Returns the stored documents, in response order.
    pub fn documents(&self) -> Vec<&Document> {
        self.matches.iter().map(SearchMatch::document).collect()
    }

    /// Returns the highlights of the matches that have one.
    pub fn highlights(&self) -> Vec<&Highlight> {
        self.matches
            .iter()
            .filter_map(SearchMatch::highlight)
            .collect()
    }

    /// Returns the total number of hits, when tracked.
    ///
    /// With a capped `track_total_hits` this is at most the cap.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Returns all aggregation results.
    pub fn aggregations(&self) -> &Map<String, Value> {
        &self.aggregations
    }

    /// Returns one aggregation result.
    pub fn aggregation(&self, name: &str) -> Option<&Value> {
        self.aggregations.get(name)
    }

    /// Returns all suggester results.
    pub fn suggestions(&self) -> &BTreeMap<String, Vec<Suggestion>> {
        &self.suggestions
    }

    /// Returns one suggester's entries.
    pub fn suggestion(&self, name: &str) -> Option<&[Suggestion]> {
        self.suggestions.get(name).map(Vec::as_slice)
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether there are no matches.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl<M> fmt::Debug for SearchResult<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResult")
            .field("matches", &self.matches)
            .field("total", &self.total)
            .field("aggregations", &self.aggregations)
            .field("suggestions", &self.suggestions)
            .finish_non_exhaustive()
    }
}

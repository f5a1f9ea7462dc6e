//! Serializable snapshots of search results.
//!
//! A [`SearchResult`] shares its resolution context between matches and holds loaded domain
//! records, so it can't be stored as is. A [`SearchResultSnapshot`] keeps everything the
//! engine returned plus the relations to load, and turns back into a result through
//! [`SearchEngine::restore`](crate::SearchEngine::restore). Records are loaded again on first
//! access, in one pass, like for a fresh result.

use std::{collections::BTreeMap, rc::Rc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    document::{Document, Highlight, Suggestion},
    lazy::{HitRef, LazyModelFactory},
    model::{Model, ModelRegistry},
    result::{SearchMatch, SearchResult},
};

/// One hit of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitSnapshot {
    /// Domain type the hit belongs to.
    pub domain_type: String,
    /// Index the hit came from.
    pub index_name: String,
    /// Stored document.
    pub document: Document,
    /// Relevance score.
    #[serde(default)]
    pub score: Option<f64>,
    /// Highlighted fragments.
    #[serde(default)]
    pub highlight: Option<Highlight>,
}

/// The engine-side content of a [`SearchResult`], without its loaded records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSnapshot {
    /// Hits in response order.
    pub hits: Vec<HitSnapshot>,
    /// Total hits, when tracked.
    #[serde(default)]
    pub total: Option<u64>,
    /// Aggregation results by name.
    #[serde(default)]
    pub aggregations: Map<String, Value>,
    /// Suggester results by name.
    #[serde(default)]
    pub suggestions: BTreeMap<String, Vec<Suggestion>>,
    /// Relations to eager load, per domain type.
    #[serde(default)]
    pub relations: BTreeMap<String, Vec<String>>,
}

impl SearchResultSnapshot {
    /// Attaches the hits to a fresh resolution context.
    pub(crate) fn into_result<M: Model>(
        self,
        registry: Rc<ModelRegistry<M>>,
    ) -> SearchResult<M> {
        let hit_refs = self
            .hits
            .iter()
            .map(|hit| HitRef {
                domain_type: hit.domain_type.clone(),
                id: hit.document.id().to_string(),
            })
            .collect();
        let factory = Rc::new(LazyModelFactory::new(registry, hit_refs, self.relations));

        let matches = self
            .hits
            .into_iter()
            .map(|hit| SearchMatch {
                domain_type: hit.domain_type,
                index_name: hit.index_name,
                document: hit.document,
                score: hit.score,
                highlight: hit.highlight,
                factory: Rc::clone(&factory),
            })
            .collect();

        SearchResult {
            matches,
            total: self.total,
            aggregations: self.aggregations,
            suggestions: self.suggestions,
            factory,
        }
    }
}

impl<M: Model> SearchResult<M> {
    /// Captures the result in a form that can be serialized and restored later.
    ///
    /// Loaded records are not part of the snapshot.
    pub fn snapshot(&self) -> SearchResultSnapshot {
        SearchResultSnapshot {
            hits: self
                .matches
                .iter()
                .map(|hit| HitSnapshot {
                    domain_type: hit.domain_type.clone(),
                    index_name: hit.index_name.clone(),
                    document: hit.document.clone(),
                    score: hit.score,
                    highlight: hit.highlight.clone(),
                })
                .collect(),
            total: self.total,
            aggregations: self.aggregations.clone(),
            suggestions: self.suggestions.clone(),
            relations: self.factory.relations().clone(),
        }
    }
}

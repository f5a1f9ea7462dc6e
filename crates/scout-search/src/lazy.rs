//! Deferred, batched resolution of search hits into domain records.
//!
//! A [`LazyModelFactory`] is shared by every match of one search result. Nothing is loaded
//! until a record is first requested; then every hit is resolved in one pass, one
//! [`RecordStore::find_many`](crate::RecordStore::find_many) call per domain type, and the
//! outcome is kept for the lifetime of the result.

use std::{
    cell::OnceCell,
    collections::{BTreeMap, HashMap, HashSet},
    fmt,
    rc::Rc,
};

use tracing::{debug, warn};

use crate::{
    error::SearchError,
    model::{Model, ModelRegistry},
};

/// Records loaded by a resolution pass: domain type -> search key -> record.
type Resolved<M> = HashMap<String, HashMap<String, M>>;

/// A hit reference: domain type and document id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitRef {
    /// Domain type the hit belongs to.
    pub domain_type: String,
    /// Document id.
    pub id: String,
}

/// Resolves the hits of one search result into domain records on first access.
pub struct LazyModelFactory<M> {
    /// Stores that load records.
    registry: Rc<ModelRegistry<M>>,
    /// Every hit, in response order.
    hits: Vec<HitRef>,
    /// Relations to eager load, per domain type.
    relations: BTreeMap<String, Vec<String>>,
    /// Outcome of the single resolution pass.
    resolved: OnceCell<Resolved<M>>,
}

impl<M: Model> LazyModelFactory<M> {
    /// Creates a factory for the given hits.
    pub(crate) fn new(
        registry: Rc<ModelRegistry<M>>,
        hits: Vec<HitRef>,
        relations: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            registry,
            hits,
            relations,
            resolved: OnceCell::new(),
        }
    }

    /// Returns the relations eager loaded per domain type.
    pub fn relations(&self) -> &BTreeMap<String, Vec<String>> {
        &self.relations
    }

    /// Whether the resolution pass has already run successfully.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Runs the resolution pass if it hasn't run yet.
    ///
    /// A failed pass is not remembered; the next access tries again.
    pub fn resolve(&self) -> Result<(), SearchError> {
        self.resolved().map(|_| ())
    }

    /// Returns the record behind one hit, or `None` if the store no longer has it.
    pub fn model(&self, domain_type: &str, id: &str) -> Result<Option<&M>, SearchError> {
        let resolved = self.resolved()?;
        Ok(resolved.get(domain_type).and_then(|records| records.get(id)))
    }

    /// Returns the records behind every hit, in hit order.
    ///
    /// Hits whose record is missing from its store are left out.
    pub fn models(&self) -> Result<Vec<&M>, SearchError> {
        let resolved = self.resolved()?;
        let mut models = Vec::with_capacity(self.hits.len());
        for hit in &self.hits {
            match resolved
                .get(&hit.domain_type)
                .and_then(|records| records.get(&hit.id))
            {
                Some(model) => models.push(model),
                None => warn!(
                    domain_type = %hit.domain_type,
                    id = %hit.id,
                    "search hit has no matching record"
                ),
            }
        }
        Ok(models)
    }

    /// Returns the resolved records, loading them on first use.
    fn resolved(&self) -> Result<&Resolved<M>, SearchError> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(resolved);
        }
        let loaded = self.load()?;
        Ok(self.resolved.get_or_init(|| loaded))
    }

    /// Loads every hit's record, one store call per domain type.
    fn load(&self) -> Result<Resolved<M>, SearchError> {
        let mut resolved = HashMap::new();

        for (domain_type, ids) in self.ids_by_type() {
            let store =
                self.registry
                    .get(domain_type)
                    .ok_or_else(|| SearchError::UnregisteredType {
                        domain_type: domain_type.to_string(),
                    })?;
            let relations = self
                .relations
                .get(domain_type)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            let records = store
                .find_many(&ids, relations)
                .map_err(|source| SearchError::Store {
                    domain_type: domain_type.to_string(),
                    source,
                })?;
            debug!(
                domain_type,
                requested = ids.len(),
                found = records.len(),
                "resolved search hits"
            );

            let by_key = records
                .into_iter()
                .map(|record| (record.search_key(), record))
                .collect();
            resolved.insert(domain_type.to_string(), by_key);
        }

        Ok(resolved)
    }

    /// Groups hit ids by domain type, both in first-seen order, without duplicates.
    fn ids_by_type(&self) -> Vec<(&str, Vec<String>)> {
        let mut groups: Vec<(&str, Vec<String>)> = Vec::new();
        let mut seen = HashSet::new();

        for hit in &self.hits {
            if !seen.insert((hit.domain_type.as_str(), hit.id.as_str())) {
                continue;
            }
            match groups
                .iter_mut()
                .find(|(domain_type, _)| *domain_type == hit.domain_type)
            {
                Some((_, ids)) => ids.push(hit.id.clone()),
                None => groups.push((hit.domain_type.as_str(), vec![hit.id.clone()])),
            }
        }

        groups
    }
}

impl<M> fmt::Debug for LazyModelFactory<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyModelFactory")
            .field("hits", &self.hits.len())
            .field("relations", &self.relations)
            .field("resolved", &self.resolved.get().is_some())
            .finish()
    }
}

//! Domain records and the stores that load them.

use std::{collections::BTreeMap, fmt};

use crate::error::BoxError;

/// A domain record that can be matched to search hits.
pub trait Model {
    /// Returns the key under which the record is indexed; compared with hit `_id`s.
    fn search_key(&self) -> String;
}

/// Loads domain records of one type by their search keys.
pub trait RecordStore<M> {
    /// Loads the records with the given keys, eager loading `relations`.
    ///
    /// Keys without a record are left out. Records may be returned in any order.
    fn find_many(&self, ids: &[String], relations: &[String]) -> Result<Vec<M>, BoxError>;
}

impl<M, F> RecordStore<M> for F
where
    F: Fn(&[String], &[String]) -> Result<Vec<M>, BoxError>,
{
    fn find_many(&self, ids: &[String], relations: &[String]) -> Result<Vec<M>, BoxError> {
        self(ids, relations)
    }
}

/// Maps domain type names to the record stores that resolve their hits.
pub struct ModelRegistry<M> {
    /// Stores keyed by domain type.
    stores: BTreeMap<String, Box<dyn RecordStore<M>>>,
}

impl<M> ModelRegistry<M> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            stores: BTreeMap::new(),
        }
    }

    /// Registers a store for a domain type, replacing any previous one.
    pub fn register(
        mut self,
        domain_type: impl Into<String>,
        store: impl RecordStore<M> + 'static,
    ) -> Self {
        self.insert(domain_type, store);
        self
    }

    /// Registers a store in place, replacing any previous one.
    pub fn insert(
        &mut self,
        domain_type: impl Into<String>,
        store: impl RecordStore<M> + 'static,
    ) {
        let store: Box<dyn RecordStore<M>> = Box::new(store);
        self.stores.insert(domain_type.into(), store);
    }

    /// Returns the store for a domain type.
    pub fn get(&self, domain_type: &str) -> Option<&dyn RecordStore<M>> {
        self.stores.get(domain_type).map(|store| &**store)
    }

    /// Whether a store is registered for a domain type.
    pub fn contains(&self, domain_type: &str) -> bool {
        self.stores.contains_key(domain_type)
    }

    /// Registered domain types, sorted.
    pub fn domain_types(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }
}

impl<M> Default for ModelRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for ModelRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("domain_types", &self.stores.keys().collect::<Vec<_>>())
            .finish()
    }
}

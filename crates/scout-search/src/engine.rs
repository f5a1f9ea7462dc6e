//! The execution layer: index naming, dispatch and result construction.

use std::{collections::BTreeMap, rc::Rc};

use scout_config::{Config, DEFAULT_PAGE_NAME, DEFAULT_PER_PAGE, resolve_index_name};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::SearchError,
    factory::build_result,
    model::{Model, ModelRegistry},
    request::SearchRequest,
    result::SearchResult,
    snapshot::SearchResultSnapshot,
    transport::SearchTransport,
};

/// Engine-wide settings, usually derived from a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Prefix prepended to every index name.
    pub index_prefix: String,
    /// Index names used instead of the domain type name, keyed by domain type.
    pub index_names: BTreeMap<String, String>,
    /// Page size used by `paginate` when none is given.
    pub per_page: usize,
    /// Page parameter name used by `paginate` when none is given.
    pub page_name: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            index_prefix: String::new(),
            index_names: BTreeMap::new(),
            per_page: DEFAULT_PER_PAGE,
            page_name: String::from(DEFAULT_PAGE_NAME),
        }
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            index_prefix: config.settings.index_prefix.clone(),
            index_names: config
                .indices
                .iter()
                .filter_map(|(domain_type, index)| {
                    index.name.clone().map(|name| (domain_type.clone(), name))
                })
                .collect(),
            per_page: config.pagination.per_page,
            page_name: config.pagination.page_name.clone(),
        }
    }
}

impl EngineSettings {
    /// Returns the index name of a domain type: prefix plus override or type name.
    pub fn index_name(&self, domain_type: &str) -> String {
        let name = self.index_names.get(domain_type).map(String::as_str);
        resolve_index_name(&self.index_prefix, name, domain_type)
    }

    /// Finds which of `domain_types` owns `index`.
    pub fn domain_type_of<'a>(
        &self,
        index: &str,
        domain_types: impl IntoIterator<Item = &'a str>,
    ) -> Option<&'a str> {
        domain_types
            .into_iter()
            .find(|domain_type| self.index_name(domain_type) == index)
    }
}

/// Executes search requests through a transport and materializes their results.
#[derive(Debug)]
pub struct SearchEngine<T, M> {
    /// Transport the requests go through.
    transport: T,
    /// Record stores, shared with every result.
    registry: Rc<ModelRegistry<M>>,
    /// Index naming and pagination defaults.
    settings: EngineSettings,
}

impl<T, M> SearchEngine<T, M> {
    /// Creates an engine with default settings.
    pub fn new(transport: T, registry: ModelRegistry<M>) -> Self {
        Self {
            transport,
            registry: Rc::new(registry),
            settings: EngineSettings::default(),
        }
    }

    /// Replaces the engine settings.
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Takes index naming and pagination defaults from a loaded configuration.
    pub fn with_config(self, config: &Config) -> Self {
        self.with_settings(EngineSettings::from(config))
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the record store registry.
    pub fn registry(&self) -> &ModelRegistry<M> {
        &self.registry
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the index name of a domain type.
    pub fn index_name(&self, domain_type: &str) -> String {
        self.settings.index_name(domain_type)
    }
}

impl<T: SearchTransport, M: Model> SearchEngine<T, M> {
    /// Sends a request and returns the response untouched.
    pub fn search_raw(&self, request: &SearchRequest) -> Result<Value, SearchError> {
        let indices: Vec<String> = request
            .domain_types()
            .map(|domain_type| self.index_name(domain_type))
            .collect();
        let body = request.body(|domain_type| self.index_name(domain_type));

        debug!(
            indices = ?indices,
            from = ?request.from(),
            size = ?request.size(),
            "dispatching search"
        );
        self.transport
            .search(&indices, &body)
            .map_err(SearchError::Transport)
    }

    /// Sends a request and builds a result from the response.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult<M>, SearchError> {
        let response = self.search_raw(request)?;
        build_result(response, request, &self.settings, Rc::clone(&self.registry))
    }

    /// Turns a stored snapshot back into a result resolving through this engine's stores.
    pub fn restore(&self, snapshot: SearchResultSnapshot) -> SearchResult<M> {
        snapshot.into_result(Rc::clone(&self.registry))
    }
}

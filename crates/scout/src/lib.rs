//! scout: search requests over an application's persisted records.
//!
//! Applications describe a search with a fluent [`SearchRequestBuilder`], send it to a
//! document search engine through a [`SearchEngine`], and get back a [`SearchResult`] whose
//! matches resolve to domain records on demand. Records are loaded by a shared
//! [`LazyModelFactory`] with one batch per domain type, the first time any match asks for
//! its record.
//!
//! This crate re-exports the public API of the workspace:
//! - [`query`]: query parameter collections and query builders
//! - [`config`]: layered `.scout.toml` configuration
//! - the request, engine and result types of `scout-search` at the crate root
//!
//! It also hosts the `scout` command line tool, which inspects configuration.

#![warn(missing_docs)]

pub mod cli;

pub use scout_config as config;
pub use scout_config::{Config, ConfigError, ConfigWarning};
pub use scout_query as query;
pub use scout_query::{QueryBuilder, QueryError};
pub use scout_search::{
    BoxError, Document, EngineSettings, Highlight, HitSnapshot, LazyModelFactory, Model,
    ModelRegistry, Paginator, RecordStore, SearchEngine, SearchError, SearchMatch, SearchRequest,
    SearchRequestBuilder, SearchResult, SearchResultSnapshot, SearchTransport, SortOrder,
    Suggestion, TrackTotalHits,
};

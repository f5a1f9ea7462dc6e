//! Search request building and lazy result materialization for scout.
//!
//! This crate sits between an application's persisted records and a document search engine:
//! - [`SearchRequestBuilder`] assembles a primary query and request options into an immutable
//!   [`SearchRequest`]
//! - [`SearchEngine`] maps domain types to index names and sends requests through a
//!   [`SearchTransport`]
//! - [`SearchResult`] pairs each hit's [`Document`] with its domain record, which a shared
//!   [`LazyModelFactory`] loads in one batch per domain type on first access
//! - [`Paginator`] carries one page of matches with the total they were taken from
//! - [`SearchResultSnapshot`] stores a result for later; [`SearchEngine::restore`] turns it
//!   back into a result that resolves its records again
//!
//! # Example
//!
//! ```
//! use scout_query::IdsQueryBuilder;
//! use scout_search::{BoxError, Model, ModelRegistry, SearchEngine, SearchRequestBuilder};
//! use serde_json::{Value, json};
//!
//! #[derive(Debug, PartialEq)]
//! struct Book {
//!     id: u32,
//! }
//!
//! impl Model for Book {
//!     fn search_key(&self) -> String {
//!         self.id.to_string()
//!     }
//! }
//!
//! let transport = |_: &[String], _: &Value| -> Result<Value, BoxError> {
//!     Ok(json!({"hits": {"total": 1, "hits": [{"_index": "books", "_id": "8"}]}}))
//! };
//! let books = |ids: &[String], _: &[String]| -> Result<Vec<Book>, BoxError> {
//!     Ok(ids.iter().map(|id| Book { id: id.parse().unwrap() }).collect())
//! };
//! let engine = SearchEngine::new(transport, ModelRegistry::new().register("books", books));
//!
//! let result = SearchRequestBuilder::new("books")
//!     .query(IdsQueryBuilder::new().values(["8"]))
//!     .execute(&engine)
//!     .unwrap();
//! assert_eq!(result.models().unwrap(), vec![&Book { id: 8 }]);
//! ```

#![warn(missing_docs)]

mod builder;
mod document;
mod engine;
mod error;
mod factory;
mod lazy;
mod model;
mod paginator;
mod request;
mod result;
mod snapshot;
mod transport;

pub use builder::SearchRequestBuilder;
pub use document::{Document, Highlight, Suggestion};
pub use engine::{EngineSettings, SearchEngine};
pub use error::{BoxError, SearchError};
pub use lazy::LazyModelFactory;
pub use model::{Model, ModelRegistry, RecordStore};
pub use paginator::Paginator;
pub use request::{SearchRequest, SortOrder, TrackTotalHits};
pub use result::{SearchMatch, SearchResult};
pub use snapshot::{HitSnapshot, SearchResultSnapshot};
pub use transport::SearchTransport;

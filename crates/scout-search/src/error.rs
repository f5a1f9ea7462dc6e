//! Error types for the scout-search crate.

use std::error::Error as StdError;

use scout_query::QueryError;
use thiserror::Error;

/// Boxed error returned by transports and record stores.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that can occur when building, executing or materializing a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A query builder was misconfigured.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// More than one primary query was set on the same request.
    #[error("a search request takes one primary query; combine clauses with a bool query")]
    ConflictingQuery,

    /// `from`/`size` were set explicitly and `paginate` was called.
    #[error("paginate computes from and size itself; remove the explicit from/size")]
    PaginationConflict,

    /// Pagination needs a total hit count but tracking is disabled.
    #[error("total hits are not tracked; pagination needs track_total_hits enabled")]
    TotalHitsNotTracked,

    /// Page number or page size of zero.
    #[error("invalid page {page} with {per_page} results per page; both must be at least 1")]
    InvalidPage {
        /// Requested page number.
        page: usize,
        /// Requested page size.
        per_page: usize,
    },

    /// A per-type option references a domain type the request doesn't search.
    #[error("domain type '{domain_type}' is not searched by this request; join it first")]
    UnsearchedType {
        /// The referenced domain type.
        domain_type: String,
    },

    /// No record store is registered for a domain type.
    #[error("no record store registered for domain type '{domain_type}'")]
    UnregisteredType {
        /// The domain type without a store.
        domain_type: String,
    },

    /// A hit came from an index that doesn't belong to any searched domain type.
    #[error("hit from index '{index}' does not belong to a searched domain type")]
    UnknownIndex {
        /// Index name reported by the engine.
        index: String,
    },

    /// The transport failed.
    #[error("search transport failed: {0}")]
    Transport(#[source] BoxError),

    /// A record store failed to load records.
    #[error("failed to load '{domain_type}' records: {source}")]
    Store {
        /// Domain type whose store failed.
        domain_type: String,
        /// Underlying store error.
        #[source]
        source: BoxError,
    },

    /// The engine response doesn't have the expected shape.
    #[error("malformed search response: {0}")]
    MalformedResponse(String),
}

impl SearchError {
    /// Creates a `MalformedResponse` error.
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}

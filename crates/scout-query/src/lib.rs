//! Query parameter collections and query builders for scout.
//!
//! This crate turns fluent builder calls into query DSL fragments for a document search
//! engine:
//!
//! - **Parameters**: [`ParameterCollection`] keeps named parameters in insertion order
//! - **Validators**: [`Validator`] decides which parameters are required together
//! - **Transformers**: [`Transformer`] shapes the parameters into the DSL structure
//! - **Builders**: one [`QueryBuilder`] per query family (`term`, `match`, `terms`,
//!   `regexp`, `ids`, raw literals, and more)
//!
//! # Example
//!
//! ```
//! use scout_query::{MatchQueryBuilder, QueryBuilder};
//! use serde_json::json;
//!
//! let query = MatchQueryBuilder::new()
//!     .field("title")
//!     .query("bar")
//!     .build_query()
//!     .unwrap();
//! assert_eq!(query, json!({"match": {"title": {"query": "bar"}}}));
//! ```

#![warn(missing_docs)]

mod builders;
mod error;
mod parameter;
mod transform;
mod validate;

pub use builders::{
    BoolQueryBuilder, ExistsQueryBuilder, FuzzyQueryBuilder, IdsQueryBuilder,
    MatchAllQueryBuilder, MatchNoneQueryBuilder, MatchPhraseQueryBuilder, MatchQueryBuilder,
    MultiMatchQueryBuilder, NestedQueryBuilder, PrefixQueryBuilder, QueryBuilder,
    RangeQueryBuilder, RawQueryBuilder, RegexpQueryBuilder, TermQueryBuilder,
    TermsQueryBuilder, WildcardQueryBuilder,
};
pub use error::{QueryError, QueryErrorKind};
pub use parameter::{ParameterCollection, QueryParameter, Scalar};
pub use transform::Transformer;
pub use validate::Validator;

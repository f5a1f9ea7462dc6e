//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use crate::Config;

/// Characters the search engine refuses in index names.
const FORBIDDEN_INDEX_CHARS: &[char] = &[
    '\\', '/', '*', '?', '"', '<', '>', '|', ' ', ',', '#', ':',
];

/// Longest accepted index name, in bytes.
const MAX_INDEX_NAME_BYTES: usize = 255;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `per_page` is zero, so every `paginate` call without an explicit size fails.
    ZeroPerPage,
    /// `page_name` is empty.
    EmptyPageName,
    /// A resolved index name would be rejected by the search engine.
    InvalidIndexName {
        /// Domain type the index belongs to.
        domain_type: String,
        /// The full index name, prefix included.
        index: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPerPage => write!(f, "pagination.per_page is 0"),
            Self::EmptyPageName => write!(f, "pagination.page_name is empty"),
            Self::InvalidIndexName {
                domain_type,
                index,
                reason,
            } => write!(
                f,
                "index name '{index}' for type '{domain_type}' is invalid: {reason}"
            ),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.pagination.per_page == 0 {
        warnings.push(ConfigWarning::ZeroPerPage);
    }
    if config.pagination.page_name.is_empty() {
        warnings.push(ConfigWarning::EmptyPageName);
    }

    for domain_type in config.indices.keys() {
        let index = config.index_name(domain_type);
        if let Some(reason) = index_name_problem(&index) {
            warnings.push(ConfigWarning::InvalidIndexName {
                domain_type: domain_type.clone(),
                index,
                reason,
            });
        }
    }

    warnings
}

/// Returns why `name` is not a usable index name, if it isn't.
fn index_name_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("empty");
    }
    if name == "." || name == ".." {
        return Some("reserved name");
    }
    if name.starts_with(['-', '_', '+']) {
        return Some("must not start with '-', '_' or '+'");
    }
    if name.chars().any(char::is_uppercase) {
        return Some("must be lowercase");
    }
    if name.contains(FORBIDDEN_INDEX_CHARS) {
        return Some("contains a forbidden character");
    }
    if name.len() > MAX_INDEX_NAME_BYTES {
        return Some("longer than 255 bytes");
    }
    None
}

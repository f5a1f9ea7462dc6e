//! Configuration system for scout.
//!
//! scout uses TOML configuration files named `.scout.toml`. Configuration is resolved by walking
//! up the directory tree from a starting directory, collecting any `.scout.toml` files found,
//! then loading `~/.scout.toml` as the global config with lowest precedence.
//!
//! ```toml
//! [settings]
//! index_prefix = "staging_"
//!
//! [pagination]
//! per_page = 20
//! page_name = "page"
//!
//! [index.books]
//! name = "library_books"
//! ```

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawIndex, RawPagination, RawSettings, parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Default number of results per page.
pub const DEFAULT_PER_PAGE: usize = 15;

/// Default name of the page query parameter.
pub const DEFAULT_PAGE_NAME: &str = "page";

/// Builds an index name: `prefix` followed by the configured `name`, or by the domain type
/// when no name is configured.
pub fn resolve_index_name(prefix: &str, name: Option<&str>, domain_type: &str) -> String {
    format!("{prefix}{}", name.unwrap_or(domain_type))
}

/// Top-level merged configuration for scout.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.scout.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Pagination defaults.
    pub pagination: PaginationSettings,
    /// Index overrides keyed by domain type.
    pub indices: BTreeMap<String, IndexSettings>,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.scout.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// This checks for:
    /// - A zero default page size
    /// - An empty page parameter name
    /// - Index overrides that produce names the search engine would reject
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Returns the full index name for a domain type, prefix included.
    pub fn index_name(&self, domain_type: &str) -> String {
        let name = self
            .indices
            .get(domain_type)
            .and_then(|index| index.name.as_deref());
        resolve_index_name(&self.settings.index_prefix, name, domain_type)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output has the same layout as a `.scout.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            settings: &self.settings,
            pagination: &self.pagination,
            index: &self.indices,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// General settings for scout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix prepended to every index name.
    pub index_prefix: String,
}

/// Pagination defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationSettings {
    /// Page size used when `paginate` is called without one.
    pub per_page: usize,
    /// Name of the page query parameter reported by paginators.
    pub page_name: String,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            page_name: String::from(DEFAULT_PAGE_NAME),
        }
    }
}

/// Index settings for one domain type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Index name used instead of the domain type name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// General settings.
    settings: &'a Settings,
    /// Pagination defaults.
    pagination: &'a PaginationSettings,
    /// Index overrides, sorted by domain type.
    index: &'a BTreeMap<String, IndexSettings>,
}

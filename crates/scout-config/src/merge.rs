//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    Config, IndexSettings, PaginationSettings, Settings,
    parse::{RawConfig, RawIndex, RawPagination, RawSettings},
};

/// A parsed config file with its source path.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to the
/// starting directory), lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins
/// - Index overrides: merged by domain type, field by field, first defined value wins
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut settings = Settings::default();
    let mut pagination = PaginationSettings::default();
    let mut indices = BTreeMap::new();

    // Lowest precedence first so closer files overwrite.
    for parsed in configs.iter().rev() {
        let raw = &parsed.config;
        if let Some(ref s) = raw.settings {
            apply_raw_settings(&mut settings, s);
        }
        if let Some(ref p) = raw.pagination {
            apply_raw_pagination(&mut pagination, p);
        }
        if let Some(ref index) = raw.index {
            for (domain_type, raw_index) in index {
                let entry = indices
                    .entry(domain_type.clone())
                    .or_insert_with(IndexSettings::default);
                apply_raw_index(entry, raw_index);
            }
        }
    }

    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(Path::to_path_buf);

    Config {
        settings,
        pagination,
        indices,
        config_root,
    }
}

/// Applies raw general settings, overwriting any present values.
fn apply_raw_settings(result: &mut Settings, raw: &RawSettings) {
    if let Some(ref v) = raw.index_prefix {
        result.index_prefix.clone_from(v);
    }
}

/// Applies raw pagination settings, overwriting any present values.
fn apply_raw_pagination(result: &mut PaginationSettings, raw: &RawPagination) {
    if let Some(v) = raw.per_page {
        result.per_page = v;
    }
    if let Some(ref v) = raw.page_name {
        result.page_name.clone_from(v);
    }
}

/// Applies a raw index override.
fn apply_raw_index(result: &mut IndexSettings, raw: &RawIndex) {
    if let Some(ref v) = raw.name {
        result.name = Some(v.clone());
    }
}

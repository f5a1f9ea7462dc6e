//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use scout_config::{Config, ConfigWarning};
use serde::Serialize;

/// One resolved index name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexNameRow {
    /// Domain type the index belongs to.
    pub domain_type: String,
    /// Full index name, prefix included.
    pub index: String,
    /// Whether a `[index.TYPE]` section renames the index.
    pub overridden: bool,
}

impl IndexNameRow {
    /// Resolves the index name of `domain_type` under `config`.
    pub fn resolve(config: &Config, domain_type: &str) -> Self {
        Self {
            domain_type: domain_type.to_string(),
            index: config.index_name(domain_type),
            overridden: config
                .indices
                .get(domain_type)
                .is_some_and(|index| index.name.is_some()),
        }
    }
}

/// Renders index name rows as a table.
pub fn index_table(rows: &[IndexNameRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Type", "Index", "Source"]);
    for row in rows {
        let source = if row.overridden { "config" } else { "type name" };
        table.add_row(vec![row.domain_type.as_str(), row.index.as_str(), source]);
    }
    table
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints validation warnings followed by hints for resolving them.
pub fn print_warnings(warnings: &[ConfigWarning]) {
    println!("Warnings ({}):", warnings.len());
    for warning in warnings {
        println!("   {warning}");
    }
    println!();

    let mut hints: Vec<&str> = warnings.iter().map(hint).collect();
    hints.sort_unstable();
    hints.dedup();
    for hint in hints {
        println!("Hint: {hint}");
    }
}

/// Returns a hint for resolving a warning.
fn hint(warning: &ConfigWarning) -> &'static str {
    match warning {
        ConfigWarning::ZeroPerPage => "set [pagination] per_page to at least 1",
        ConfigWarning::EmptyPageName => "set [pagination] page_name, e.g. \"page\"",
        ConfigWarning::InvalidIndexName { .. } => {
            "index names must be lowercase and free of spaces and \\/*?\"<>|,#:"
        }
    }
}

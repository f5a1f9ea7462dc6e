//! Implementation of `scout status`.

use std::process::ExitCode;

use scout_config::{discover_config_files, is_global_config};

use crate::cli::{
    context::CommandContext,
    output::{IndexNameRow, index_table, print_warnings},
};

/// Shows configuration files, index names, and validation warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);
    if config_files.is_empty() {
        println!("No configuration files found.");
        println!();
        println!("Run scout init to create a configuration file.");
        return ExitCode::SUCCESS;
    }

    println!("Config files (highest precedence first):");
    for path in &config_files {
        let scope = if is_global_config(path) { " (global)" } else { "" };
        println!("   {}{scope}", path.display());
    }
    println!();

    let config = &ctx.config;
    println!("Pagination:");
    println!("   per_page = {}", config.pagination.per_page);
    println!("   page_name = {:?}", config.pagination.page_name);
    println!();

    println!("Indices:");
    if config.indices.is_empty() {
        let prefix = &config.settings.index_prefix;
        println!("   (none configured; indices are named {prefix:?} + domain type)");
    } else {
        let rows: Vec<IndexNameRow> = config
            .indices
            .keys()
            .map(|domain_type| IndexNameRow::resolve(config, domain_type))
            .collect();
        println!("{}", index_table(&rows));
    }
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    print_warnings(&warnings);
    ExitCode::FAILURE
}

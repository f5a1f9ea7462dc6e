//! Implementation of `scout index`.

use std::process::ExitCode;

use crate::cli::{
    args::IndexCommand,
    context::CommandContext,
    output::{IndexNameRow, index_table, print_json},
};

/// Shows the index name each requested domain type resolves to.
pub fn run(ctx: &CommandContext, cmd: &IndexCommand) -> ExitCode {
    let config = &ctx.config;
    let rows: Vec<IndexNameRow> = if cmd.domain_types.is_empty() {
        config
            .indices
            .keys()
            .map(|domain_type| IndexNameRow::resolve(config, domain_type))
            .collect()
    } else {
        cmd.domain_types
            .iter()
            .map(|domain_type| IndexNameRow::resolve(config, domain_type))
            .collect()
    };

    if cmd.json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No index sections configured; pass domain types to resolve.");
        return ExitCode::SUCCESS;
    }
    println!("{}", index_table(&rows));
    ExitCode::SUCCESS
}

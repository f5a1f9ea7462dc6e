//! Command-line interface for scout configuration.

use std::process::ExitCode;

use scout::cli::{args::parse_cli, commands, context::CommandContext};

fn main() -> ExitCode {
    let cli = parse_cli();
    let ctx = match CommandContext::load(cli.command.needs_config()) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    commands::run(cli.command, &ctx)
}

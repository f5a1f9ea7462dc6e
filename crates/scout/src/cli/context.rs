//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use scout_config::Config;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (default if no config files were found or loading was skipped).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and, when `with_config` is set, the merged configuration.
    pub fn load(with_config: bool) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = if with_config {
            load_config_or_failure(&cwd)?
        } else {
            Config::default()
        };
        Ok(Self { cwd, config })
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}

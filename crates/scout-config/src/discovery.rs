//! Configuration file discovery.
//!
//! Configuration files are found by walking from a starting directory towards the
//! filesystem root. The global `~/.scout.toml` is appended last.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".scout.toml";

/// Discovers all configuration files that apply to `cwd`.
///
/// Returns paths in precedence order: closest to `cwd` first, global config last. A file
/// with `root = true` ends the walk and suppresses the global config.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        let stops_here = is_root_config(&candidate);
        configs.push(candidate);
        if stops_here {
            return configs;
        }
    }

    if let Some(global) = global_config_path()
        && global.is_file()
        && !configs.contains(&global)
    {
        configs.push(global);
    }

    configs
}

/// Returns the path of the global configuration file (`~/.scout.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

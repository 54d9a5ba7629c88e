use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;

use cobind_core::config::RunConfig;

///
/// Start from the `--config` TOML file when one is given, otherwise from defaults.
///
pub fn base_config(matches: &ArgMatches) -> Result<RunConfig> {
    match matches.get_one::<String>("config") {
        Some(path) => RunConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load run configuration from {}", path)),
        None => Ok(RunConfig::default()),
    }
}

pub fn override_path(target: &mut Option<PathBuf>, matches: &ArgMatches, id: &str) {
    if let Some(value) = matches.get_one::<String>(id) {
        *target = Some(PathBuf::from(value));
    }
}

pub fn override_value<T: Clone + Send + Sync + 'static>(target: &mut T, matches: &ArgMatches, id: &str) {
    if let Some(value) = matches.get_one::<T>(id) {
        *target = value.clone();
    }
}

/// A set flag turns the setting on; an absent flag keeps the file's value.
pub fn override_flag(target: &mut bool, matches: &ArgMatches, id: &str) {
    if matches.get_flag(id) {
        *target = true;
    }
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CobindError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing or unreadable input for factor `{factor}`: {path:?} ({reason})")]
    MissingInputFile {
        factor: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Optional input not found: {0:?}")]
    MissingOptionalInput(PathBuf),

    #[error("Malformed cluster file {path:?}, line {line}: {reason}")]
    MalformedPersistedCluster {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Lookup failed for `{source_name}` at {region}: {reason}")]
    LookupFailure {
        source_name: String,
        region: String,
        reason: String,
    },

    #[error("Error parsing {0}")]
    Parse(String),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CobindResult<T> = std::result::Result<T, CobindError>;

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while collecting raw environment values from their sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("required environment file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read environment file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse environment file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("environment variable {0} is not valid unicode")]
    NonUnicode(String),

    #[error("invalid environment value: {0}")]
    Deserialize(#[from] toml::de::Error),
}

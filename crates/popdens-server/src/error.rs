//! Host error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid server config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("unknown generator '{generator}' for world '{world}'")]
    UnknownGenerator { world: String, generator: String },

    #[error("duplicate world name: {0}")]
    DuplicateWorld(String),

    #[error("managed world '{0}' is not configured")]
    UnknownManagedWorld(String),

    #[error("region size must be positive, got {0}")]
    InvalidRegionSize(i32),

    #[error("replay I/O error: {0}")]
    ReplayIo(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    MalformedEvent {
        line: usize,
        source: serde_json::Error,
    },

    #[error("line {line}: unknown directive '{directive}'")]
    UnknownDirective { line: usize, directive: String },
}

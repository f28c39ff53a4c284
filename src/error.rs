use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("block '{0}' not found")]
    UnknownBlock(String),
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid schema: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("block '{0}' is defined more than once")]
    DuplicateBlock(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "BLOCK_QUERY_CONFIG";
pub const SCHEMA_ENV: &str = "BLOCK_QUERY_SCHEMA";
pub const ADDR_ENV: &str = "BLOCK_QUERY_ADDR";

const DEFAULT_SCHEMA: &str = "schema.toml";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Server settings, read from an optional TOML file and then overridden by
/// environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub schema_path: PathBuf,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from(DEFAULT_SCHEMA),
            bind_addr: DEFAULT_ADDR.to_owned(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(env::var(SCHEMA_ENV).ok(), env::var(ADDR_ENV).ok());
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_overrides(&mut self, schema_path: Option<String>, bind_addr: Option<String>) {
        if let Some(schema_path) = schema_path.filter(|s| !s.is_empty()) {
            self.schema_path = PathBuf::from(schema_path);
        }
        if let Some(bind_addr) = bind_addr.filter(|s| !s.is_empty()) {
            self.bind_addr = bind_addr;
        }
    }
}

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{errors::CatalogError, types::PaginationDefaults};

/// Environment variable naming a config file when none is passed explicitly.
pub const CONFIG_ENV_VAR: &str = "BOOZEDB_CONFIG";

/// Configuration read from a TOML file such as:
///
/// ```toml
/// [pagination]
/// page = 1
/// page_size = 25
///
/// [redis]
/// url = "${REDIS_URL}"
/// prefix = "boozedb"
///
/// [links]
/// base_url = "http://localhost:8080"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoozeDbConfig {
    #[serde(default)]
    pub pagination: PaginationDefaults,
    #[serde(default)]
    pub redis: RedisSettings,
    #[serde(default)]
    pub links: LinkSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedisSettings {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            prefix: default_prefix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_redis_url() -> String {
    "${REDIS_URL}".to_string()
}

fn default_prefix() -> String {
    "boozedb".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl BoozeDbConfig {
    /// Load configuration from `path`, else from `$BOOZEDB_CONFIG`, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
        };

        match path {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("no config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| CatalogError::config(format!("Failed to read {}: {err}", path.display())))?;
        let config = Self::from_toml(&content)
            .map_err(|err| CatalogError::config(format!("Failed to parse {}: {err}", path.display())))?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get the Redis URL, expanding a `${VAR}` placeholder from the environment.
    pub fn redis_url(&self) -> Result<String, CatalogError> {
        expand_env(&self.redis.url)
    }
}

fn expand_env(value: &str) -> Result<String, CatalogError> {
    if let Some(var_name) = value.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        std::env::var(var_name).map_err(|_| CatalogError::config(format!("Environment variable {var_name} not set")))
    } else {
        Ok(value.to_string())
    }
}

use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type returned by catalog stores and the service layer.
///
/// Filter translation itself never fails; every variant here originates at a
/// collaborator boundary (parsing raw parameters, talking to Redis, reading
/// configuration).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A stored document or fixture file could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input supplied to a search or lookup.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// Configuration could not be read or resolved.
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl CatalogError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

use thiserror::Error;

/// Problems with the `TAGS_JSON` configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TAGS_JSON environment variable must be set.")]
    Missing,

    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("TAGS_JSON must be a non-empty JSON object.")]
    NotAnObject,

    #[error("TAGS_JSON must be a non-empty JSON object.")]
    Empty,

    #[error("value for tag '{0}' must be a string")]
    NonStringValue(String),
}

/// A failed call to the tagging API, reduced to what the logs need.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: Option<String>,
    pub message: String,
}

impl ApiError {
    pub fn new(code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Invocation-level failures. Per-resource tagging errors never end up here.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("resource discovery failed: {0}")]
    Discovery(#[source] ApiError),
}

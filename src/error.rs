// Error types shared by the config loader and the API client.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HooksError {
    /// GitHub answered with a status outside the accepted set. The raw body
    /// is kept as-is so the user sees GitHub's own message.
    #[error("APIError: {status}\n{body}")]
    Api { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not load config file {}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl HooksError {
    pub fn is_api(&self) -> bool {
        matches!(self, HooksError::Api { .. })
    }
}

pub type Result<T> = std::result::Result<T, HooksError>;

//! HTTP client error types

use opsflow_core::OpsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("No API token configured. Set OPSFLOW_API_TOKEN or api_token in the config file")]
    MissingToken,

    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Service responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] opsflow_config::ConfigError),
}

impl From<HttpError> for OpsError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Status { status, message } => OpsError::from_status(status, message),
            HttpError::MissingToken => OpsError::Auth(err.to_string()),
            HttpError::InvalidUrl(_) | HttpError::Config(_) => {
                OpsError::Validation(err.to_string())
            }
            HttpError::Request(_) | HttpError::JsonError(_) => {
                OpsError::Transport(err.to_string())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, HttpError>;

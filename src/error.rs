use crate::config::ConfigError;
use crate::http::ApiFailure;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Api(#[from] ApiFailure),
    #[error("failed to decode JSON response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid header override {name:?}")]
    InvalidHeader { name: String },
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// Stable short label for host payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "config_error",
            Error::Transport(_) => "upstream_error",
            Error::Api(f) => f.code(),
            Error::Decode(_) | Error::UnexpectedResponse(_) => "server_error",
            Error::InvalidHeader { .. } => "bad_request",
        }
    }

    pub fn retriable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Api(f) => f.retriable(),
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(f) => Some(f.status),
            _ => None,
        }
    }
}

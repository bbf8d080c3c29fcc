//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The API answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never completed or its body could not be read
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid API url: {0}")]
    Url(String),
}

impl ClientError {
    /// Whether the API rejected the session or no longer knows the user
    pub fn is_session_error(&self) -> bool {
        matches!(self, ClientError::Api { status: 401 | 403 | 404, .. })
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

use std::path::PathBuf;

use thiserror::Error;

/// All possible Postmark library errors
#[derive(Debug, Error)]
pub enum Error {
    /// Missing API key, bad endpoint or unreadable config source
    #[error("Configuration: {0}")]
    Config(String),

    /// Message is missing a sender or recipients
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Could not attach file `{}`. File could not be found.", .0.display())]
    AttachmentNotFound(PathBuf),

    #[error("Could not attach file `{}`. File type not allowed.", .0.display())]
    AttachmentTypeRejected(PathBuf),

    #[error("Could not send email. Maximum attachment size reached ({total} > {limit} bytes).")]
    AttachmentTooLarge { total: u64, limit: u64 },

    /// Non-200 response carrying the provider's error body
    #[error("Postmark API: {message} (status {status}, error code {code})")]
    Provider {
        status: u16,
        message: String,
        code: i64,
    },

    /// Non-200 response whose body is not a Postmark error object
    #[error("Unexpected response (status {status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("RequestTimeout")]
    RequestTimeout,

    #[error("RequestError: {0}")]
    Request(String),

    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("JsonParseError: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("invalid endpoint: {}", err))
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::RequestTimeout
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl Error {
    /// Provider error code, if this error came back from the API
    pub fn provider_code(&self) -> Option<i64> {
        match *self {
            Error::Provider { code, .. } => Some(code),
            _ => None,
        }
    }
}

//! Structured error types for the PaySystem client

use schedule_codec::CodecError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The view call returned nothing the codec can work on.
    #[error("Invalid response format: {0}")]
    InvalidResponseFormat(String),

    #[error("Failed to reach {endpoint}: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("API call to {endpoint} failed: {status} - {reason}")]
    ApiCallFailed {
        endpoint: String,
        status: u16,
        reason: String,
    },

    #[error("Gateway rejected {function}: {code} - {message}")]
    Gateway {
        function: String,
        code: String,
        message: String,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Please fill in all required fields.")]
    MissingRequiredFields { missing: Vec<&'static str> },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Failed to load config from {path}: {reason}")]
    Config { path: String, reason: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

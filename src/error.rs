use thiserror::Error;

use crate::client::ClientError;

pub type Result<T, E = DataApiError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DataApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Argument error: {0}")]
    ArgumentError(String),

    #[error("Type error: parameter '{name}' has unsupported kind {kind}")]
    TypeError { name: String, kind: &'static str },

    #[error("State error: {0}")]
    StateError(String),

    #[error("Remote error during {operation}: {source}")]
    RemoteError {
        operation: &'static str,
        #[source]
        source: ClientError,
    },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Unsupported: {0}")]
    UnsupportedError(String),

    #[error("Not ready: {0}")]
    NotReadyError(String),

    #[error("Closed: {0}")]
    ClosedError(String),

    #[error("Cancelled: {operation} did not complete ({reason})")]
    Cancelled {
        operation: &'static str,
        reason: &'static str,
    },
}

impl DataApiError {
    pub(crate) fn remote(operation: &'static str, source: ClientError) -> Self {
        DataApiError::RemoteError { operation, source }
    }
}

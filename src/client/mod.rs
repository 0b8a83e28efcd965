// Remote client module - the boundary to the Data API engine
//
// - models: serde request/response payloads matching the Data API JSON protocol
// - http: reqwest-backed client (feature "http")
//
// Connections only ever talk to `dyn DataApiClient`, so tests and alternative
// transports plug in by implementing the trait.

#[cfg(feature = "http")]
pub mod http;
pub mod models;

use async_trait::async_trait;
use thiserror::Error;

pub use models::{
    BatchExecuteStatementRequest, BatchExecuteStatementResponse, BeginTransactionRequest,
    BeginTransactionResponse, ColumnMetadata, CommitTransactionRequest,
    CommitTransactionResponse, ExecuteStatementRequest, ExecuteStatementResponse, Field,
    RollbackTransactionRequest, RollbackTransactionResponse, SqlParameter, UpdateResult,
};

#[cfg(feature = "http")]
pub use http::{HttpDataApiClient, HttpDataApiClientBuilder};

/// Failure reported by a `DataApiClient` implementation.
#[derive(Debug, Error)]
pub enum ClientError {
    #[cfg(feature = "http")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("service returned status {status}: {message}")]
    Service {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("failed to decode response body: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// The five Data API operations this crate consumes.
///
/// Every request carries the database, resource and secret identifiers explicitly;
/// the engine keeps no session between calls.
#[async_trait]
pub trait DataApiClient: Send + Sync {
    async fn execute_statement(
        &self,
        request: ExecuteStatementRequest,
    ) -> Result<ExecuteStatementResponse, ClientError>;

    async fn batch_execute_statement(
        &self,
        request: BatchExecuteStatementRequest,
    ) -> Result<BatchExecuteStatementResponse, ClientError>;

    async fn begin_transaction(
        &self,
        request: BeginTransactionRequest,
    ) -> Result<BeginTransactionResponse, ClientError>;

    async fn commit_transaction(
        &self,
        request: CommitTransactionRequest,
    ) -> Result<CommitTransactionResponse, ClientError>;

    async fn rollback_transaction(
        &self,
        request: RollbackTransactionRequest,
    ) -> Result<RollbackTransactionResponse, ClientError>;
}

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{
    BatchExecuteStatementRequest, BatchExecuteStatementResponse, BeginTransactionRequest,
    BeginTransactionResponse, CommitTransactionRequest, CommitTransactionResponse,
    ExecuteStatementRequest, ExecuteStatementResponse, RollbackTransactionRequest,
    RollbackTransactionResponse, ServiceErrorBody,
};
use super::{ClientError, DataApiClient};

/// Data API client speaking the service's REST/JSON protocol over `reqwest`.
///
/// Requests are sent unsigned. Point the endpoint at a signing proxy or a local
/// Data API emulator; credential handling is not part of this client.
#[derive(Debug, Clone)]
pub struct HttpDataApiClient {
    endpoint: String,
    http_client: reqwest::Client,
}

/// Fluent builder for [`HttpDataApiClient`].
#[derive(Debug, Clone)]
pub struct HttpDataApiClientBuilder {
    endpoint: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl HttpDataApiClientBuilder {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Returns `ClientError::Http` if the underlying `reqwest` client cannot be created.
    pub fn build(self) -> Result<HttpDataApiClient, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(HttpDataApiClient {
            endpoint: self.endpoint.trim_end_matches('/').to_string(),
            http_client: builder.build()?,
        })
    }
}

impl HttpDataApiClient {
    #[must_use]
    pub fn builder(endpoint: impl Into<String>) -> HttpDataApiClientBuilder {
        HttpDataApiClientBuilder {
            endpoint: endpoint.into(),
            timeout: None,
            connect_timeout: None,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, ClientError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{path}", self.endpoint);
        debug!(url = %url, "data api request");

        let response = self.http_client.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        let parsed: ServiceErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let message = parsed.message.unwrap_or(body);
        warn!(status = status.as_u16(), code = ?parsed.code, %message, "data api service error");
        Err(ClientError::Service {
            status: status.as_u16(),
            code: parsed.code,
            message,
        })
    }
}

#[async_trait]
impl DataApiClient for HttpDataApiClient {
    async fn execute_statement(
        &self,
        request: ExecuteStatementRequest,
    ) -> Result<ExecuteStatementResponse, ClientError> {
        self.post("Execute", &request).await
    }

    async fn batch_execute_statement(
        &self,
        request: BatchExecuteStatementRequest,
    ) -> Result<BatchExecuteStatementResponse, ClientError> {
        self.post("BatchExecute", &request).await
    }

    async fn begin_transaction(
        &self,
        request: BeginTransactionRequest,
    ) -> Result<BeginTransactionResponse, ClientError> {
        self.post("BeginTransaction", &request).await
    }

    async fn commit_transaction(
        &self,
        request: CommitTransactionRequest,
    ) -> Result<CommitTransactionResponse, ClientError> {
        self.post("CommitTransaction", &request).await
    }

    async fn rollback_transaction(
        &self,
        request: RollbackTransactionRequest,
    ) -> Result<RollbackTransactionResponse, ClientError> {
        self.post("RollbackTransaction", &request).await
    }
}

use std::sync::Arc;

use tracing::{debug, warn};

use crate::call_options::{CallOptions, round_trip};
use crate::client::{
    BatchExecuteStatementRequest, BeginTransactionRequest, ClientError, CommitTransactionRequest,
    DataApiClient, ExecuteStatementRequest, RollbackTransactionRequest, SqlParameter,
    UpdateResult,
};
use crate::config::DataApiOptions;
use crate::error::{DataApiError, Result};
use crate::params::Params;
use crate::prepared::PreparedStatement;
use crate::results::{ExecutionOutcome, Rows};
use crate::tx_outcome::TxOutcome;
use crate::types::{EngineFamily, Param};

enum ConnectionState {
    Idle {
        client: Arc<dyn DataApiClient>,
    },
    InTransaction {
        client: Arc<dyn DataApiClient>,
        transaction_id: String,
    },
    Closed,
}

/// A logical connection to one database behind the Data API.
///
/// There is no socket behind it: every operation is an independent request carrying
/// the configured identifiers, and an open transaction is nothing more than the
/// handle the engine issued on begin. A connection is driven by one caller at a time.
///
/// The engine expires idle transactions on its own schedule. A held handle can become
/// invalid without this connection noticing; the next call then fails with the
/// engine's error.
pub struct DataApiConnection {
    options: DataApiOptions,
    state: ConnectionState,
}

impl std::fmt::Debug for DataApiConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            ConnectionState::Idle { .. } => "Idle",
            ConnectionState::InTransaction { .. } => "InTransaction",
            ConnectionState::Closed => "Closed",
        };
        f.debug_struct("DataApiConnection")
            .field("database", &self.options.database)
            .field("resource_arn", &self.options.resource_arn)
            .field("client", &"<DataApiClient>")
            .field("state", &state)
            .finish()
    }
}

impl DataApiConnection {
    /// Open a connection. No remote call is made.
    ///
    /// # Errors
    /// Returns `ConfigError` if the database, resource or secret identifier is empty.
    pub fn open(options: DataApiOptions, client: Arc<dyn DataApiClient>) -> Result<Self> {
        options.validate()?;
        debug!(
            database = %options.database,
            resource_arn = %options.resource_arn,
            "opened data api connection"
        );
        Ok(Self {
            options,
            state: ConnectionState::Idle { client },
        })
    }

    #[must_use]
    pub fn options(&self) -> &DataApiOptions {
        &self.options
    }

    #[must_use]
    pub fn engine(&self) -> EngineFamily {
        self.options.engine
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        matches!(self.state, ConnectionState::InTransaction { .. })
    }

    /// Handle of the open transaction, if any.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        match &self.state {
            ConnectionState::InTransaction { transaction_id, .. } => Some(transaction_id),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.state, ConnectionState::Closed)
    }

    /// Begin a transaction.
    ///
    /// # Errors
    /// Returns `StateError` if a transaction is already open, `ClosedError` after close,
    /// and `RemoteError`/`Cancelled` if the round trip fails. The connection stays idle
    /// on any failure.
    pub async fn begin(&mut self) -> Result<()> {
        self.begin_with_options(&CallOptions::default()).await
    }

    /// Begin a transaction with per-call options.
    ///
    /// # Errors
    /// See [`begin`](DataApiConnection::begin).
    pub async fn begin_with_options(&mut self, opts: &CallOptions) -> Result<()> {
        let client = match &self.state {
            ConnectionState::Idle { client } => client.clone(),
            ConnectionState::InTransaction { transaction_id, .. } => {
                return Err(DataApiError::StateError(format!(
                    "a transaction is already open ({transaction_id})"
                )));
            }
            ConnectionState::Closed => return Err(closed()),
        };

        let request = BeginTransactionRequest {
            resource_arn: self.options.resource_arn.clone(),
            secret_arn: self.options.secret_arn.clone(),
            database: self.options.database.clone(),
            schema: self.options.schema.clone(),
        };

        debug!(database = %self.options.database, "begin transaction");
        let response = round_trip(
            "BeginTransaction",
            opts,
            self.options.timeout,
            client.begin_transaction(request),
        )
        .await?;

        let transaction_id = response
            .transaction_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                DataApiError::remote(
                    "BeginTransaction",
                    ClientError::Decode("response carried no transactionId".to_string()),
                )
            })?;

        debug!(%transaction_id, "transaction started");
        self.state = ConnectionState::InTransaction {
            client,
            transaction_id,
        };
        Ok(())
    }

    /// Commit the open transaction.
    ///
    /// # Errors
    /// Returns `StateError` if no transaction is open. On `RemoteError`/`Cancelled` the
    /// handle is kept so the caller can retry or roll back.
    pub async fn commit(&mut self) -> Result<TxOutcome> {
        self.commit_with_options(&CallOptions::default()).await
    }

    /// Commit with per-call options.
    ///
    /// # Errors
    /// See [`commit`](DataApiConnection::commit).
    pub async fn commit_with_options(&mut self, opts: &CallOptions) -> Result<TxOutcome> {
        let (client, transaction_id) = self.open_transaction("commit")?;

        let request = CommitTransactionRequest {
            resource_arn: self.options.resource_arn.clone(),
            secret_arn: self.options.secret_arn.clone(),
            transaction_id: transaction_id.clone(),
        };

        debug!(database = %self.options.database, %transaction_id, "commit transaction");
        let response = round_trip(
            "CommitTransaction",
            opts,
            self.options.timeout,
            client.commit_transaction(request),
        )
        .await?;

        debug!(%transaction_id, status = ?response.transaction_status, "transaction committed");
        self.state = ConnectionState::Idle { client };
        Ok(TxOutcome::new(transaction_id, response.transaction_status))
    }

    /// Roll back the open transaction.
    ///
    /// # Errors
    /// Returns `StateError` if no transaction is open. On `RemoteError`/`Cancelled` the
    /// handle is kept.
    pub async fn rollback(&mut self) -> Result<TxOutcome> {
        self.rollback_with_options(&CallOptions::default()).await
    }

    /// Roll back with per-call options.
    ///
    /// # Errors
    /// See [`rollback`](DataApiConnection::rollback).
    pub async fn rollback_with_options(&mut self, opts: &CallOptions) -> Result<TxOutcome> {
        let (client, transaction_id) = self.open_transaction("rollback")?;

        let request = RollbackTransactionRequest {
            resource_arn: self.options.resource_arn.clone(),
            secret_arn: self.options.secret_arn.clone(),
            transaction_id: transaction_id.clone(),
        };

        debug!(database = %self.options.database, %transaction_id, "rollback transaction");
        let response = round_trip(
            "RollbackTransaction",
            opts,
            self.options.timeout,
            client.rollback_transaction(request),
        )
        .await?;

        debug!(%transaction_id, status = ?response.transaction_status, "transaction rolled back");
        self.state = ConnectionState::Idle { client };
        Ok(TxOutcome::new(transaction_id, response.transaction_status))
    }

    /// Execute a statement, inside the open transaction if there is one.
    ///
    /// # Errors
    /// Returns `ClosedError` after close, `ArgumentError`/`TypeError` from parameter
    /// encoding, and `RemoteError`/`Cancelled` if the round trip fails.
    pub async fn execute(&self, sql: &str, params: &[Param]) -> Result<ExecutionOutcome> {
        self.execute_with_options(sql, params, &CallOptions::default())
            .await
    }

    /// Execute with per-call options.
    ///
    /// # Errors
    /// See [`execute`](DataApiConnection::execute).
    pub async fn execute_with_options(
        &self,
        sql: &str,
        params: &[Param],
        opts: &CallOptions,
    ) -> Result<ExecutionOutcome> {
        let (client, transaction_id) = self.session()?;
        let parameters = Params::convert(params)?.into_vec();

        debug!(
            database = %self.options.database,
            in_transaction = transaction_id.is_some(),
            params = parameters.len(),
            "execute statement"
        );

        let request = ExecuteStatementRequest {
            resource_arn: self.options.resource_arn.clone(),
            secret_arn: self.options.secret_arn.clone(),
            database: self.options.database.clone(),
            schema: self.options.schema.clone(),
            sql: sql.to_string(),
            parameters,
            transaction_id: transaction_id.map(str::to_owned),
            include_result_metadata: true,
        };

        let response = round_trip(
            "ExecuteStatement",
            opts,
            self.options.timeout,
            client.execute_statement(request),
        )
        .await?;

        Ok(ExecutionOutcome::from_response(response, self.options.engine))
    }

    /// Execute a statement and iterate its rows.
    ///
    /// # Errors
    /// See [`execute`](DataApiConnection::execute).
    pub async fn query(&self, sql: &str, params: &[Param]) -> Result<Rows> {
        self.query_with_options(sql, params, &CallOptions::default())
            .await
    }

    /// Query with per-call options.
    ///
    /// # Errors
    /// See [`execute`](DataApiConnection::execute).
    pub async fn query_with_options(
        &self,
        sql: &str,
        params: &[Param],
        opts: &CallOptions,
    ) -> Result<Rows> {
        Ok(self
            .execute_with_options(sql, params, opts)
            .await?
            .into_rows())
    }

    /// Prepare a statement whose executions are buffered and sent as one batch on close.
    ///
    /// # Errors
    /// Returns `ClosedError` if the connection was closed.
    pub fn prepare<'c>(&'c self, sql: &str) -> Result<PreparedStatement<'c>> {
        if self.is_closed() {
            return Err(closed());
        }
        Ok(PreparedStatement::new(self, sql))
    }

    /// Release the client. A pending transaction is abandoned, not rolled back; the
    /// engine expires it. Closing twice is a no-op.
    pub fn close(&mut self) {
        if let ConnectionState::InTransaction { transaction_id, .. } = &self.state {
            warn!(%transaction_id, "closing connection with an open transaction; it is abandoned");
        }
        self.state = ConnectionState::Closed;
    }

    pub(crate) async fn batch_execute(
        &self,
        sql: &str,
        parameter_sets: Vec<Vec<SqlParameter>>,
        opts: &CallOptions,
    ) -> Result<Vec<UpdateResult>> {
        let (client, transaction_id) = self.session()?;
        let expected = parameter_sets.len();

        debug!(
            database = %self.options.database,
            in_transaction = transaction_id.is_some(),
            parameter_sets = expected,
            "batch execute statement"
        );

        let request = BatchExecuteStatementRequest {
            resource_arn: self.options.resource_arn.clone(),
            secret_arn: self.options.secret_arn.clone(),
            database: self.options.database.clone(),
            schema: self.options.schema.clone(),
            sql: sql.to_string(),
            parameter_sets,
            transaction_id: transaction_id.map(str::to_owned),
        };

        let response = round_trip(
            "BatchExecuteStatement",
            opts,
            self.options.timeout,
            client.batch_execute_statement(request),
        )
        .await?;

        Ok(response.update_results)
    }

    fn session(&self) -> Result<(&Arc<dyn DataApiClient>, Option<&str>)> {
        match &self.state {
            ConnectionState::Idle { client } => Ok((client, None)),
            ConnectionState::InTransaction {
                client,
                transaction_id,
            } => Ok((client, Some(transaction_id.as_str()))),
            ConnectionState::Closed => Err(closed()),
        }
    }

    fn open_transaction(&self, action: &str) -> Result<(Arc<dyn DataApiClient>, String)> {
        match &self.state {
            ConnectionState::InTransaction {
                client,
                transaction_id,
            } => Ok((client.clone(), transaction_id.clone())),
            ConnectionState::Idle { .. } => Err(DataApiError::StateError(format!(
                "no open transaction to {action}"
            ))),
            ConnectionState::Closed => Err(closed()),
        }
    }
}

fn closed() -> DataApiError {
    DataApiError::ClosedError("connection already closed".to_string())
}

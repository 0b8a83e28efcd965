use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::call_options::CallOptions;
use crate::client::{ClientError, SqlParameter, UpdateResult};
use crate::connection::DataApiConnection;
use crate::error::{DataApiError, Result};
use crate::params::Params;
use crate::results::{Rows, decode_field, outcome};
use crate::types::{EngineFamily, Param, RowValues};

enum StatementState {
    Buffering { sets: Vec<Vec<SqlParameter>> },
    Closed,
}

/// Prepared statement emulated on top of the batch endpoint.
///
/// The Data API has no bind/execute cycle, so [`exec`](PreparedStatement::exec) only
/// queues an encoded parameter set and hands back a [`DeferredResult`]. Nothing is sent
/// until [`close`](PreparedStatement::close), which issues a single batch call with every
/// queued set, scoped to the connection's transaction at that moment. Dropping a
/// statement without closing it discards the queue.
pub struct PreparedStatement<'c> {
    conn: &'c DataApiConnection,
    sql: String,
    state: StatementState,
    results: Arc<OnceLock<Vec<UpdateResult>>>,
}

impl std::fmt::Debug for PreparedStatement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedStatement")
            .field("sql", &self.sql)
            .field("queued", &self.queued())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<'c> PreparedStatement<'c> {
    pub(crate) fn new(conn: &'c DataApiConnection, sql: &str) -> Self {
        Self {
            conn,
            sql: sql.to_owned(),
            state: StatementState::Buffering { sets: Vec::new() },
            results: Arc::new(OnceLock::new()),
        }
    }

    /// Access the SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of parameter sets waiting for the batch.
    #[must_use]
    pub fn queued(&self) -> usize {
        match &self.state {
            StatementState::Buffering { sets } => sets.len(),
            StatementState::Closed => 0,
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.state, StatementState::Closed)
    }

    /// Queue one execution. No remote work is done.
    ///
    /// # Errors
    /// Returns `ClosedError` after close and `ArgumentError`/`TypeError` from parameter
    /// encoding; a rejected set is not queued.
    pub fn exec(&mut self, params: &[Param]) -> Result<DeferredResult> {
        let StatementState::Buffering { sets } = &mut self.state else {
            return Err(closed());
        };

        let encoded = Params::convert(params)?.into_vec();
        sets.push(encoded);

        Ok(DeferredResult {
            batch: self.results.clone(),
            position: sets.len() - 1,
            engine: self.conn.engine(),
        })
    }

    /// Queries cannot be buffered: batch responses carry update metadata, never rows.
    ///
    /// # Errors
    /// Always fails: `ClosedError` after close, `UnsupportedError` otherwise.
    pub fn query(&self, _params: &[Param]) -> Result<Rows> {
        if self.is_closed() {
            return Err(closed());
        }
        Err(DataApiError::UnsupportedError(
            "prepared statements cannot return rows; use DataApiConnection::query".to_string(),
        ))
    }

    /// Send every queued set as one batch and resolve the deferred results.
    ///
    /// # Errors
    /// Returns `ClosedError` on a second close, and `RemoteError`/`Cancelled` if the batch
    /// fails, in which case the queue is kept and close can be retried. A response with
    /// the wrong number of update results still closes the statement: the positions that
    /// came back resolve, the rest report `RemoteError`.
    pub async fn close(&mut self) -> Result<()> {
        self.close_with_options(&CallOptions::default()).await
    }

    /// Close with per-call options.
    ///
    /// # Errors
    /// See [`close`](PreparedStatement::close).
    pub async fn close_with_options(&mut self, opts: &CallOptions) -> Result<()> {
        let StatementState::Buffering { sets } = &self.state else {
            return Err(closed());
        };

        let expected = sets.len();
        let updates = if sets.is_empty() {
            debug!(sql = %self.sql, "closing prepared statement with nothing queued");
            Vec::new()
        } else {
            self.conn
                .batch_execute(&self.sql, sets.clone(), opts)
                .await?
        };

        // Any response means the batch ran; the queue is never resent
        let received = updates.len();
        self.state = StatementState::Closed;
        self.results.set(updates).map_err(|_| {
            DataApiError::StateError("batch results were already recorded".to_string())
        })?;

        if received != expected {
            warn!(
                sql = %self.sql,
                expected,
                received,
                "batch returned the wrong number of update results"
            );
            return Err(DataApiError::remote(
                "BatchExecuteStatement",
                ClientError::Decode(format!(
                    "expected {expected} update results, got {received}"
                )),
            ));
        }
        Ok(())
    }
}

impl Drop for PreparedStatement<'_> {
    fn drop(&mut self) {
        if let StatementState::Buffering { sets } = &self.state {
            if !sets.is_empty() {
                warn!(
                    sql = %self.sql,
                    queued = sets.len(),
                    "prepared statement dropped without close; queued executions discarded"
                );
            }
        }
    }
}

/// Result of one buffered execution, readable once its statement has been closed.
#[derive(Debug, Clone)]
pub struct DeferredResult {
    batch: Arc<OnceLock<Vec<UpdateResult>>>,
    position: usize,
    engine: EngineFamily,
}

impl DeferredResult {
    /// Position of this execution in the batch.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.batch.get().is_some()
    }

    /// The single integer key generated by this execution.
    ///
    /// # Errors
    /// Returns `NotReadyError` before the statement is closed, and `UnsupportedError`
    /// unless exactly one integer generated field was reported.
    pub fn last_insert_id(&self) -> Result<i64> {
        let update = self.update()?;
        outcome::last_insert_id(&update.generated_fields, self.engine)
    }

    /// Decoded generated fields for this execution.
    ///
    /// # Errors
    /// Returns `NotReadyError` before close and `DecodeError` for an undefined field.
    pub fn generated_fields(&self) -> Result<Vec<RowValues>> {
        self.update()?
            .generated_fields
            .iter()
            .map(decode_field)
            .collect()
    }

    /// Update count for this execution, when the batch response reports one.
    ///
    /// # Errors
    /// Returns `NotReadyError` before close and `UnsupportedError` if the engine sent no
    /// per-set count.
    pub fn rows_affected(&self) -> Result<i64> {
        self.update()?.number_of_records_updated.ok_or_else(|| {
            DataApiError::UnsupportedError(
                "batch response carries no update count for this parameter set".to_string(),
            )
        })
    }

    fn update(&self) -> Result<&UpdateResult> {
        let updates = self.batch.get().ok_or_else(|| {
            DataApiError::NotReadyError(
                "result is available only after the prepared statement is closed".to_string(),
            )
        })?;
        updates.get(self.position).ok_or_else(|| {
            DataApiError::remote(
                "BatchExecuteStatement",
                ClientError::Decode(format!(
                    "batch returned no result for position {}",
                    self.position
                )),
            )
        })
    }
}

fn closed() -> DataApiError {
    DataApiError::ClosedError("prepared statement already closed".to_string())
}

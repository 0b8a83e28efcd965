#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rds_data_middleware::client::{
    BatchExecuteStatementRequest, BatchExecuteStatementResponse, BeginTransactionRequest,
    BeginTransactionResponse, ClientError, ColumnMetadata, CommitTransactionRequest,
    CommitTransactionResponse, DataApiClient, ExecuteStatementRequest, ExecuteStatementResponse,
    Field, RollbackTransactionRequest, RollbackTransactionResponse, SqlParameter, UpdateResult,
};
use rds_data_middleware::prelude::*;

pub const DATABASE: &str = "mysql";
pub const RESOURCE_ARN: &str = "arn:aws:rds:eu-west-1:123456789012:cluster:test";
pub const SECRET_ARN: &str = "arn:aws:secretsmanager:eu-west-1:123456789012:secret:test";

pub fn options() -> DataApiOptions {
    DataApiOptions::new(DATABASE.into(), RESOURCE_ARN.into(), SECRET_ARN.into())
}

pub fn connection(fake: &Arc<FakeDataApi>) -> DataApiConnection {
    DataApiConnection::open(options(), fake.clone()).expect("valid options")
}

/// A request as seen by the fake engine.
#[derive(Debug, Clone)]
pub enum Recorded {
    Execute(ExecuteStatementRequest),
    Batch(BatchExecuteStatementRequest),
    Begin(BeginTransactionRequest),
    Commit(CommitTransactionRequest),
    Rollback(RollbackTransactionRequest),
}

#[derive(Debug, Clone)]
struct StoredRow {
    id: i64,
    name: Option<String>,
}

#[derive(Debug, Default)]
struct EngineState {
    committed: Vec<StoredRow>,
    pending: HashMap<String, Vec<StoredRow>>,
    next_row_id: i64,
    next_tx: u32,
    fail_next: Vec<&'static str>,
    forced_execute: Option<ExecuteStatementResponse>,
    truncate_next_batch: Option<usize>,
    requests: Vec<Recorded>,
}

/// In-memory stand-in for the Data API with one auto-increment table `bar.foo (id, name)`.
///
/// Inserts inside a transaction are visible only to calls carrying that transaction id
/// until commit.
#[derive(Debug, Default)]
pub struct FakeDataApi {
    state: Mutex<EngineState>,
    delay: Mutex<Option<Duration>>,
}

impl FakeDataApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next call of `operation` fail with a service error.
    pub fn fail_next(&self, operation: &'static str) {
        self.state.lock().unwrap().fail_next.push(operation);
    }

    /// Return `response` for the next ExecuteStatement call instead of running the SQL.
    pub fn force_execute_response(&self, response: ExecuteStatementResponse) {
        self.state.lock().unwrap().forced_execute = Some(response);
    }

    /// Run the next batch fully but report only the first `keep` update results.
    pub fn truncate_next_batch(&self, keep: usize) {
        self.state.lock().unwrap().truncate_next_batch = Some(keep);
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn committed_rows(&self) -> usize {
        self.state.lock().unwrap().committed.len()
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn check_failure(state: &mut EngineState, operation: &'static str) -> Result<(), ClientError> {
        if let Some(idx) = state.fail_next.iter().position(|op| *op == operation) {
            state.fail_next.remove(idx);
            return Err(ClientError::Service {
                status: 500,
                code: Some("InternalServerErrorException".into()),
                message: format!("injected {operation} failure"),
            });
        }
        Ok(())
    }

    fn check_identifiers(
        database: Option<&str>,
        resource_arn: &str,
        secret_arn: &str,
    ) -> Result<(), ClientError> {
        if database.is_some_and(str::is_empty) || resource_arn.is_empty() || secret_arn.is_empty()
        {
            return Err(bad_request("missing identifiers"));
        }
        Ok(())
    }

    fn run(
        state: &mut EngineState,
        sql: &str,
        params: &[SqlParameter],
        transaction_id: Option<&str>,
    ) -> Result<(Vec<Vec<Field>>, i64, Vec<Field>), ClientError> {
        if let Some(tx) = transaction_id {
            if !state.pending.contains_key(tx) {
                return Err(bad_request(&format!("Transaction {tx} is not found")));
            }
        }

        let upper = sql.trim_start().to_ascii_uppercase();
        if upper.starts_with("INSERT INTO BAR.FOO") {
            state.next_row_id += 1;
            let row = StoredRow {
                id: state.next_row_id,
                name: params
                    .iter()
                    .find(|p| p.name == "name")
                    .and_then(|p| p.value.string_value.clone()),
            };
            let id = row.id;
            match transaction_id {
                Some(tx) => state.pending.entry(tx.to_string()).or_default().push(row),
                None => state.committed.push(row),
            }
            Ok((vec![], 1, vec![Field::long(id)]))
        } else if upper.starts_with("SELECT") {
            let mut visible = state.committed.clone();
            if let Some(tx) = transaction_id {
                visible.extend(state.pending[tx].iter().cloned());
            }
            let records = visible
                .into_iter()
                .map(|row| {
                    vec![
                        Field::long(row.id),
                        row.name.map_or_else(Field::null, Field::string),
                    ]
                })
                .collect();
            Ok((records, 0, vec![]))
        } else if upper.starts_with("DROP") {
            state.committed.clear();
            Ok((vec![], 0, vec![]))
        } else if upper.starts_with("CREATE") {
            Ok((vec![], 0, vec![]))
        } else {
            Err(bad_request(&format!("unsupported statement: {sql}")))
        }
    }
}

fn bad_request(message: &str) -> ClientError {
    ClientError::Service {
        status: 400,
        code: Some("BadRequestException".into()),
        message: message.to_string(),
    }
}

#[async_trait]
impl DataApiClient for FakeDataApi {
    async fn execute_statement(
        &self,
        request: ExecuteStatementRequest,
    ) -> Result<ExecuteStatementResponse, ClientError> {
        self.pause().await;
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded::Execute(request.clone()));
        Self::check_failure(&mut state, "ExecuteStatement")?;
        Self::check_identifiers(
            Some(&request.database),
            &request.resource_arn,
            &request.secret_arn,
        )?;

        if let Some(forced) = state.forced_execute.take() {
            return Ok(forced);
        }

        let (records, updated, generated) = Self::run(
            &mut state,
            &request.sql,
            &request.parameters,
            request.transaction_id.as_deref(),
        )?;
        let column_metadata = if request.sql.trim_start().to_ascii_uppercase().starts_with("SELECT")
        {
            ["id", "name"]
                .into_iter()
                .map(|name| ColumnMetadata {
                    name: Some(name.into()),
                    ..ColumnMetadata::default()
                })
                .collect()
        } else {
            vec![]
        };

        Ok(ExecuteStatementResponse {
            column_metadata,
            records,
            number_of_records_updated: updated,
            generated_fields: generated,
        })
    }

    async fn batch_execute_statement(
        &self,
        request: BatchExecuteStatementRequest,
    ) -> Result<BatchExecuteStatementResponse, ClientError> {
        self.pause().await;
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded::Batch(request.clone()));
        Self::check_failure(&mut state, "BatchExecuteStatement")?;
        Self::check_identifiers(
            Some(&request.database),
            &request.resource_arn,
            &request.secret_arn,
        )?;

        let mut update_results = Vec::with_capacity(request.parameter_sets.len());
        for set in &request.parameter_sets {
            let (_, _, generated) = Self::run(
                &mut state,
                &request.sql,
                set,
                request.transaction_id.as_deref(),
            )?;
            update_results.push(UpdateResult {
                generated_fields: generated,
                number_of_records_updated: None,
            });
        }
        if let Some(keep) = state.truncate_next_batch.take() {
            update_results.truncate(keep);
        }
        Ok(BatchExecuteStatementResponse { update_results })
    }

    async fn begin_transaction(
        &self,
        request: BeginTransactionRequest,
    ) -> Result<BeginTransactionResponse, ClientError> {
        self.pause().await;
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded::Begin(request.clone()));
        Self::check_failure(&mut state, "BeginTransaction")?;
        Self::check_identifiers(
            Some(&request.database),
            &request.resource_arn,
            &request.secret_arn,
        )?;

        state.next_tx += 1;
        let id = format!("tx-{}", state.next_tx);
        state.pending.insert(id.clone(), Vec::new());
        Ok(BeginTransactionResponse {
            transaction_id: Some(id),
        })
    }

    async fn commit_transaction(
        &self,
        request: CommitTransactionRequest,
    ) -> Result<CommitTransactionResponse, ClientError> {
        self.pause().await;
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded::Commit(request.clone()));
        Self::check_failure(&mut state, "CommitTransaction")?;
        Self::check_identifiers(None, &request.resource_arn, &request.secret_arn)?;

        let rows = state
            .pending
            .remove(&request.transaction_id)
            .ok_or_else(|| bad_request("Transaction is not found"))?;
        state.committed.extend(rows);
        Ok(CommitTransactionResponse {
            transaction_status: Some("Transaction Committed".into()),
        })
    }

    async fn rollback_transaction(
        &self,
        request: RollbackTransactionRequest,
    ) -> Result<RollbackTransactionResponse, ClientError> {
        self.pause().await;
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded::Rollback(request.clone()));
        Self::check_failure(&mut state, "RollbackTransaction")?;
        Self::check_identifiers(None, &request.resource_arn, &request.secret_arn)?;

        state
            .pending
            .remove(&request.transaction_id)
            .ok_or_else(|| bad_request("Transaction is not found"))?;
        Ok(RollbackTransactionResponse {
            transaction_status: Some("Rollback Complete".into()),
        })
    }
}

/// Count the rows a non-transactional read of `bar.foo` sees.
pub async fn count_rows(conn: &DataApiConnection) -> Result<usize> {
    let mut rows = conn.query("SELECT * FROM bar.foo LIMIT 1", &[]).await?;
    let mut n = 0;
    while rows.next_row()?.is_some() {
        n += 1;
    }
    Ok(n)
}

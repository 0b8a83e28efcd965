//! Async connection, transaction and prepared-statement semantics over the RDS Data API.
//!
//! The Data API executes each statement as an independent HTTP request and represents a
//! transaction by an opaque handle. [`DataApiConnection`] threads that handle through
//! subsequent calls, [`params`] encodes named bindings into the wire format,
//! [`results`] decodes the typed fields that come back, and [`PreparedStatement`]
//! buffers executions into a single batch call.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rds_data_middleware::prelude::*;
//!
//! # async fn demo() -> Result<()> {
//! let client = HttpDataApiClient::builder("http://localhost:8080")
//!     .build()
//!     .map_err(|e| DataApiError::ConfigError(e.to_string()))?;
//! let driver = DataApiDriver::new(Arc::new(client));
//! let mut conn = driver.open("Database=mysql&ResourceArn=arn%3Acluster&SecretArn=arn%3Asecret")?;
//!
//! conn.begin().await?;
//! conn.execute(
//!     "INSERT INTO users (name) VALUES (:name)",
//!     &[Param::named("name", RowValues::Text("alice".into()))],
//! )
//! .await?;
//! conn.commit().await?;
//!
//! let mut rows = conn.query("SELECT id, name FROM users", &[]).await?;
//! while let Some(row) = rows.next_row()? {
//!     println!("{:?}", row.get("name"));
//! }
//! # Ok(()) }
//! ```

pub mod call_options;
pub mod client;
pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
pub mod params;
pub mod prelude;
pub mod prepared;
pub mod results;
pub mod tx_outcome;
pub mod types;

pub use call_options::CallOptions;
pub use config::{DataApiOptions, DataApiOptionsBuilder};
pub use connection::DataApiConnection;
pub use driver::DataApiDriver;
pub use error::{DataApiError, Result};
pub use prepared::{DeferredResult, PreparedStatement};
pub use results::{CustomDbRow, ExecutionOutcome, ResultSet, Rows};
pub use tx_outcome::TxOutcome;
pub use types::{EngineFamily, Param, RowValues};

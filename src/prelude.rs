//! Convenient imports for common functionality.

pub use crate::call_options::CallOptions;
pub use crate::client::{ClientError, DataApiClient};
pub use crate::config::{DataApiOptions, DataApiOptionsBuilder};
pub use crate::connection::DataApiConnection;
pub use crate::driver::DataApiDriver;
pub use crate::error::{DataApiError, Result};
pub use crate::prepared::{DeferredResult, PreparedStatement};
pub use crate::results::{CustomDbRow, ExecutionOutcome, ResultSet, Rows};
pub use crate::tx_outcome::TxOutcome;
pub use crate::types::{EngineFamily, Param, RowValues};

#[cfg(feature = "http")]
pub use crate::client::HttpDataApiClient;

pub use tokio_util::sync::CancellationToken;

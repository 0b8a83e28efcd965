use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::client::ClientError;
use crate::error::{DataApiError, Result};

/// Per-call options for every operation that performs a round trip.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Overrides the connection's default timeout for this call.
    pub timeout: Option<Duration>,
    /// Cancels the in-flight round trip when triggered.
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn resolve_timeout(&self, default: Option<Duration>) -> Option<Duration> {
        self.timeout.or(default)
    }
}

/// Drive one remote call under the caller's cancellation token and timeout.
///
/// The future is dropped on cancel or timeout, so nothing from an aborted call can
/// reach connection state.
pub(crate) async fn round_trip<T, F>(
    operation: &'static str,
    opts: &CallOptions,
    default_timeout: Option<Duration>,
    call: F,
) -> Result<T>
where
    F: Future<Output = std::result::Result<T, ClientError>>,
{
    let timed = async {
        match opts.resolve_timeout(default_timeout) {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                warn!(operation, timeout = ?limit, "data api call timed out");
                DataApiError::Cancelled {
                    operation,
                    reason: "timed out",
                }
            }),
            None => Ok(call.await),
        }
    };

    let outcome = match &opts.cancel {
        Some(token) => {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    warn!(operation, "data api call cancelled");
                    Err(DataApiError::Cancelled { operation, reason: "cancelled by caller" })
                }
                res = timed => res,
            }
        }
        None => timed.await,
    }?;

    outcome.map_err(|e| DataApiError::remote(operation, e))
}

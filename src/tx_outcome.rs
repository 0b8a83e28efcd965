/// Outcome returned by committing or rolling back a transaction.
///
/// The connection returns to idle on any successful response; the status string is
/// the engine's own report (e.g. `"Transaction Committed"`) and is surfaced as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxOutcome {
    transaction_id: String,
    status: Option<String>,
}

impl TxOutcome {
    pub(crate) fn new(transaction_id: String, status: Option<String>) -> Self {
        Self {
            transaction_id,
            status,
        }
    }

    /// Handle of the transaction that was finished.
    #[must_use]
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// Engine-reported transaction status, if any.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

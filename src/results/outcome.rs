use std::sync::Arc;

use crate::client::{ExecuteStatementResponse, Field};
use crate::error::{DataApiError, Result};
use crate::types::{EngineFamily, RowValues};

use super::decode::decode_field;
use super::rows::Rows;

/// Everything the engine returned for one executed statement.
///
/// The whole result arrives in a single response; there is no cursor behind it.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    columns: Arc<Vec<String>>,
    records: Vec<Vec<Field>>,
    rows_affected: i64,
    generated_fields: Vec<Field>,
    engine: EngineFamily,
}

impl ExecutionOutcome {
    pub(crate) fn from_response(response: ExecuteStatementResponse, engine: EngineFamily) -> Self {
        // Unknown column names are reported as empty strings
        let columns = response
            .column_metadata
            .into_iter()
            .map(|col| col.name.or(col.label).unwrap_or_default())
            .collect();

        Self {
            columns: Arc::new(columns),
            records: response.records,
            rows_affected: response.number_of_records_updated,
            generated_fields: response.generated_fields,
            engine,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw, undecoded records.
    #[must_use]
    pub fn records(&self) -> &[Vec<Field>] {
        &self.records
    }

    /// The engine's update count. DDL statements report 0.
    #[must_use]
    pub fn rows_affected(&self) -> i64 {
        self.rows_affected
    }

    /// Decode the generated fields (auto-increment keys and similar).
    ///
    /// # Errors
    /// Returns `DecodeError` if a generated field has no populated slot.
    pub fn generated_fields(&self) -> Result<Vec<RowValues>> {
        self.generated_fields.iter().map(decode_field).collect()
    }

    /// The single integer key generated by the statement.
    ///
    /// # Errors
    /// Returns `UnsupportedError` on engines without generated-field support, or when
    /// the statement did not produce exactly one integer generated field.
    pub fn last_insert_id(&self) -> Result<i64> {
        last_insert_id(&self.generated_fields, self.engine)
    }

    /// Turn the outcome into a row iterator.
    #[must_use]
    pub fn into_rows(self) -> Rows {
        Rows::new(self.columns, self.records)
    }
}

pub(crate) fn last_insert_id(generated: &[Field], engine: EngineFamily) -> Result<i64> {
    if !engine.supports_generated_fields() {
        return Err(DataApiError::UnsupportedError(format!(
            "last_insert_id is not available on {engine:?}; use a RETURNING clause instead"
        )));
    }

    match generated {
        [field] => field.long_value.ok_or_else(|| {
            DataApiError::UnsupportedError(
                "last_insert_id requires the generated field to be an integer".to_string(),
            )
        }),
        _ => Err(DataApiError::UnsupportedError(format!(
            "last_insert_id requires exactly one generated field, got: {}",
            generated.len()
        ))),
    }
}

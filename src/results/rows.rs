use std::collections::HashMap;
use std::sync::Arc;

use crate::client::Field;
use crate::error::{DataApiError, Result};

use super::decode::decode_field;
use super::result_set::ResultSet;
use super::row::{CustomDbRow, build_column_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowsState {
    Open { position: usize },
    Closed,
}

/// Iterator over the materialised records of one response.
#[derive(Debug, Clone)]
pub struct Rows {
    columns: Arc<Vec<String>>,
    column_index: Arc<HashMap<String, usize>>,
    records: Vec<Vec<Field>>,
    state: RowsState,
}

impl Rows {
    pub(crate) fn new(columns: Arc<Vec<String>>, records: Vec<Vec<Field>>) -> Self {
        let column_index = Arc::new(build_column_index(&columns));
        Self {
            columns,
            column_index,
            records,
            state: RowsState::Open { position: 0 },
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Total number of records in the response.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state == RowsState::Closed
    }

    /// Decode the next row.
    ///
    /// Returns `Ok(None)` once every row has been read, on every call after that too.
    /// The position advances before decoding, so a row that fails to decode is skipped
    /// by the following call.
    ///
    /// # Errors
    /// Returns `ClosedError` after [`close`](Rows::close) and `DecodeError` for a field
    /// with no populated value.
    pub fn next_row(&mut self) -> Result<Option<CustomDbRow>> {
        let position = match &mut self.state {
            RowsState::Closed => {
                return Err(DataApiError::ClosedError("rows already closed".to_string()));
            }
            RowsState::Open { position } => position,
        };

        let Some(record) = self.records.get(*position) else {
            return Ok(None);
        };
        let row_number = *position;
        *position += 1;

        let mut values = Vec::with_capacity(record.len());
        for (col, field) in record.iter().enumerate() {
            let value = decode_field(field).map_err(|e| {
                DataApiError::DecodeError(format!(
                    "failed to decode row {row_number}, column {col} ('{}'): {e}",
                    self.columns.get(col).map_or("", String::as_str)
                ))
            })?;
            values.push(value);
        }

        Ok(Some(CustomDbRow::with_index(
            self.columns.clone(),
            self.column_index.clone(),
            values,
        )))
    }

    /// Mark the iterator closed. Closing twice is a no-op.
    pub fn close(&mut self) {
        self.state = RowsState::Closed;
    }

    /// Decode all remaining rows into a [`ResultSet`].
    ///
    /// # Errors
    /// Propagates the first `DecodeError`, or `ClosedError` if already closed.
    pub fn into_result_set(mut self) -> Result<ResultSet> {
        let remaining = match self.state {
            RowsState::Open { position } => self.records.len().saturating_sub(position),
            RowsState::Closed => 0,
        };
        let mut result_set = ResultSet::with_capacity(remaining);
        result_set.set_column_names(self.columns.clone());

        while let Some(row) = self.next_row()? {
            result_set.add_row(row);
        }
        Ok(result_set)
    }
}

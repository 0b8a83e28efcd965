use crate::client::Field;
use crate::error::{DataApiError, Result};
use crate::types::RowValues;

/// Resolve which slot of a remote field is populated.
///
/// Slots are checked in a fixed order (blob, boolean, double, null, long, string) and
/// the first populated one wins. `isNull: false` does not count as populated.
///
/// # Errors
/// Returns `DecodeError` when no slot is populated, e.g. for array values.
pub fn decode_field(field: &Field) -> Result<RowValues> {
    if let Some(bytes) = &field.blob_value {
        return Ok(RowValues::Blob(bytes.clone()));
    }
    if let Some(b) = field.boolean_value {
        return Ok(RowValues::Bool(b));
    }
    if let Some(d) = field.double_value {
        return Ok(RowValues::Float(d));
    }
    if field.is_null == Some(true) {
        return Ok(RowValues::Null);
    }
    if let Some(i) = field.long_value {
        return Ok(RowValues::Int(i));
    }
    if let Some(s) = &field.string_value {
        return Ok(RowValues::Text(s.clone()));
    }

    Err(DataApiError::DecodeError("undefined field value".to_string()))
}

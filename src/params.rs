use crate::client::{Field, SqlParameter};
use crate::error::{DataApiError, Result};
use crate::types::{Param, RowValues};

/// Container for encoded Data API parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(pub Vec<SqlParameter>);

impl Params {
    /// Convert caller bindings into Data API parameter descriptors, preserving order.
    ///
    /// # Errors
    /// Returns `ArgumentError` for a binding without a name and `TypeError` for a value
    /// kind the wire format cannot carry.
    pub fn convert(params: &[Param]) -> Result<Params> {
        let mut encoded = Vec::with_capacity(params.len());

        for (position, param) in params.iter().enumerate() {
            let name = match param.name.as_deref() {
                Some(name) if !name.is_empty() => name,
                _ => {
                    return Err(DataApiError::ArgumentError(format!(
                        "parameter at position {position} has no name; only named parameters are supported"
                    )));
                }
            };

            encoded.push(SqlParameter {
                name: name.to_string(),
                value: encode_value(name, &param.value)?,
            });
        }

        Ok(Params(encoded))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[SqlParameter] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<SqlParameter> {
        self.0
    }
}

fn encode_value(name: &str, value: &RowValues) -> Result<Field> {
    let field = match value {
        RowValues::Text(s) => Field::string(s.clone()),
        RowValues::Blob(bytes) => Field::blob(bytes.clone()),
        RowValues::Bool(b) => Field::boolean(*b),
        RowValues::Float(f) => Field::double(*f),
        RowValues::Int(i) => Field::long(*i),
        RowValues::Null => Field::null(),
        RowValues::Timestamp(_) | RowValues::JSON(_) => {
            return Err(DataApiError::TypeError {
                name: name.to_string(),
                kind: value.kind(),
            });
        }
    };
    Ok(field)
}

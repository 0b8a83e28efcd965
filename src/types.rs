use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde_json::Value as JsonValue;

/// Values that can be bound as query parameters or read back from a result row.
///
/// Only `Int`, `Float`, `Text`, `Bool`, `Blob` and `Null` have a Data API wire form.
/// `Timestamp` and `JSON` are accepted by the type so callers can share one value enum
/// with other backends, but binding them is rejected by the encoder:
/// ```rust
/// use rds_data_middleware::prelude::*;
///
/// let params = vec![
///     Param::named("id", RowValues::Int(1)),
///     Param::named("name", RowValues::Text("alice".into())),
///     Param::named("active", RowValues::Bool(true)),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the value kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RowValues::Int(_) => "int",
            RowValues::Float(_) => "float",
            RowValues::Text(_) => "text",
            RowValues::Bool(_) => "bool",
            RowValues::Timestamp(_) => "timestamp",
            RowValues::Null => "null",
            RowValues::JSON(_) => "json",
            RowValues::Blob(_) => "blob",
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            // MySQL reports BOOLEAN columns as TINYINT
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

/// A single parameter binding.
///
/// The Data API substitutes parameters by name (`:name` in the SQL text), so every
/// binding sent to the engine must carry a non-empty name. Positional bindings can be
/// constructed but are rejected with `ArgumentError` when encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Option<String>,
    pub value: RowValues,
}

impl Param {
    #[must_use]
    pub fn named(name: impl Into<String>, value: RowValues) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }

    #[must_use]
    pub fn positional(value: RowValues) -> Self {
        Self { name: None, value }
    }
}

impl From<(&str, RowValues)> for Param {
    fn from((name, value): (&str, RowValues)) -> Self {
        Param::named(name, value)
    }
}

impl From<(String, RowValues)> for Param {
    fn from((name, value): (String, RowValues)) -> Self {
        Param::named(name, value)
    }
}

/// The Aurora engine family behind the Data API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum EngineFamily {
    /// Aurora MySQL; reports auto-increment keys as generated fields
    #[default]
    Mysql,
    /// Aurora `PostgreSQL`; never reports generated fields, use `RETURNING` instead
    Postgres,
}

impl EngineFamily {
    #[must_use]
    pub fn supports_generated_fields(self) -> bool {
        match self {
            EngineFamily::Mysql => true,
            EngineFamily::Postgres => false,
        }
    }
}

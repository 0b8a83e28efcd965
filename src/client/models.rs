//! Request and response payloads exchanged with the Data API.
//!
//! Field names follow the service's JSON protocol (camelCase). Unknown response
//! keys are ignored so newer service versions keep decoding.

use serde::{Deserialize, Serialize};

/// A typed value slot as sent to and received from the engine.
///
/// The engine populates exactly one slot; which one is resolved by the result decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "base64_bytes"
    )]
    pub blob_value: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_null: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
}

impl Field {
    #[must_use]
    pub fn blob(value: Vec<u8>) -> Self {
        Self {
            blob_value: Some(value),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self {
            boolean_value: Some(value),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn double(value: f64) -> Self {
        Self {
            double_value: Some(value),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn null() -> Self {
        Self {
            is_null: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn long(value: i64) -> Self {
        Self {
            long_value: Some(value),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string_value: Some(value.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlParameter {
    pub name: String,
    pub value: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub nullable: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteStatementRequest {
    pub resource_arn: String,
    pub secret_arn: String,
    pub database: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub sql: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<SqlParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Column metadata is required to name the columns of a row iterator.
    pub include_result_metadata: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteStatementResponse {
    #[serde(default)]
    pub column_metadata: Vec<ColumnMetadata>,
    #[serde(default)]
    pub records: Vec<Vec<Field>>,
    #[serde(default)]
    pub number_of_records_updated: i64,
    #[serde(default)]
    pub generated_fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchExecuteStatementRequest {
    pub resource_arn: String,
    pub secret_arn: String,
    pub database: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub sql: String,
    pub parameter_sets: Vec<Vec<SqlParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// Outcome of one parameter set within a batch.
///
/// The service reports generated fields per set; an update count is only present when
/// the endpoint supplies one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    #[serde(default)]
    pub generated_fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_records_updated: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchExecuteStatementResponse {
    #[serde(default)]
    pub update_results: Vec<UpdateResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginTransactionRequest {
    pub resource_arn: String,
    pub secret_arn: String,
    pub database: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginTransactionResponse {
    #[serde(default)]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitTransactionRequest {
    pub resource_arn: String,
    pub secret_arn: String,
    pub transaction_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitTransactionResponse {
    #[serde(default)]
    pub transaction_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackTransactionRequest {
    pub resource_arn: String,
    pub secret_arn: String,
    pub transaction_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackTransactionResponse {
    #[serde(default)]
    pub transaction_status: Option<String>,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ServiceErrorBody {
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
    #[serde(default, rename = "__type", alias = "code")]
    pub code: Option<String>,
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => s.serialize_some(&STANDARD.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(d)?;
        encoded
            .map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_serializes_only_the_populated_slot() {
        let json = serde_json::to_value(Field::long(7)).unwrap();
        assert_eq!(json, serde_json::json!({ "longValue": 7 }));
    }

    #[test]
    fn blob_values_travel_as_base64() {
        let json = serde_json::to_value(Field::blob(b"hi".to_vec())).unwrap();
        assert_eq!(json, serde_json::json!({ "blobValue": "aGk=" }));

        let back: Field = serde_json::from_value(json).unwrap();
        assert_eq!(back.blob_value.as_deref(), Some(&b"hi"[..]));
    }

    #[test]
    fn execute_response_tolerates_missing_and_unknown_keys() {
        let body = r#"{
            "numberOfRecordsUpdated": 1,
            "generatedFields": [{ "longValue": 42 }],
            "formattedRecords": null
        }"#;
        let resp: ExecuteStatementResponse = serde_json::from_str(body).unwrap();
        assert!(resp.records.is_empty());
        assert!(resp.column_metadata.is_empty());
        assert_eq!(resp.number_of_records_updated, 1);
        assert_eq!(resp.generated_fields, vec![Field::long(42)]);
    }

    #[test]
    fn request_omits_absent_transaction_id() {
        let req = BatchExecuteStatementRequest {
            resource_arn: "arn:cluster".into(),
            secret_arn: "arn:secret".into(),
            database: "mysql".into(),
            schema: None,
            sql: "INSERT INTO t VALUES (:v)".into(),
            parameter_sets: vec![vec![SqlParameter {
                name: "v".into(),
                value: Field::string("a"),
            }]],
            transaction_id: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("transactionId").is_none());
        assert_eq!(json["parameterSets"][0][0]["value"]["stringValue"], "a");
        assert_eq!(json["resourceArn"], "arn:cluster");
    }
}

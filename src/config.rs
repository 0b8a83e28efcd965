use std::time::Duration;

use clap::ValueEnum;

use crate::error::{DataApiError, Result};
use crate::types::EngineFamily;

/// Options for a Data API connection.
///
/// `database`, `resource_arn` and `secret_arn` are sent with every request and must be
/// non-empty; this is checked when the connection is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataApiOptions {
    pub database: String,
    pub resource_arn: String,
    pub secret_arn: String,
    pub schema: Option<String>,
    pub engine: EngineFamily,
    /// Default per-call timeout; `None` waits for the engine.
    pub timeout: Option<Duration>,
}

impl DataApiOptions {
    #[must_use]
    pub fn new(database: String, resource_arn: String, secret_arn: String) -> Self {
        Self {
            database,
            resource_arn,
            secret_arn,
            schema: None,
            engine: EngineFamily::default(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Option<String>) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_engine(mut self, engine: EngineFamily) -> Self {
        self.engine = engine;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parse a URL-query style connection string such as
    /// `Database=mysql&ResourceArn=arn%3A...&SecretArn=arn%3A...`.
    ///
    /// Recognised keys: `Database`, `ResourceArn` (or `ResourceARN`), `SecretArn`
    /// (or `SecretARN`), `Schema`, `Engine` (`mysql` / `postgres`) and `TimeoutMs`.
    /// Unknown keys are ignored. Missing required keys are left empty and rejected
    /// when the connection is opened.
    ///
    /// # Errors
    /// Returns `ConfigError` for an unparseable `Engine` or `TimeoutMs` value.
    pub fn from_connection_string(conn_str: &str) -> Result<Self> {
        let mut opts = Self::new(String::new(), String::new(), String::new());

        for (key, value) in url::form_urlencoded::parse(conn_str.trim_start_matches('?').as_bytes())
        {
            match key.as_ref() {
                "Database" => opts.database = value.into_owned(),
                "ResourceArn" | "ResourceARN" => opts.resource_arn = value.into_owned(),
                "SecretArn" | "SecretARN" => opts.secret_arn = value.into_owned(),
                "Schema" => opts.schema = Some(value.into_owned()).filter(|s| !s.is_empty()),
                "Engine" => opts.engine = parse_engine(&value)?,
                "TimeoutMs" => {
                    let ms = value.parse::<u64>().map_err(|e| {
                        DataApiError::ConfigError(format!("invalid TimeoutMs '{value}': {e}"))
                    })?;
                    opts.timeout = Some(Duration::from_millis(ms));
                }
                _ => {}
            }
        }

        Ok(opts)
    }

    /// Read options from `DATA_API_DATABASE`, `DATA_API_RESOURCE_ARN`,
    /// `DATA_API_SECRET_ARN` and the optional `DATA_API_SCHEMA` / `DATA_API_ENGINE`.
    ///
    /// # Errors
    /// Returns `ConfigError` for an unparseable `DATA_API_ENGINE`.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).unwrap_or_default();

        let mut opts = Self::new(
            var("DATA_API_DATABASE"),
            var("DATA_API_RESOURCE_ARN"),
            var("DATA_API_SECRET_ARN"),
        );
        opts.schema = Some(var("DATA_API_SCHEMA")).filter(|s| !s.is_empty());
        let engine = var("DATA_API_ENGINE");
        if !engine.is_empty() {
            opts.engine = parse_engine(&engine)?;
        }
        Ok(opts)
    }

    /// Check that every required identifier is present.
    ///
    /// # Errors
    /// Returns `ConfigError` naming the missing keys.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("Database", &self.database),
            ("ResourceArn", &self.resource_arn),
            ("SecretArn", &self.secret_arn),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DataApiError::ConfigError(format!(
                "required configuration value(s) missing: {}",
                missing.join(", ")
            )))
        }
    }
}

fn parse_engine(value: &str) -> Result<EngineFamily> {
    EngineFamily::from_str(value, true)
        .map_err(|e| DataApiError::ConfigError(format!("invalid Engine '{value}': {e}")))
}

/// Fluent builder for Data API options.
#[derive(Debug, Clone)]
pub struct DataApiOptionsBuilder {
    opts: DataApiOptions,
}

impl DataApiOptionsBuilder {
    #[must_use]
    pub fn new(database: String, resource_arn: String, secret_arn: String) -> Self {
        Self {
            opts: DataApiOptions::new(database, resource_arn, secret_arn),
        }
    }

    #[must_use]
    pub fn schema(mut self, schema: Option<String>) -> Self {
        self.opts.schema = schema;
        self
    }

    #[must_use]
    pub fn engine(mut self, engine: EngineFamily) -> Self {
        self.opts.engine = engine;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.opts.timeout = timeout;
        self
    }

    #[must_use]
    pub fn finish(self) -> DataApiOptions {
        self.opts
    }

    /// Validate and return the options.
    ///
    /// # Errors
    /// Returns `ConfigError` if a required identifier is empty.
    pub fn build(self) -> Result<DataApiOptions> {
        self.opts.validate()?;
        Ok(self.opts)
    }
}

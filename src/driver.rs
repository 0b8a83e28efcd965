use std::sync::Arc;

use crate::client::DataApiClient;
use crate::config::DataApiOptions;
use crate::connection::DataApiConnection;
use crate::error::Result;

/// Factory for connections sharing one remote client.
///
/// Construct it where the client is built and hand it to whatever needs connections;
/// there is no global registry.
#[derive(Clone)]
pub struct DataApiDriver {
    client: Arc<dyn DataApiClient>,
}

impl std::fmt::Debug for DataApiDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataApiDriver")
            .field("client", &"<DataApiClient>")
            .finish()
    }
}

impl DataApiDriver {
    pub fn new(client: Arc<dyn DataApiClient>) -> Self {
        Self { client }
    }

    /// Open a connection from a URL-query style connection string.
    ///
    /// # Errors
    /// Returns `ConfigError` if the string is malformed or a required key is missing.
    pub fn open(&self, conn_str: &str) -> Result<DataApiConnection> {
        self.connect(DataApiOptions::from_connection_string(conn_str)?)
    }

    /// Open a connection from options.
    ///
    /// # Errors
    /// Returns `ConfigError` if a required identifier is empty.
    pub fn connect(&self, options: DataApiOptions) -> Result<DataApiConnection> {
        DataApiConnection::open(options, self.client.clone())
    }
}

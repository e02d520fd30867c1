use mongodb::{Client, Database, error::ErrorKind, options::ClientOptions};
use std::time::Duration;
use tracing::{error, info};

use super::health::check_health_detailed;
use super::{DEFAULT_DATABASE, MongoConfig};

/// Error type for MongoDB connection setup
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("Invalid MongoDB URI: {0}")]
    InvalidUri(String),

    /// SRV/TXT lookup for a `mongodb+srv://` URI failed
    #[error("Could not resolve MongoDB hosts: {0}")]
    Unresolved(String),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

impl MongoError {
    /// True when the server could not be reached, as opposed to a malformed URI
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, MongoError::Unresolved(_))
    }
}

/// Outcome of the startup ping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    /// The server could not be reached; carries the driver's error text
    Failed(String),
}

/// Handle to the single MongoDB client opened at startup
///
/// Cloning is cheap; the driver's `Client` and `Database` are reference counted.
#[derive(Clone, Debug)]
pub struct MongoConnection {
    client: Client,
    database: Database,
    state: ConnectionState,
}

impl MongoConnection {
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The database named by the config
    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}

/// Open the MongoDB connection described by `config`
///
/// The client is created once and verified with a `ping`. A failed ping is
/// logged and recorded in [`ConnectionState::Failed`]; it does not retry and
/// does not return an error, so callers still get a handle whose operations
/// will fail with the driver's own errors.
///
/// A URI the driver cannot parse is returned as [`MongoError::InvalidUri`].
/// A `mongodb+srv://` URI whose DNS lookup fails leaves no hosts to build a
/// client from; that is logged like a failed ping and returned as
/// [`MongoError::Unresolved`].
///
/// The database is `config.database` when set, otherwise the one named in the
/// URI path, otherwise [`DEFAULT_DATABASE`].
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, connect};
///
/// let config = MongoConfig::new("mongodb://localhost:27017/shoppingcart");
/// let connection = connect(&config).await?;
/// if !connection.is_connected() {
///     // operations will fail once the server selection timeout elapses
/// }
/// ```
pub async fn connect(config: &MongoConfig) -> Result<MongoConnection, MongoError> {
    info!(url = %config.url, "Attempting to connect to MongoDB");

    let mut options = match ClientOptions::parse(&config.url).await {
        Ok(options) => options,
        Err(e) if matches!(*e.kind, ErrorKind::DnsResolve { .. }) => {
            error!(error = %e, "Error connecting to MongoDB");
            return Err(MongoError::Unresolved(e.to_string()));
        }
        Err(e) => return Err(MongoError::InvalidUri(e.to_string())),
    };

    let database_name = config
        .database
        .clone()
        .or_else(|| options.default_database.clone())
        .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(app_name) = &config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;
    let database = client.database(&database_name);

    let health = check_health_detailed(&client).await;
    let state = if health.healthy {
        info!(
            database = %database_name,
            response_time_ms = health.response_time_ms,
            "Connected to MongoDB"
        );
        ConnectionState::Connected
    } else {
        let reason = health.message.unwrap_or_else(|| "unknown error".to_string());
        error!(error = %reason, "Error connecting to MongoDB");
        ConnectionState::Failed(reason)
    };

    Ok(MongoConnection {
        client,
        database,
        state,
    })
}

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse_or_default};

/// Connection URI used when nothing else is configured
pub const DEFAULT_MONGODB_URL: &str = "mongodb://localhost:27017/shoppingcart";

/// Database used when neither the config nor the URI names one, matching the driver's own fallback
pub const DEFAULT_DATABASE: &str = "test";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SERVER_SELECTION_TIMEOUT_SECS: u64 = 30;

/// MongoDB database configuration
///
/// This struct holds MongoDB connection settings.
/// It can be constructed manually or loaded from environment variables (with `config` feature).
///
/// # Example
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// // Database name taken from the URI path when connecting
/// let config = MongoConfig::new("mongodb://localhost:27017/shoppingcart");
///
/// // Explicit database name
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "mydb");
///
/// // From environment variables (requires `config` feature)
/// let config = MongoConfig::from_env()?;
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MongoConfig {
    /// MongoDB connection URL
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    pub url: String,

    /// Explicit database name; `None` means the one named in the URI path
    pub database: Option<String>,

    /// Optional application name for server logs
    pub app_name: Option<String>,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Server selection timeout in seconds
    ///
    /// Bounds how long an operation waits for a reachable server, which is
    /// what makes operations fail after an unsuccessful connect.
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    /// Create a MongoConfig from a URL
    ///
    /// The database is resolved by the driver from the URI path at connect time.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: None,
            app_name: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            server_selection_timeout_secs: DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
        }
    }

    /// Create a MongoConfig with a specific database name, overriding the URI path
    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            ..Self::new(url)
        }
    }

    /// Set the application name for server logs
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Override the connect and server selection timeouts
    pub fn with_timeouts(mut self, connect_secs: u64, server_selection_secs: u64) -> Self {
        self.connect_timeout_secs = connect_secs;
        self.server_selection_timeout_secs = server_selection_secs;
        self
    }

    /// Get a reference to the MongoDB URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the explicit database name, if any
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MONGODB_URL)
    }
}

/// Load MongoConfig from environment variables
///
/// Environment variables:
/// - `MONGODB_URL` or `MONGO_URL` (optional, default: `mongodb://localhost:27017/shoppingcart`)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (optional) - overrides the database from the URL
/// - `MONGODB_APP_NAME` (optional) - Application name for server logs
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (optional, default: 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (optional, default: 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        // Try MONGODB_URL first, fall back to MONGO_URL
        let url = std::env::var("MONGODB_URL")
            .or_else(|_| std::env::var("MONGO_URL"))
            .unwrap_or_else(|_| DEFAULT_MONGODB_URL.to_string());

        let mut config = Self::new(url);
        config.database = std::env::var("MONGODB_DATABASE")
            .or_else(|_| std::env::var("MONGO_DATABASE"))
            .ok();
        config.app_name = std::env::var("MONGODB_APP_NAME").ok();
        config.connect_timeout_secs =
            env_parse_or_default("MONGODB_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        config.server_selection_timeout_secs = env_parse_or_default(
            "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
            DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
        )?;

        Ok(config)
    }
}

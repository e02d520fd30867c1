//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that creates a MongoDB container for testing.

use database::mongodb::{MongoConfig, MongoConnection, connect};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let db = mongo.connection().database();
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    connection: MongoConnection,
    pub connection_string: String,
}

impl TestMongo {
    /// Start a MongoDB 7 container and connect to database `shoppingcart`
    pub async fn new() -> Self {
        Self::with_database("shoppingcart").await
    }

    /// Start a container and connect to the named database
    pub async fn with_database(database: &str) -> Self {
        let container = Mongo::default()
            .with_tag("7.0")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let connection_string = format!(
            "mongodb://127.0.0.1:{}/{}?directConnection=true",
            host_port, database
        );

        let config = MongoConfig::new(connection_string.clone()).with_timeouts(5, 5);
        let connection = connect(&config)
            .await
            .expect("Failed to build MongoDB client");

        assert!(
            connection.is_connected(),
            "MongoDB container did not answer ping: {:?}",
            connection.state()
        );

        tracing::info!(port = host_port, "Test MongoDB ready (mongo 7.0)");

        Self {
            container,
            connection,
            connection_string,
        }
    }

    /// The verified connection handle
    pub fn connection(&self) -> &MongoConnection {
        &self.connection
    }

    /// Get the connection string for manual client creation
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

// Container is automatically cleaned up when TestMongo is dropped
impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}

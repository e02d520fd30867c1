//! Database connectors
//!
//! Currently MongoDB only. The connector opens one client per process and hands
//! back an explicit [`mongodb::MongoConnection`] that callers pass into their
//! repositories.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB support
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All features
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{self, MongoConfig};
//!
//! let config = MongoConfig::new("mongodb://localhost:27017/shoppingcart");
//! let connection = mongodb::connect(&config).await?;
//! let products = connection.database().collection::<Document>("products");
//! ```

#[cfg(feature = "mongodb")]
pub mod mongodb;

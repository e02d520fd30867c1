//! Configuration for the shoppingcart runner

use core_config::{Environment, FromEnv};
use database::mongodb::MongoConfig;
use eyre::Result;

const APP_NAME: &str = "shoppingcart";

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub mongodb: MongoConfig,
}

impl Config {
    /// Load from the environment; `uri_override` replaces the configured URL
    /// and any configured database name, so the URI path decides.
    pub fn load(uri_override: Option<&str>) -> Result<Self> {
        let environment = Environment::from_env();

        let mut mongodb = match uri_override {
            Some(uri) => {
                let from_env = MongoConfig::from_env()?;
                MongoConfig::new(uri).with_timeouts(
                    from_env.connect_timeout_secs,
                    from_env.server_selection_timeout_secs,
                )
            }
            None => MongoConfig::from_env()?,
        };

        if mongodb.app_name.is_none() {
            mongodb = mongodb.with_app_name(APP_NAME);
        }

        Ok(Self {
            environment,
            mongodb,
        })
    }
}

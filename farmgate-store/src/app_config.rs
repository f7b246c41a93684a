use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storefront: StorefrontConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorefrontConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_page_size() -> u32 {
    20
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            page_size: default_page_size(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file that shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Environment overrides, e.g. FARMGATE__SERVER__PORT=8080
            .add_source(config::Environment::with_prefix("FARMGATE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

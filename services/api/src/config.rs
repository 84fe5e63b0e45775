//! Service configuration
//!
//! Values are layered: built-in defaults, then an optional `config/api`
//! file (any format the `config` crate understands), then `API__*`
//! environment variables, e.g. `API__SERVER__PORT=9090` or
//! `API__STORE__BACKEND=memory`. Database settings are read separately by
//! [`common::database::DatabaseConfig::from_env`].

use std::net::SocketAddr;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Top-level configuration for the API service
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Persistence backend settings
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Apply the bundled migrations on startup (PostgreSQL only)
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl AppConfig {
    /// Load the configuration from defaults, file and environment
    pub fn load() -> Result<Self> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("store.backend", "postgres")?
            .set_default("store.run_migrations", true)?
            .add_source(File::with_name("config/api").required(false))
            .add_source(
                Environment::with_prefix("API")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }
}

impl ServerConfig {
    /// Socket address to bind
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

pub mod config;
pub mod db;
pub mod error;
pub mod intake;
pub mod models;
pub mod server;
pub mod state;
pub mod store;
pub mod telemetry;

use crate::{config::AppConfig, server::Server};

/// Bootstraps the gateway using environment configuration.
pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    Server::new(config).await?.run().await
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::{SocketAddr, ToSocketAddrs};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    /// Encrypt the store connection without verifying the server certificate.
    pub db_tls: bool,
    pub max_pool_size: u32,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    listen_host: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    db_host: Option<String>,
    #[serde(default)]
    db_port: Option<u16>,
    #[serde(default)]
    db_username: Option<String>,
    #[serde(default)]
    db_password: Option<String>,
    #[serde(default)]
    db_name: Option<String>,
    #[serde(default)]
    db_ssl: Option<String>,
    #[serde(default = "default_pool_size")]
    db_pool_size: u32,
}

const fn default_pool_size() -> u32 {
    10
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let raw: RawConfig = envy::from_env().context("failed to parse environment variables")?;

        let listen_addr = resolve_addr(raw.listen_host, raw.port)?;

        Ok(Self {
            listen_addr,
            db_host: raw.db_host.context("DB_HOST must be set")?,
            db_port: raw.db_port.unwrap_or(5432),
            db_user: raw.db_username.context("DB_USERNAME must be set")?,
            db_password: raw.db_password.context("DB_PASSWORD must be set")?,
            db_name: raw.db_name.context("DB_NAME must be set")?,
            db_tls: matches!(raw.db_ssl.as_deref(), Some("REQUIRED")),
            max_pool_size: raw.db_pool_size.max(1),
        })
    }
}

fn resolve_addr(host: Option<String>, port: Option<u16>) -> Result<SocketAddr> {
    let host = host.unwrap_or_else(|| "0.0.0.0".to_string());
    let port = port.unwrap_or(8080);
    let combined = format!("{}:{}", host, port);
    combined
        .to_socket_addrs()
        .context("invalid listen host/port combination")?
        .next()
        .context("listen address resolved to no targets")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_addr_defaults_to_port_8080() {
        let addr = resolve_addr(None, None).unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn resolve_addr_honours_explicit_host_and_port() {
        let addr = resolve_addr(Some("127.0.0.1".into()), Some(9090)).unwrap();
        assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 9090)));
    }
}

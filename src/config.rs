use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings, taken from the environment (`.env` is loaded first by the binaries).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `DATABASE_URL`
    pub database_url: String,
    /// `LISTEN_ADDR`
    pub listen_addr: SocketAddr,
    /// `RUST_LOG`, handed to `tracing_subscriber::EnvFilter`.
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let listen_addr = get("LISTEN_ADDR", DEFAULT_LISTEN_ADDR);
        let listen_addr = listen_addr
            .parse()
            .with_context(|| format!("LISTEN_ADDR {listen_addr:?} is not a socket address"))?;

        Ok(Self {
            database_url: get("DATABASE_URL", DEFAULT_DATABASE_URL),
            listen_addr,
            log_filter: get("RUST_LOG", DEFAULT_LOG_FILTER),
        })
    }
}

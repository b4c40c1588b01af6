//! Server configuration loaded from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Where projects are kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageConfig {
    /// SQLite file in the platform data directory.
    Default,
    /// SQLite file at an explicit path (from BUILDCOST_DB).
    File(PathBuf),
    /// Nothing survives a restart.
    Memory,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    /// Allowed CORS origins (from BUILDCOST_CORS_ORIGINS, comma-separated).
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// `BUILDCOST_PORT` wins over the conventional `PORT`.
    pub fn from_env() -> Self {
        let host = std::env::var("BUILDCOST_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = parse_port(
            std::env::var("BUILDCOST_PORT")
                .or_else(|_| std::env::var("PORT"))
                .ok(),
        );

        let storage = match std::env::var("BUILDCOST_DB") {
            Ok(path) if path == ":memory:" => StorageConfig::Memory,
            Ok(path) if !path.trim().is_empty() => StorageConfig::File(PathBuf::from(path)),
            _ => StorageConfig::Default,
        };

        let cors_origins = std::env::var("BUILDCOST_CORS_ORIGINS")
            .ok()
            .map(|s| parse_origins(&s))
            .filter(|origins| !origins.is_empty());

        Self {
            host,
            port,
            storage,
            cors_origins,
        }
    }

    /// Local, in-memory configuration for tests.
    pub fn in_memory() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: 0,
            storage: StorageConfig::Memory,
            cors_origins: None,
        }
    }

    pub fn bind_address(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address {}: {}", addr, e))
    }

    /// CORS layer honouring the configured allow-list.
    pub fn cors_layer(&self) -> CorsLayer {
        match &self.cors_origins {
            None => CorsLayer::permissive(),
            Some(origins) => {
                let allowed: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|o| match HeaderValue::from_str(o) {
                        Ok(value) => Some(value),
                        Err(_) => {
                            tracing::warn!("Ignoring invalid CORS origin: {}", o);
                            None
                        }
                    })
                    .collect();
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(allowed))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_port(raw: Option<String>) -> u16 {
    match raw {
        None => DEFAULT_PORT,
        Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid port {:?}, using {}", raw, DEFAULT_PORT);
            DEFAULT_PORT
        }),
    }
}

fn parse_origins(s: &str) -> Vec<String> {
    s.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

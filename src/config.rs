//! Application configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

use crate::error::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Interface address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served for every non-API path.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Expose Prometheus metrics at `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "./static".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            metrics_enabled: default_true(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Build configuration from explicit key/value pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(pairs)?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.host.parse::<IpAddr>().is_err() {
            return Err(AppError::InvalidConfig(format!(
                "HOST must be an IP address, got {:?}",
                self.host
            )));
        }

        if self.static_dir.trim().is_empty() {
            return Err(AppError::InvalidConfig(
                "STATIC_DIR must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Address the HTTP listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| AppError::InvalidConfig(format!("invalid HOST {:?}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

// src/config.rs

//! Process configuration from environment variables.

use std::env;

use crate::error::{AppError, Result};

/// Listening address and crawler config location.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Path to the crawler TOML configuration
    pub config_path: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|_| AppError::config("Invalid value for PORT"))?;

        let config_path =
            env::var("CONFIG_FILE").unwrap_or_else(|_| "data/config.toml".to_string());

        Ok(Self {
            host,
            port,
            config_path,
        })
    }
}

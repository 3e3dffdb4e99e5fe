//! Service configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, an optional
//! YAML file named by `TODOLIST_CONFIG`, and the `LISTEN` /
//! `MAX_REQUEST_SIZE` environment variables.
//!
//! ```yaml
//! server:
//!   listen_addr: "127.0.0.1:8080"
//!   max_request_size: 1048576
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Largest request accepted by default, in bytes.
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 1024 * 1024;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Requests larger than this are answered with 413
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            max_request_size: default_max_request_size(),
        }
    }
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_max_request_size() -> usize {
    DEFAULT_MAX_REQUEST_SIZE
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup("TODOLIST_CONFIG") {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(addr) = lookup("LISTEN") {
            cfg.server.listen_addr = addr;
        }

        if let Some(size) = lookup("MAX_REQUEST_SIZE") {
            cfg.server.max_request_size = size
                .trim()
                .parse()
                .with_context(|| format!("MAX_REQUEST_SIZE is not a byte count: {:?}", size))?;
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_yaml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

//! Server settings read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{EngineError, EngineResult};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_CONFIG_DIR: &str = "./config/default";

/// Settings for the HTTP server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Address the server listens on (`JORNADA_BIND_ADDR`).
    pub bind_addr: SocketAddr,
    /// Catalog directory (`JORNADA_CONFIG_DIR`).
    pub config_dir: PathBuf,
    /// Optional JSON snapshot file for the store (`JORNADA_DATA_FILE`).
    pub data_file: Option<PathBuf>,
}

impl ServerSettings {
    /// Reads the settings from process environment variables.
    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the settings through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup("JORNADA_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse()
            .map_err(|_| EngineError::validation("JORNADA_BIND_ADDR", format!("not a socket address: {}", bind)))?;

        let config_dir = lookup("JORNADA_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));

        let data_file = lookup("JORNADA_DATA_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_addr,
            config_dir,
            data_file,
        })
    }
}

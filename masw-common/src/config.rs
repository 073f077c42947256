//! Server configuration loading
//!
//! Bind address resolution follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`MASW_HOST` / `MASW_PORT`)
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Optional overrides read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
}

/// Resolve the server bind address following the priority order above.
pub fn resolve_server_config(
    cli_host: Option<String>,
    cli_port: Option<u16>,
) -> Result<ServerConfig> {
    let file = load_config_file().unwrap_or_default();

    // Priority 1: command-line argument
    // Priority 2: environment variable
    // Priority 3: TOML config file
    // Priority 4: compiled default
    let host = match cli_host {
        Some(host) => host,
        None => match std::env::var("MASW_HOST") {
            Ok(host) => host,
            Err(_) => file.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
        },
    };

    let port = match cli_port {
        Some(port) => port,
        None => match std::env::var("MASW_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("invalid MASW_PORT value: {raw}")))?,
            Err(_) => file.port.unwrap_or(DEFAULT_PORT),
        },
    };

    Ok(ServerConfig { host, port })
}

/// Find and parse the config file, if one exists.
fn load_config_file() -> Option<FileConfig> {
    let path = config_file_path()?;
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&contents) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Ignoring malformed config file {}: {}", path.display(), e);
            None
        }
    }
}

/// Config file location: `~/.config/masw/config.toml`, with
/// `/etc/masw/config.toml` as a system-wide fallback on Linux.
fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("masw").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/masw/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

//! Daemon configuration
//!
//! Layers, lowest precedence first:
//! - built-in defaults
//! - optional TOML file
//! - `CAA_*` environment variables (e.g. `CAA_BIND_ADDR`, `CAA_DB_PATH`)
//!
//! CLI flags are applied on top by the binary. The resulting `Config` is
//! read-only for the lifetime of the server.

use std::net::SocketAddr;
use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Where image files are published
pub const DEFAULT_DOWNLOAD_PREFIX: &str = "http://archive.org/download";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "CAA_";

/// Default size of the catalog connection pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Catalog database path; `None` = in-memory
    pub db_path: Option<String>,
    pub max_connections: u32,
    /// Base URL that redirect targets are built under
    pub download_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            db_path: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            download_prefix: DEFAULT_DOWNLOAD_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Build the provider stack without extracting
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load configuration from defaults, an optional file and the environment
    ///
    /// An explicitly named file that does not exist is an error.
    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        if let Some(path) = file {
            if !path.exists() {
                return Err(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
        }

        let config: Config = Self::figment(file).extract()?;
        Ok(config.normalized())
    }

    /// Set the bind address
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the database path
    pub fn with_db_path(mut self, path: impl Into<String>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    /// Set the download prefix
    pub fn with_download_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.download_prefix = prefix.into();
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.download_prefix.trim_end_matches('/').len();
        self.download_prefix.truncate(trimmed);
        self
    }
}

//! Server configuration.
//!
//! Every setting is a CLI flag with an environment variable fallback.

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_DATABASE: &str = "usuarios.db";

/// HTTP CRUD service for the usuario resource.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "usuarios-server")]
#[command(version, about, long_about = None)]
pub struct ServerConfig {
    /// Interface to bind
    #[arg(long, env = "USUARIOS_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// TCP port to listen on
    #[arg(long, env = "USUARIOS_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// SQLite database file, created when missing
    #[arg(long, env = "USUARIOS_DB", default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// trace|debug|info|warn|error (defaults by build mode)
    #[arg(long, env = "USUARIOS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when unset
    #[arg(long, env = "USUARIOS_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: PathBuf::from(DEFAULT_DATABASE),
            log_level: None,
            log_dir: None,
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Effective log level: the configured one, or the build-mode default.
    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(usuarios_core::default_log_level())
    }
}

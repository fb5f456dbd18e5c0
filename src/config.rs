//! Configuration handling for the PostgreSQL MCP Server.
//!
//! This module provides configuration management via CLI arguments and environment variables.
//! Every database setting has an environment variable (`DB_HOST`, `DB_PORT`, ...), so the
//! server can be started with no flags at all. A `.env` file in the working directory is
//! loaded first; variables already set in the environment take precedence over it.

use crate::models::{ConnectionConfig, ConnectionConfigError, DEFAULT_DB_HOST};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8000;
pub const DEFAULT_MCP_ENDPOINT: &str = "/mcp";

/// Load `.env` from the working directory, or a parent, into the process environment.
///
/// Returns the file's path, or `None` when there is no such file. Must run before
/// [`Config`] is parsed so the `env` attributes see the values.
pub fn load_env_file() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Load a specific env file. Variables that are already set are left untouched.
pub fn load_env_file_from(path: &Path) -> Result<(), dotenvy::Error> {
    dotenvy::from_path(path)
}

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    Stdio,
    /// Streamable HTTP (for networked clients)
    #[default]
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Configuration for the PostgreSQL MCP Server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pg-mcp-server",
    about = "MCP server exposing a PostgreSQL database to AI assistants",
    version
)]
pub struct Config {
    /// PostgreSQL host
    #[arg(long, default_value = DEFAULT_DB_HOST, env = "DB_HOST")]
    pub db_host: String,

    /// PostgreSQL port
    #[arg(long, env = "DB_PORT")]
    pub db_port: u16,

    /// Database name
    #[arg(long, env = "DB_DATABASE")]
    pub db_database: String,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: String,

    /// Transport mode (stdio or http)
    #[arg(short, long, value_enum, default_value = "http", env = "MCP_TRANSPORT")]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(long = "host", default_value = DEFAULT_HTTP_HOST, env = "MCP_HTTP_HOST")]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(long = "port", default_value_t = DEFAULT_HTTP_PORT, env = "MCP_HTTP_PORT")]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(long, default_value = DEFAULT_MCP_ENDPOINT, env = "MCP_ENDPOINT")]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Build the immutable connection settings shared by every request.
    pub fn connection_config(&self) -> Result<ConnectionConfig, ConnectionConfigError> {
        ConnectionConfig::new(
            &self.db_host,
            self.db_port,
            &self.db_database,
            &self.db_user,
            &self.db_password,
        )
    }
}

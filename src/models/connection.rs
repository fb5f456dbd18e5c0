//! Connection-related data models.
//!
//! This module defines the immutable connection settings the server is started with.

/// Default PostgreSQL host when `DB_HOST` is not set.
pub const DEFAULT_DB_HOST: &str = "localhost";

/// Settings for reaching the PostgreSQL database.
///
/// Built once at startup and shared read-only by every request.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    /// Contains sensitive data - never log
    pub password: String,
}

impl ConnectionConfig {
    /// Create a new connection configuration.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConnectionConfigError> {
        let host = host.into();
        let database = database.into();
        let user = user.into();

        if port == 0 {
            return Err(ConnectionConfigError::InvalidPort);
        }
        if database.trim().is_empty() {
            return Err(ConnectionConfigError::Missing("database"));
        }
        if user.trim().is_empty() {
            return Err(ConnectionConfigError::Missing("user"));
        }

        Ok(Self {
            host: if host.trim().is_empty() {
                DEFAULT_DB_HOST.to_string()
            } else {
                host
            },
            port,
            database,
            user,
            password: password.into(),
        })
    }

    /// Log-safe description of the connection target: `database@host:port`.
    pub fn target(&self) -> String {
        format!("{}@{}:{}", self.database, self.host, self.port)
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"****")
            .finish()
    }
}

/// Errors that can occur when creating a connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionConfigError {
    /// Port must be a non-zero TCP port
    #[error("Database port must be between 1 and 65535")]
    InvalidPort,

    /// A required identity value is blank
    #[error("Database {0} must not be empty")]
    Missing(&'static str),
}

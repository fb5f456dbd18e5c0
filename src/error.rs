//! Error types for the PostgreSQL MCP Server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Every variant renders a message that is safe to hand back to the caller inside an
//! `{"error": ..., "status": "failed"}` payload, so driver text is kept verbatim.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection failed: {message}")]
    Connection {
        message: String,
        /// `<database>@<host>:<port>`, never the password
        target: String,
    },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
    },

    #[error("Table '{table}' not found in schema '{schema}'")]
    TableNotFound { table: String, schema: String },

    #[error("Only SELECT queries are allowed with this tool")]
    SelectOnly,

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a connection error for the given log-safe target.
    pub fn connection(message: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            target: target.into(),
        }
    }

    /// Create a database error with optional SQL state.
    pub fn database(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
        }
    }

    /// Create a table not found error.
    pub fn table_not_found(table: impl Into<String>, schema: impl Into<String>) -> Self {
        Self::TableNotFound {
            table: table.into(),
            schema: schema.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// SQLSTATE reported by the server, if any.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Database { sql_state, .. } => sql_state.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound { .. })
    }

    /// Attach a connection target to errors raised while connecting.
    ///
    /// sqlx reports connect failures as I/O, TLS, or protocol errors without
    /// saying where it was connecting to.
    pub fn with_target(self, target: &str) -> Self {
        match self {
            Self::Connection { message, .. } => Self::connection(message, target),
            Self::Database { message, .. } => Self::connection(message, target),
            other => other,
        }
    }
}

/// Convert sqlx errors to DbError.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => DbError::connection(msg.to_string(), ""),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DbError::database(db_err.message(), code)
            }
            sqlx::Error::RowNotFound => DbError::database("No rows returned", None),
            sqlx::Error::PoolTimedOut => DbError::connection("Timed out acquiring connection", ""),
            sqlx::Error::PoolClosed => DbError::connection("Connection is closed", ""),
            sqlx::Error::Io(io_err) => DbError::connection(format!("I/O error: {}", io_err), ""),
            sqlx::Error::Tls(tls_err) => DbError::connection(format!("TLS error: {}", tls_err), ""),
            sqlx::Error::Protocol(msg) => {
                DbError::connection(format!("Protocol error: {}", msg), "")
            }
            sqlx::Error::TypeNotFound { type_name } => {
                DbError::internal(format!("Type not found: {}", type_name))
            }
            sqlx::Error::ColumnNotFound(col) => {
                DbError::internal(format!("Column not found: {}", col))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => DbError::internal(format!(
                "Column index {} out of bounds (len: {})",
                index, len
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => DbError::internal(format!("Decode error: {}", source)),
            sqlx::Error::WorkerCrashed => DbError::internal("Database worker crashed"),
            _ => DbError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

//! Data models for the PostgreSQL MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod query;
pub mod response;
pub mod schema;

// Re-export commonly used types
pub use connection::{ConnectionConfig, ConnectionConfigError, DEFAULT_DB_HOST};
pub use query::{JsonRow, MutationResult, QueryParam, QueryResult, ResponseStatus, SelectResult};
pub use response::{ErrorResponse, ToolOutput};
pub use schema::{ColumnDescriptor, ForeignKeyDescriptor, TableList, TableSchema};

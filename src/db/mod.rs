//! Database access layer.
//!
//! This module provides database access functionality:
//! - Per-call connection acquisition
//! - Query execution
//! - Schema introspection
//! - Type mappings

pub mod connection;
pub mod executor;
pub mod params;
pub mod schema;
pub mod types;

pub use connection::{ConnectionFactory, DatabaseHandle, PgConnectionFactory, PgHandle};
pub use executor::{QueryExecutor, StatementKind};
pub use schema::SchemaInspector;

//! MCP tool implementations.
//!
//! This module contains all database tool handlers:
//! - `schema`: `list_tables` and `get_table_schema`
//! - `query`: `execute_query` for any statement
//! - `guard`: `execute_safe_query`, restricted to SELECT

pub mod guard;
pub mod query;
pub mod schema;

use std::borrow::Cow;

pub use guard::{ExecuteSafeQueryInput, SafeQueryGuard};
pub use query::{ExecuteQueryInput, QueryParamInput, QueryToolHandler};
pub use schema::{DEFAULT_SCHEMA, GetTableSchemaInput, ListTablesInput, SchemaToolHandler};

/// Shorten SQL for log lines, appending `...` when cut.
pub(crate) fn truncate_for_log(sql: &str, max_chars: usize) -> Cow<'_, str> {
    match sql.char_indices().nth(max_chars) {
        Some((end, _)) => Cow::Owned(format!("{}...", &sql[..end])),
        None => Cow::Borrowed(sql),
    }
}

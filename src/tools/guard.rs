//! Read-only guard for the execute_safe_query tool.
//!
//! The gate is the same textual prefix check `execute_query` uses to pick its
//! SELECT path: trimmed, uppercased text must start with `SELECT`. It is not a
//! SQL parser. A statement that starts with `SELECT` but calls a function with
//! side effects is passed through. One that appends `; DELETE ...` passes the
//! gate too, but the server refuses it since reads run as a single prepared
//! statement.

use crate::db::connection::ConnectionFactory;
use crate::db::executor::StatementKind;
use crate::error::DbError;
use crate::models::{QueryResult, ToolOutput};
use crate::tools::query::QueryToolHandler;
use crate::tools::truncate_for_log;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Input for the execute_safe_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteSafeQueryInput {
    /// SELECT statement to execute. Any other statement is rejected.
    pub query: String,
}

impl ExecuteSafeQueryInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Check whether a statement passes the read-only gate.
pub fn is_select_only(sql: &str) -> bool {
    StatementKind::classify(sql).is_select()
}

/// Rejects non-SELECT statements before any connection is opened, then
/// delegates to [`QueryToolHandler`] without parameters.
pub struct SafeQueryGuard<F> {
    inner: QueryToolHandler<F>,
}

impl<F: ConnectionFactory> SafeQueryGuard<F> {
    pub fn new(factory: Arc<F>) -> Self {
        Self {
            inner: QueryToolHandler::new(factory),
        }
    }

    /// Handle the execute_safe_query tool call.
    pub async fn execute_safe_query(
        &self,
        input: ExecuteSafeQueryInput,
    ) -> ToolOutput<QueryResult> {
        info!(query = %truncate_for_log(&input.query, 100), "Executing safe query");

        if !is_select_only(&input.query) {
            warn!(
                query = %truncate_for_log(&input.query, 50),
                "Rejected non-SELECT query in safe mode"
            );
            return ToolOutput::Failed(DbError::SelectOnly.into());
        }

        self.inner.run(&input.query, &[]).await.into()
    }
}

//! Query execution engine.
//!
//! Statements are split into two paths by a textual prefix check on the
//! trimmed, uppercased text:
//! - `SELECT ...` is fetched and returned as rows
//! - anything else is executed and reported by its command status
//!
//! The check is a heuristic, not a parser. Any `WITH ...` statement is a
//! mutation here, even a pure read. Text starting with `SELECT` is a read even
//! when it calls a side-effecting function. The SELECT path always runs as a
//! prepared statement, so `SELECT 1; DELETE FROM t` is classified as a read
//! and then rejected by the server as multiple commands.

use crate::db::connection::DatabaseHandle;
use crate::error::{DbError, DbResult};
use crate::models::{QueryParam, QueryResult};
use tracing::debug;

/// How a statement is run and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Mutation,
}

impl StatementKind {
    /// Classify a statement; case and surrounding whitespace are ignored.
    pub fn classify(sql: &str) -> Self {
        if sql.trim().to_uppercase().starts_with("SELECT") {
            Self::Select
        } else {
            Self::Mutation
        }
    }

    pub fn is_select(self) -> bool {
        self == Self::Select
    }
}

/// First whitespace-separated token of the trimmed, uppercased statement.
pub fn statement_verb(sql: &str) -> String {
    sql.trim()
        .to_uppercase()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Last whitespace-separated token of a command status (`INSERT 0 1` gives `1`).
pub fn affected_rows_from_status(status: &str) -> String {
    status.split_whitespace().last().unwrap_or("0").to_string()
}

/// Reject statements that cannot be sent at all.
pub fn validate_query(sql: &str) -> DbResult<()> {
    if sql.trim().is_empty() {
        return Err(DbError::invalid_input("query must not be empty"));
    }
    Ok(())
}

/// Query executor that runs one statement on a caller-owned connection.
pub struct QueryExecutor;

impl QueryExecutor {
    /// Execute a statement and shape its outcome.
    ///
    /// Parameters are bound positionally (`$1`, `$2`, ...) on both paths.
    pub async fn execute<H: DatabaseHandle>(
        conn: &mut H,
        sql: &str,
        params: &[QueryParam],
    ) -> DbResult<QueryResult> {
        match StatementKind::classify(sql) {
            StatementKind::Select => {
                let rows = conn.fetch(sql, params).await?;
                debug!(row_count = rows.len(), "Query returned rows");
                Ok(QueryResult::select(rows))
            }
            StatementKind::Mutation => {
                let status = conn.execute(sql, params).await?;
                let affected_rows = affected_rows_from_status(&status);
                debug!(status = %status, affected_rows = %affected_rows, "Statement executed");
                Ok(QueryResult::mutation(statement_verb(sql), affected_rows))
            }
        }
    }
}

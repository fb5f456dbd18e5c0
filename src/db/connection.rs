//! Per-call connection acquisition.
//!
//! Every tool call opens its own PostgreSQL connection through a
//! [`ConnectionFactory`] and closes it before returning. There is no pool:
//! concurrent calls each own a separate connection for their duration.
//!
//! Handlers are written against the [`DatabaseHandle`] trait rather than
//! `PgConnection` directly so the request contract can be exercised without a
//! running server.

use crate::db::params::bind_postgres_param;
use crate::db::types::RowToJson;
use crate::error::{DbError, DbResult};
use crate::models::{ConnectionConfig, JsonRow, QueryParam};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{ConnectOptions, Connection, Executor};
use std::future::Future;
use tracing::{debug, error, warn};

/// Commands whose PostgreSQL command tag ends with a row count.
const COUNTED_COMMANDS: &[&str] = &[
    "UPDATE", "DELETE", "MERGE", "COPY", "MOVE", "FETCH", "SELECT", "WITH",
];

/// An open connection to one database, owned by a single tool call.
pub trait DatabaseHandle: Send {
    /// Run a statement and return its rows as JSON maps.
    fn fetch(
        &mut self,
        sql: &str,
        params: &[QueryParam],
    ) -> impl Future<Output = DbResult<Vec<JsonRow>>> + Send;

    /// Run a statement and return the server's command status, e.g. `INSERT 0 1`.
    fn execute(
        &mut self,
        sql: &str,
        params: &[QueryParam],
    ) -> impl Future<Output = DbResult<String>> + Send;

    /// Release the connection. Called exactly once per acquired handle.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Produces a fresh [`DatabaseHandle`] for each call.
pub trait ConnectionFactory: Send + Sync {
    type Handle: DatabaseHandle;

    /// Open a new connection. A single attempt; failures are returned as-is.
    fn acquire(&self) -> impl Future<Output = DbResult<Self::Handle>> + Send;
}

/// Connection factory for the configured PostgreSQL server.
#[derive(Debug, Clone)]
pub struct PgConnectionFactory {
    config: ConnectionConfig,
}

impl PgConnectionFactory {
    /// Create a factory for the given settings.
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .database(&self.config.database)
            .username(&self.config.user)
            .password(&self.config.password)
    }
}

impl ConnectionFactory for PgConnectionFactory {
    type Handle = PgHandle;

    async fn acquire(&self) -> DbResult<PgHandle> {
        let db = self.config.target();
        debug!(db = %db, "Connecting to database");

        match self.connect_options().connect().await {
            Ok(conn) => {
                debug!("Database connection established successfully");
                Ok(PgHandle { conn })
            }
            Err(e) => {
                let err = DbError::from(e).with_target(&db);
                error!(db = %db, error = %err, "Failed to connect to database");
                Err(err)
            }
        }
    }
}

/// A live PostgreSQL connection.
pub struct PgHandle {
    conn: PgConnection,
}

impl DatabaseHandle for PgHandle {
    async fn fetch(&mut self, sql: &str, params: &[QueryParam]) -> DbResult<Vec<JsonRow>> {
        // Always prepared: the server rejects a second statement instead of running it
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_postgres_param(query, param);
        }
        let rows: Vec<PgRow> = query.fetch_all(&mut self.conn).await?;

        Ok(rows.iter().map(RowToJson::to_json_map).collect())
    }

    async fn execute(&mut self, sql: &str, params: &[QueryParam]) -> DbResult<String> {
        // Without params, send the text as-is so multi-statement scripts still work
        let result = if params.is_empty() {
            (&mut self.conn).execute(sql).await?
        } else {
            let mut query = sqlx::query(sql);
            for param in params {
                query = bind_postgres_param(query, param);
            }
            query.execute(&mut self.conn).await?
        };

        Ok(command_tag(sql, result.rows_affected()))
    }

    async fn close(self) {
        if let Err(e) = self.conn.close().await {
            warn!(error = %e, "Error while closing database connection");
        }
        debug!("Database connection closed");
    }
}

/// Rebuild the PostgreSQL command tag for a statement.
///
/// sqlx only exposes the affected-row count, so the tag is reconstructed the way
/// the server formats it: `INSERT 0 <n>` for inserts, `<VERB> <n>` for other
/// counted commands, and `<VERB> <OBJECT>` (e.g. `CREATE TABLE`) otherwise.
pub fn command_tag(sql: &str, rows_affected: u64) -> String {
    let upper = sql.trim().to_uppercase();
    let mut words = upper
        .split_whitespace()
        .map(|w| w.trim_end_matches(';'))
        .filter(|w| !w.is_empty());

    let Some(verb) = words.next() else {
        return String::new();
    };

    if verb == "INSERT" {
        format!("INSERT 0 {}", rows_affected)
    } else if COUNTED_COMMANDS.contains(&verb) || rows_affected > 0 {
        format!("{} {}", verb, rows_affected)
    } else {
        match words.next() {
            Some(object) => format!("{} {}", verb, object),
            None => verb.to_string(),
        }
    }
}

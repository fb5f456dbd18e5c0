//! Query execution tool.
//!
//! This module implements the `execute_query` MCP tool. Any statement is
//! accepted; SELECTs return rows, everything else returns the affected-row
//! count from the server's command status.

use crate::db::connection::{ConnectionFactory, DatabaseHandle};
use crate::db::executor::{QueryExecutor, validate_query};
use crate::error::DbResult;
use crate::models::{QueryParam, QueryResult, ToolOutput};
use crate::tools::truncate_for_log;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Input for the execute_query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteQueryInput {
    /// SQL statement to execute. Use $1, $2, ... placeholders for parameters.
    pub query: String,
    /// Positional parameters bound to $1, $2, ... in order
    #[serde(default)]
    pub params: Option<Vec<QueryParamInput>>,
}

impl ExecuteQueryInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: None,
        }
    }

    pub fn with_params(mut self, params: Vec<QueryParamInput>) -> Self {
        self.params = Some(params);
        self
    }
}

/// Input parameter that can be various JSON types.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum QueryParamInput {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// String value
    String(String),
}

impl From<QueryParamInput> for QueryParam {
    fn from(input: QueryParamInput) -> Self {
        match input {
            QueryParamInput::Null => QueryParam::Null,
            QueryParamInput::Bool(v) => QueryParam::Bool(v),
            QueryParamInput::Int(v) => QueryParam::Int(v),
            QueryParamInput::Float(v) => QueryParam::Float(v),
            QueryParamInput::String(v) => QueryParam::String(v),
        }
    }
}

/// Handler for the execute_query tool.
pub struct QueryToolHandler<F> {
    factory: Arc<F>,
}

impl<F: ConnectionFactory> QueryToolHandler<F> {
    pub fn new(factory: Arc<F>) -> Self {
        Self { factory }
    }

    /// Handle the execute_query tool call.
    pub async fn execute_query(&self, input: ExecuteQueryInput) -> ToolOutput<QueryResult> {
        info!(query = %truncate_for_log(&input.query, 100), "Executing query");

        let params: Vec<QueryParam> = input
            .params
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect();

        self.run(&input.query, &params).await.into()
    }

    /// Execute a statement on a fresh connection and log the outcome.
    pub(crate) async fn run(&self, sql: &str, params: &[QueryParam]) -> DbResult<QueryResult> {
        let result = self.run_on_connection(sql, params).await;
        match &result {
            Ok(QueryResult::Select(select)) => {
                info!(row_count = select.row_count, "SELECT query returned rows")
            }
            Ok(QueryResult::Mutation(mutation)) => info!(
                statement = %mutation.statement_type,
                affected_rows = %mutation.affected_rows,
                "Query affected rows"
            ),
            Err(e) => error!(error = %e, sql_state = ?e.sql_state(), "Query execution failed"),
        }
        result
    }

    async fn run_on_connection(&self, sql: &str, params: &[QueryParam]) -> DbResult<QueryResult> {
        validate_query(sql)?;

        if !params.is_empty() {
            debug!(
                count = params.len(),
                types = ?params.iter().map(QueryParam::type_name).collect::<Vec<_>>(),
                "Query parameters"
            );
        }

        let mut conn = self.factory.acquire().await?;
        let result = QueryExecutor::execute(&mut conn, sql, params).await;
        conn.close().await;
        result
    }
}

//! Schema introspection tools.
//!
//! This module implements the `list_tables` and `get_table_schema` MCP tools.

use crate::db::connection::{ConnectionFactory, DatabaseHandle};
use crate::db::schema::SchemaInspector;
use crate::error::DbResult;
use crate::models::{TableList, TableSchema, ToolOutput};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Schema used when the caller does not name one.
pub const DEFAULT_SCHEMA: &str = "public";

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

/// Input for the list_tables tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTablesInput {
    /// Schema to list base tables from. Default: "public"
    #[serde(default = "default_schema")]
    pub schema_name: String,
}

impl Default for ListTablesInput {
    fn default() -> Self {
        Self {
            schema_name: default_schema(),
        }
    }
}

/// Input for the get_table_schema tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTableSchemaInput {
    /// Name of the table to describe
    pub table_name: String,
    /// Schema the table lives in. Default: "public"
    #[serde(default = "default_schema")]
    pub schema_name: String,
}

impl GetTableSchemaInput {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            schema_name: default_schema(),
        }
    }

    pub fn in_schema(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = schema_name.into();
        self
    }
}

/// Handler for schema-related tools.
pub struct SchemaToolHandler<F> {
    factory: Arc<F>,
}

impl<F: ConnectionFactory> SchemaToolHandler<F> {
    pub fn new(factory: Arc<F>) -> Self {
        Self { factory }
    }

    /// List the base tables of a schema in catalog order, without repeats.
    pub async fn list_tables(&self, input: ListTablesInput) -> ToolOutput<TableList> {
        info!(schema = %input.schema_name, "Listing tables");

        let result = self.run_list_tables(&input.schema_name).await;
        match &result {
            Ok(list) => {
                debug!(tables = ?list.tables, "Tables found");
                info!(schema = %input.schema_name, count = list.count, "Listed tables");
            }
            Err(e) => error!(schema = %input.schema_name, error = %e, "Failed to list tables"),
        }
        result.into()
    }

    /// Describe a table's columns, primary key and foreign keys.
    pub async fn get_table_schema(&self, input: GetTableSchemaInput) -> ToolOutput<TableSchema> {
        info!(
            table = %input.table_name,
            schema = %input.schema_name,
            "Getting table schema"
        );

        let result = self
            .run_describe_table(&input.table_name, &input.schema_name)
            .await;
        match &result {
            Ok(schema) => info!(
                table = %input.table_name,
                columns = schema.columns.len(),
                primary_keys = schema.primary_keys.len(),
                foreign_keys = schema.foreign_keys.len(),
                "Retrieved table schema"
            ),
            // Not-found is already logged as a warning by the inspector
            Err(e) if e.is_not_found() => {}
            Err(e) => error!(table = %input.table_name, error = %e, "Failed to get table schema"),
        }
        result.into()
    }

    async fn run_list_tables(&self, schema: &str) -> DbResult<TableList> {
        let mut conn = self.factory.acquire().await?;
        let result = SchemaInspector::list_tables(&mut conn, schema).await;
        conn.close().await;
        result
    }

    async fn run_describe_table(&self, table: &str, schema: &str) -> DbResult<TableSchema> {
        let mut conn = self.factory.acquire().await?;
        let result = SchemaInspector::describe_table(&mut conn, table, schema).await;
        conn.close().await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_tables_input_defaults_to_public() {
        let input: ListTablesInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.schema_name, "public");
        assert_eq!(ListTablesInput::default().schema_name, "public");
    }

    #[test]
    fn test_get_table_schema_input() {
        let input: GetTableSchemaInput =
            serde_json::from_str(r#"{"table_name": "users"}"#).unwrap();
        assert_eq!(input.table_name, "users");
        assert_eq!(input.schema_name, "public");

        let input = GetTableSchemaInput::new("orders").in_schema("sales");
        assert_eq!(input.schema_name, "sales");
    }

    #[test]
    fn test_get_table_schema_input_requires_table() {
        assert!(serde_json::from_str::<GetTableSchemaInput>("{}").is_err());
    }
}

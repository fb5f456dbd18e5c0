//! MCP service implementation using rmcp.
//!
//! This module defines the PgService struct with the four database tools
//! exposed via the MCP protocol using the rmcp framework's macros. Every tool
//! answers with a pretty-printed JSON document; failures are reported inside
//! that document as `{"error": ..., "status": "failed"}`.

use crate::db::PgConnectionFactory;
use crate::tools::guard::{ExecuteSafeQueryInput, SafeQueryGuard};
use crate::tools::query::{ExecuteQueryInput, QueryToolHandler};
use crate::tools::schema::{GetTableSchemaInput, ListTablesInput, SchemaToolHandler};
use rmcp::{
    ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct PgService {
    /// Opens one connection per tool call
    factory: Arc<PgConnectionFactory>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl PgService {
    /// Create a new PgService instance.
    pub fn new(factory: Arc<PgConnectionFactory>) -> Self {
        Self {
            factory,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl PgService {
    #[tool(
        description = "List all base tables in a schema (views excluded).\nReturns the schema, the table names in catalog order, and their count."
    )]
    async fn list_tables(&self, Parameters(input): Parameters<ListTablesInput>) -> String {
        SchemaToolHandler::new(self.factory.clone())
            .list_tables(input)
            .await
            .to_json_string()
    }

    #[tool(
        description = "Get the schema of a table.\nReturns columns (name, type, nullable, default, is_primary_key, max_length), primary keys, and foreign keys."
    )]
    async fn get_table_schema(
        &self,
        Parameters(input): Parameters<GetTableSchemaInput>,
    ) -> String {
        SchemaToolHandler::new(self.factory.clone())
            .get_table_schema(input)
            .await
            .to_json_string()
    }

    #[tool(
        description = "Execute any SQL statement.\nSELECT returns rows; INSERT/UPDATE/DELETE/DDL return the affected row count.\nUse $1, $2, ... placeholders with `params` instead of inlining values."
    )]
    async fn execute_query(&self, Parameters(input): Parameters<ExecuteQueryInput>) -> String {
        QueryToolHandler::new(self.factory.clone())
            .execute_query(input)
            .await
            .to_json_string()
    }

    #[tool(
        description = "Execute a read-only SELECT query.\nAny statement that does not start with SELECT is rejected without touching the database."
    )]
    async fn execute_safe_query(
        &self,
        Parameters(input): Parameters<ExecuteSafeQueryInput>,
    ) -> String {
        SafeQueryGuard::new(self.factory.clone())
            .execute_safe_query(input)
            .await
            .to_json_string()
    }
}

#[tool_handler]
impl ServerHandler for PgService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pg-mcp-server".to_owned(),
                title: Some("PostgreSQL MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "PostgreSQL tools for exploring and querying one database.\n\
                \n\
                ## Workflow\n\
                1. Call `list_tables` to see the tables of a schema (default `public`)\n\
                2. Call `get_table_schema` before writing queries against a table\n\
                3. Use `execute_safe_query` for reads; it only accepts SELECT\n\
                4. Use `execute_query` for writes and DDL\n\
                \n\
                ## Parameters\n\
                `execute_query` binds `params` to $1, $2, ... in order. Strings are sent as text;\n\
                cast in SQL when the column has another type (e.g. `$1::uuid`, `$1::date`).\n\
                \n\
                ## Errors\n\
                Failures come back as `{\"error\": ..., \"status\": \"failed\"}`."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConnectionConfig;

    fn create_test_service() -> PgService {
        let config = ConnectionConfig::new("localhost", 5432, "app", "reader", "secret").unwrap();
        PgService::new(Arc::new(PgConnectionFactory::new(config)))
    }

    #[test]
    fn test_service_exposes_four_tools() {
        let service = create_test_service();
        let mut names: Vec<String> = service
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "execute_query",
                "execute_safe_query",
                "get_table_schema",
                "list_tables"
            ]
        );
    }

    #[test]
    fn test_server_info() {
        let service = create_test_service();
        let info = service.get_info();
        assert_eq!(info.server_info.name, "pg-mcp-server");
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("execute_safe_query"));
    }
}

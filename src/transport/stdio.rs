//! Stdio transport for the MCP server.
//!
//! This transport uses standard input/output for communication,
//! which is the standard mode for CLI-based MCP integrations.

use crate::db::PgConnectionFactory;
use crate::mcp::PgService;
use crate::transport::{Transport, TransportError, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::{info, warn};

/// Stdio transport implementation.
///
/// This transport reads JSON-RPC messages from stdin and writes
/// responses to stdout, following the MCP protocol specification.
pub struct StdioTransport {
    factory: Arc<PgConnectionFactory>,
}

impl StdioTransport {
    pub fn new(factory: Arc<PgConnectionFactory>) -> Self {
        Self { factory }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> Result<(), TransportError> {
        info!("Starting MCP server with stdio transport");

        let service = PgService::new(self.factory.clone());
        let running_service = service
            .serve(stdio())
            .await
            .map_err(|e| TransportError::serve(self.name(), e.to_string()))?;

        tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => {
                        info!("Stdio transport completed normally");
                        Ok(())
                    }
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        Err(TransportError::serve(self.name(), e.to_string()))
                    }
                }
            }
            _ = wait_for_signal() => {
                // Connections are per call, so nothing is left to close. A blocking
                // stdin read cannot be interrupted by select!, hence the hard exit.
                info!("Shutdown signal received, exiting process");
                std::process::exit(0)
            }
        }
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}

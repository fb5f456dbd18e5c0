//! Tool payload envelope.
//!
//! Every tool answers with either its success payload or an
//! `{"error": ..., "status": "failed"}` object, serialized as pretty JSON.

use crate::error::{DbError, DbResult};
use crate::models::query::ResponseStatus;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: ResponseStatus,
}

impl ErrorResponse {
    /// Create a failed response carrying the given message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: ResponseStatus::Failed,
        }
    }
}

impl From<DbError> for ErrorResponse {
    fn from(err: DbError) -> Self {
        Self::new(err.to_string())
    }
}

/// Outcome of one tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput<T> {
    Success(T),
    Failed(ErrorResponse),
}

impl<T: Serialize> ToolOutput<T> {
    /// Check if this output is an error payload.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Get the error message, if this output is an error payload.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(resp) => Some(&resp.error),
            Self::Success(_) => None,
        }
    }

    /// Render the payload as the pretty-printed JSON text returned to callers.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            // Only reachable if a row contains a value serde_json cannot encode.
            let fallback = ErrorResponse::new(format!("Failed to serialize response: {}", e));
            serde_json::to_string_pretty(&fallback).unwrap_or_default()
        })
    }
}

impl<T> From<DbResult<T>> for ToolOutput<T> {
    fn from(result: DbResult<T>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failed(err.into()),
        }
    }
}

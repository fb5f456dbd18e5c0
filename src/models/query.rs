//! Query-related data models.
//!
//! This module defines types for SQL query parameters and results.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A row as returned to the caller: column name to JSON value, in column order.
pub type JsonRow = serde_json::Map<String, JsonValue>;

/// A parameter value for parameterized queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryParam {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (stored as i64 for maximum range)
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
}

impl QueryParam {
    /// Get the type name of this parameter for debugging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }
}

/// Result of `execute_query`: rows for a SELECT, an affected-row count otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Select(SelectResult),
    Mutation(MutationResult),
}

impl QueryResult {
    /// Build a SELECT result; `row_count` always equals the number of rows.
    pub fn select(rows: Vec<JsonRow>) -> Self {
        Self::Select(SelectResult {
            statement_type: "SELECT".to_string(),
            row_count: rows.len(),
            results: rows,
        })
    }

    /// Build a mutation result from the statement verb and the affected-row token.
    pub fn mutation(verb: impl Into<String>, affected_rows: impl Into<String>) -> Self {
        Self::Mutation(MutationResult {
            statement_type: verb.into(),
            affected_rows: affected_rows.into(),
            status: ResponseStatus::Success,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectResult {
    #[serde(rename = "type")]
    pub statement_type: String,
    pub row_count: usize,
    pub results: Vec<JsonRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationResult {
    /// First word of the statement, uppercased (INSERT, UPDATE, ...)
    #[serde(rename = "type")]
    pub statement_type: String,
    /// Last token of the server's command tag, kept as text
    pub affected_rows: String,
    pub status: ResponseStatus,
}

/// Value of the `status` field in tool payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_param_deserialization() {
        let params: Vec<QueryParam> =
            serde_json::from_str(r#"[null, true, 42, 1.5, "Charlie"]"#).unwrap();
        assert_eq!(
            params,
            vec![
                QueryParam::Null,
                QueryParam::Bool(true),
                QueryParam::Int(42),
                QueryParam::Float(1.5),
                QueryParam::String("Charlie".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_param_type_name() {
        assert_eq!(QueryParam::Int(1).type_name(), "int");
        assert_eq!(QueryParam::Null.type_name(), "null");
    }

    #[test]
    fn test_select_result_shape() {
        let mut row = JsonRow::new();
        row.insert("id".to_string(), json!(1));
        row.insert("name".to_string(), json!("Alice"));

        let value = serde_json::to_value(QueryResult::select(vec![row])).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "SELECT",
                "row_count": 1,
                "results": [{"id": 1, "name": "Alice"}]
            })
        );
    }

    #[test]
    fn test_mutation_result_shape() {
        let value = serde_json::to_value(QueryResult::mutation("INSERT", "1")).unwrap();
        assert_eq!(
            value,
            json!({"type": "INSERT", "affected_rows": "1", "status": "success"})
        );
    }

    #[test]
    fn test_row_keeps_column_order() {
        let mut row = JsonRow::new();
        row.insert("zeta".to_string(), json!(1));
        row.insert("alpha".to_string(), json!(2));
        let text = serde_json::to_string(&row).unwrap();
        assert_eq!(text, r#"{"zeta":1,"alpha":2}"#);
    }
}

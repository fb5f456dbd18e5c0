//! Schema-related data models.
//!
//! This module defines types for catalog introspection results.

use serde::Serialize;
use std::collections::HashSet;

/// Base tables found in one schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableList {
    pub schema: String,
    pub tables: Vec<String>,
    pub count: usize,
}

impl TableList {
    /// Create a listing from names in catalog order, dropping repeats.
    pub fn new(schema: impl Into<String>, mut tables: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        tables.retain(|name| seen.insert(name.clone()));
        Self {
            schema: schema.into(),
            count: tables.len(),
            tables,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Catalog data type, e.g. `integer`, `character varying`
    #[serde(rename = "type")]
    pub data_type: String,
    pub nullable: bool,
    /// Default expression as reported by the catalog; `null` when there is none
    pub default: Option<String>,
    pub is_primary_key: bool,
    /// Only present for length-bounded types such as `varchar(255)`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
}

impl ColumnDescriptor {
    /// Create a new column descriptor.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
            default: None,
            is_primary_key: false,
            max_length: None,
        }
    }

    /// Set the default expression.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the character maximum length.
    pub fn with_max_length(mut self, max_length: i64) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKeyDescriptor {
    pub column: String,
    pub references_table: String,
    pub references_column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    pub schema: String,
    pub table: String,
    /// In ordinal position order
    pub columns: Vec<ColumnDescriptor>,
    /// In catalog order
    pub primary_keys: Vec<String>,
    /// In catalog order
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

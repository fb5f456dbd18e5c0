//! Schema introspection module.
//!
//! This module provides PostgreSQL catalog introspection over a single
//! [`DatabaseHandle`].
//!
//! # Architecture
//!
//! SQL queries are kept in the `queries` submodule. Catalog columns are cast to
//! `text`/`int4` in SQL so every value arrives as a plain scalar, whatever
//! domain type `information_schema` declares for it.

use crate::db::connection::DatabaseHandle;
use crate::error::{DbError, DbResult};
use crate::models::{
    ColumnDescriptor, ForeignKeyDescriptor, JsonRow, QueryParam, TableList, TableSchema,
};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

/// Schema inspector for database introspection.
pub struct SchemaInspector;

impl SchemaInspector {
    /// List the base tables of a schema. Views and foreign tables are excluded.
    pub async fn list_tables<H: DatabaseHandle>(conn: &mut H, schema: &str) -> DbResult<TableList> {
        let rows = conn
            .fetch(
                queries::LIST_TABLES,
                &[QueryParam::String(schema.to_string())],
            )
            .await?;

        let tables = rows
            .iter()
            .map(|row| text(row, "table_name"))
            .collect::<DbResult<Vec<_>>>()?;

        debug!(count = tables.len(), schema = schema, "Listed tables");
        Ok(TableList::new(schema, tables))
    }

    /// Describe a table: columns, primary key and foreign keys.
    ///
    /// An unknown table yields [`DbError::TableNotFound`] before the key
    /// lookups are attempted.
    pub async fn describe_table<H: DatabaseHandle>(
        conn: &mut H,
        table: &str,
        schema: &str,
    ) -> DbResult<TableSchema> {
        let mut columns = fetch_columns(conn, table, schema).await?;
        if columns.is_empty() {
            warn!(table = table, schema = schema, "Table not found");
            return Err(DbError::table_not_found(table, schema));
        }

        let primary_keys = fetch_primary_keys(conn, table, schema).await?;
        let foreign_keys = fetch_foreign_keys(conn, table, schema).await?;

        // Stable, so equal positions keep catalog order
        columns.sort_by_key(|(position, _)| *position);
        let columns = columns
            .into_iter()
            .map(|(_, mut col)| {
                col.is_primary_key = primary_keys.contains(&col.name);
                col
            })
            .collect::<Vec<_>>();

        debug!(
            table = table,
            schema = schema,
            columns = columns.len(),
            primary_keys = primary_keys.len(),
            foreign_keys = foreign_keys.len(),
            "Described table"
        );

        Ok(TableSchema {
            schema: schema.to_string(),
            table: table.to_string(),
            columns,
            primary_keys,
            foreign_keys,
        })
    }
}

// =============================================================================
// SQL Query Templates
// =============================================================================

mod queries {
    pub const LIST_TABLES: &str = r#"
SELECT table_name::text AS table_name
FROM information_schema.tables
WHERE table_schema = $1
  AND table_type = 'BASE TABLE'
ORDER BY table_name
"#;

    pub const DESCRIBE_COLUMNS: &str = r#"
SELECT
    column_name::text AS column_name,
    data_type::text AS data_type,
    character_maximum_length::int4 AS character_maximum_length,
    is_nullable::text AS is_nullable,
    column_default::text AS column_default,
    ordinal_position::int4 AS ordinal_position
FROM information_schema.columns
WHERE table_schema = $1
  AND table_name = $2
ORDER BY ordinal_position
"#;

    pub const DESCRIBE_PRIMARY_KEY: &str = r#"
SELECT a.attname::text AS column_name
FROM pg_index i
JOIN pg_attribute a
  ON a.attrelid = i.indrelid
 AND a.attnum = ANY(i.indkey)
WHERE i.indrelid = $1::regclass
  AND i.indisprimary
"#;

    pub const DESCRIBE_FOREIGN_KEYS: &str = r#"
SELECT
    kcu.column_name::text AS column_name,
    ccu.table_name::text AS foreign_table_name,
    ccu.column_name::text AS foreign_column_name
FROM information_schema.table_constraints tc
JOIN information_schema.key_column_usage kcu
  ON tc.constraint_name = kcu.constraint_name
 AND tc.table_schema = kcu.table_schema
JOIN information_schema.constraint_column_usage ccu
  ON ccu.constraint_name = tc.constraint_name
 AND ccu.table_schema = tc.table_schema
WHERE tc.constraint_type = 'FOREIGN KEY'
  AND tc.table_schema = $1
  AND tc.table_name = $2
"#;
}

async fn fetch_columns<H: DatabaseHandle>(
    conn: &mut H,
    table: &str,
    schema: &str,
) -> DbResult<Vec<(i64, ColumnDescriptor)>> {
    let rows = conn
        .fetch(
            queries::DESCRIBE_COLUMNS,
            &[
                QueryParam::String(schema.to_string()),
                QueryParam::String(table.to_string()),
            ],
        )
        .await?;

    rows.iter()
        .map(|row| -> DbResult<(i64, ColumnDescriptor)> {
            let name = text(row, "column_name")?;
            let data_type = text(row, "data_type")?;
            let nullable = text(row, "is_nullable")? == "YES";

            let mut col = ColumnDescriptor::new(name, data_type, nullable);
            if let Some(default) = opt_text(row, "column_default")? {
                col = col.with_default(default);
            }
            if let Some(max_length) = opt_i64(row, "character_maximum_length")? {
                col = col.with_max_length(max_length);
            }

            let position = opt_i64(row, "ordinal_position")?.unwrap_or(i64::MAX);
            Ok((position, col))
        })
        .collect()
}

async fn fetch_primary_keys<H: DatabaseHandle>(
    conn: &mut H,
    table: &str,
    schema: &str,
) -> DbResult<Vec<String>> {
    let rows = conn
        .fetch(
            queries::DESCRIBE_PRIMARY_KEY,
            &[QueryParam::String(qualified_name(schema, table))],
        )
        .await?;

    rows.iter().map(|row| text(row, "column_name")).collect()
}

async fn fetch_foreign_keys<H: DatabaseHandle>(
    conn: &mut H,
    table: &str,
    schema: &str,
) -> DbResult<Vec<ForeignKeyDescriptor>> {
    let rows = conn
        .fetch(
            queries::DESCRIBE_FOREIGN_KEYS,
            &[
                QueryParam::String(schema.to_string()),
                QueryParam::String(table.to_string()),
            ],
        )
        .await?;

    rows.iter()
        .map(|row| -> DbResult<ForeignKeyDescriptor> {
            Ok(ForeignKeyDescriptor {
                column: text(row, "column_name")?,
                references_table: text(row, "foreign_table_name")?,
                references_column: text(row, "foreign_column_name")?,
            })
        })
        .collect()
}

/// `schema.table` with both parts quoted, for use as a `regclass` literal.
pub fn qualified_name(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

// =============================================================================
// Row Accessors
// =============================================================================

fn opt_text(row: &JsonRow, column: &str) -> DbResult<Option<String>> {
    match row.get(column) {
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(JsonValue::Null) => Ok(None),
        Some(other) => Err(DbError::internal(format!(
            "Catalog column '{}' has unexpected value {}",
            column, other
        ))),
        None => Err(DbError::internal(format!(
            "Catalog column '{}' missing from result",
            column
        ))),
    }
}

fn text(row: &JsonRow, column: &str) -> DbResult<String> {
    opt_text(row, column)?
        .ok_or_else(|| DbError::internal(format!("Catalog column '{}' is null", column)))
}

fn opt_i64(row: &JsonRow, column: &str) -> DbResult<Option<i64>> {
    match row.get(column) {
        Some(JsonValue::Number(n)) => Ok(n.as_i64()),
        Some(JsonValue::Null) => Ok(None),
        Some(other) => Err(DbError::internal(format!(
            "Catalog column '{}' has unexpected value {}",
            column, other
        ))),
        None => Err(DbError::internal(format!(
            "Catalog column '{}' missing from result",
            column
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: JsonValue) -> JsonRow {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_qualified_name_quotes_parts() {
        assert_eq!(qualified_name("public", "users"), r#""public"."users""#);
        assert_eq!(qualified_name("app", "Order\"s"), r#""app"."Order""s""#);
    }

    #[test]
    fn test_row_accessors() {
        let r = row(json!({"name": "id", "len": 255, "default": null}));
        assert_eq!(text(&r, "name").unwrap(), "id");
        assert_eq!(opt_i64(&r, "len").unwrap(), Some(255));
        assert_eq!(opt_text(&r, "default").unwrap(), None);
        assert!(text(&r, "default").is_err());
        assert!(opt_text(&r, "missing").is_err());
        assert!(opt_i64(&r, "name").is_err());
    }
}

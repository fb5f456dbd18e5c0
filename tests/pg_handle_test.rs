//! Integration tests for `PgHandle` against a running PostgreSQL server.
//!
//! Set TEST_PG_DATABASE (plus TEST_PG_HOST, TEST_PG_PORT, TEST_PG_USER and
//! TEST_PG_PASSWORD as needed) to run these tests. Each test works on its own
//! connection and temporary tables, so they can run in parallel.

use pg_mcp_server::db::{ConnectionFactory, DatabaseHandle, PgConnectionFactory, PgHandle};
use pg_mcp_server::error::DbError;
use pg_mcp_server::models::{ConnectionConfig, JsonRow, QueryParam};
use pg_mcp_server::tools::{ExecuteSafeQueryInput, SafeQueryGuard};
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;

fn test_factory() -> Option<Arc<PgConnectionFactory>> {
    let database = match std::env::var("TEST_PG_DATABASE") {
        Ok(database) => database,
        Err(_) => {
            eprintln!("Skipping test: TEST_PG_DATABASE not set");
            return None;
        }
    };
    let env_or = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.into());

    let config = ConnectionConfig::new(
        env_or("TEST_PG_HOST", "localhost"),
        env_or("TEST_PG_PORT", "5432").parse().unwrap(),
        database,
        env_or("TEST_PG_USER", "postgres"),
        env_or("TEST_PG_PASSWORD", ""),
    )
    .unwrap();
    Some(Arc::new(PgConnectionFactory::new(config)))
}

async fn connect() -> Option<PgHandle> {
    let factory = test_factory()?;
    Some(factory.acquire().await.unwrap())
}

fn single_row(rows: Vec<JsonRow>) -> JsonValue {
    assert_eq!(rows.len(), 1);
    JsonValue::Object(rows.into_iter().next().unwrap())
}

const TYPED_SELECT: &str = r#"
SELECT
    '2024-05-01 09:30:00+00'::timestamptz AS ts,
    '2024-05-01 09:30:00'::timestamp AS local_ts,
    'infinity'::timestamp AS forever,
    '2024-05-01'::date AS day,
    '04:05:06+02'::timetz AS clock,
    '123e4567-e89b-12d3-a456-426614174000'::uuid AS id,
    '12.50'::numeric AS price,
    'NaN'::numeric AS not_a_number,
    '123456789012345678901234567890.123'::numeric AS huge,
    12.34::numeric::money AS cash,
    '1 day 02:00:00'::interval AS span,
    '\xdeadbeef'::bytea AS blob,
    'hello'::bytea AS text_blob,
    '10.0.0.1'::inet AS host,
    '10.0.0.0/24'::cidr AS subnet,
    '[1,10)'::int4range AS ids,
    'empty'::int4range AS nothing,
    '{"a": [1, 2]}'::jsonb AS doc,
    ARRAY['x', 'y']::text[] AS tags,
    NULL::int4 AS missing
"#;

fn expected_typed_row() -> JsonValue {
    json!({
        "ts": "2024-05-01 09:30:00+00:00",
        "local_ts": "2024-05-01 09:30:00",
        "forever": "infinity",
        "day": "2024-05-01",
        "clock": "04:05:06+02",
        "id": "123e4567-e89b-12d3-a456-426614174000",
        "price": "12.50",
        "not_a_number": "NaN",
        "huge": "123456789012345678901234567890.123",
        "cash": "12.34",
        "span": "1 day 02:00:00",
        "blob": "3q2+7w==",
        "text_blob": "hello",
        "host": "10.0.0.1",
        "subnet": "10.0.0.0/24",
        "ids": "[1,10)",
        "nothing": "empty",
        "doc": {"a": [1, 2]},
        "tags": ["x", "y"],
        "missing": null
    })
}

#[tokio::test]
async fn test_fetch_stringifies_non_json_scalars() {
    let Some(mut conn) = connect().await else {
        return;
    };

    let rows = conn.fetch(TYPED_SELECT, &[]).await.unwrap();
    conn.close().await;

    assert_eq!(single_row(rows), expected_typed_row());
}

#[tokio::test]
async fn test_fetch_with_params_matches_fetch_without() {
    let Some(mut conn) = connect().await else {
        return;
    };

    let with_params = format!("{TYPED_SELECT} WHERE $1::int4 = 1 AND $2::text = 'x'");
    let rows = conn
        .fetch(
            &with_params,
            &[QueryParam::Int(1), QueryParam::String("x".to_string())],
        )
        .await
        .unwrap();
    conn.close().await;

    assert_eq!(single_row(rows), expected_typed_row());
}

#[tokio::test]
async fn test_fetch_rejects_multiple_statements() {
    let Some(mut conn) = connect().await else {
        return;
    };

    conn.execute("CREATE TEMP TABLE victims (id int4)", &[])
        .await
        .unwrap();
    conn.execute("INSERT INTO victims VALUES (1), (2)", &[])
        .await
        .unwrap();

    let err = conn
        .fetch("SELECT 1; DELETE FROM victims", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Database { .. }), "{err:?}");
    assert!(err.to_string().contains("multiple commands"), "{err}");

    let rows = conn
        .fetch("SELECT count(*)::int4 AS c FROM victims", &[])
        .await
        .unwrap();
    conn.close().await;

    assert_eq!(single_row(rows), json!({"c": 2}));
}

#[tokio::test]
async fn test_safe_query_refuses_trailing_statement() {
    let Some(factory) = test_factory() else {
        return;
    };

    let guard = SafeQueryGuard::new(factory);
    let output = guard
        .execute_safe_query(ExecuteSafeQueryInput::new("SELECT 1; SELECT 2"))
        .await;

    assert!(output.is_failed());
    assert!(output.error().unwrap().contains("multiple commands"));
}

#[tokio::test]
async fn test_execute_reports_command_tags() {
    let Some(mut conn) = connect().await else {
        return;
    };

    let status = conn
        .execute("CREATE TEMP TABLE people (name text, active bool)", &[])
        .await
        .unwrap();
    assert_eq!(status, "CREATE TABLE");

    let status = conn
        .execute(
            "INSERT INTO people (name, active) VALUES ($1, $2)",
            &[QueryParam::String("Charlie".to_string()), QueryParam::Bool(false)],
        )
        .await
        .unwrap();
    assert_eq!(status, "INSERT 0 1");

    conn.execute("INSERT INTO people VALUES ('Dana', false)", &[])
        .await
        .unwrap();
    let status = conn
        .execute("UPDATE people SET active = true", &[])
        .await
        .unwrap();
    assert_eq!(status, "UPDATE 2");

    let rows = conn
        .fetch(
            "SELECT name FROM people WHERE active AND name = $1",
            &[QueryParam::String("Charlie".to_string())],
        )
        .await
        .unwrap();
    conn.close().await;

    assert_eq!(single_row(rows), json!({"name": "Charlie"}));
}

#[tokio::test]
async fn test_execute_without_params_runs_scripts() {
    let Some(mut conn) = connect().await else {
        return;
    };

    conn.execute(
        "CREATE TEMP TABLE a (id int4); CREATE TEMP TABLE b (id int4)",
        &[],
    )
    .await
    .unwrap();

    let rows = conn
        .fetch(
            r#"
SELECT count(*)::int4 AS c
FROM pg_tables
WHERE tablename IN ('a', 'b')
  AND schemaname LIKE 'pg_temp%'
"#,
            &[],
        )
        .await
        .unwrap();
    conn.close().await;

    assert_eq!(single_row(rows), json!({"c": 2}));
}

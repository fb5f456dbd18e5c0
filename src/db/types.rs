//! PostgreSQL value to JSON conversion.
//!
//! Type conversion uses a two-phase approach:
//! 1. `TypeCategory` classifies the column's PostgreSQL type name
//! 2. A decoder for that category extracts the value
//!
//! Reads always run as prepared statements, so values arrive in PostgreSQL's
//! binary format. Every category with no native JSON form is rendered the way
//! the server prints it as text (`1 day`, `10.0.0.1`, `[1,10)`, `NaN`). Types
//! with no decoder go through the raw fallback: printable bytes become text,
//! anything else base64. A row therefore always serializes, whatever types its
//! columns have.

use crate::models::JsonRow;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value as JsonValue;
use sqlx::postgres::types::{Oid, PgInterval, PgMoney, PgRange, PgTimeTz};
use sqlx::postgres::{PgRow, PgValueFormat};
use sqlx::types::ipnetwork::IpNetwork;
use sqlx::types::mac_address::MacAddress;
use sqlx::types::{BigDecimal, Uuid};
use sqlx::{Column, Decode, Postgres, Row, Type, TypeInfo, ValueRef};
use std::fmt::Write as _;
use std::ops::Bound;

/// Fractional digits of `money` in the common `frac_digits = 2` locales.
const MONEY_FRAC_DIGITS: u32 = 2;

/// Range flag bit set on the wire for `'empty'`.
const RANGE_EMPTY: u8 = 0x01;

const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

// =============================================================================
// Type Classification
// =============================================================================

/// Logical category for PostgreSQL column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Money,
    Boolean,
    Text,
    Binary,
    Json,
    Uuid,
    Timestamp,
    TimestampTz,
    Date,
    Time,
    TimeTz,
    Interval,
    Network,
    MacAddr,
    Range,
    TextArray,
    IntegerArray,
    Unknown,
}

/// Classify a PostgreSQL type name (as reported by sqlx) into a logical category.
pub fn categorize_type(type_name: &str) -> TypeCategory {
    match type_name.to_uppercase().as_str() {
        "INT2" | "INT4" | "INT8" | "OID" | "SMALLINT" | "INTEGER" | "BIGINT" => {
            TypeCategory::Integer
        }
        "FLOAT4" | "FLOAT8" | "REAL" | "DOUBLE PRECISION" => TypeCategory::Float,
        "NUMERIC" | "DECIMAL" => TypeCategory::Decimal,
        "MONEY" => TypeCategory::Money,
        "BOOL" | "BOOLEAN" => TypeCategory::Boolean,
        "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" | "UNKNOWN" => TypeCategory::Text,
        "BYTEA" => TypeCategory::Binary,
        "JSON" | "JSONB" => TypeCategory::Json,
        "UUID" => TypeCategory::Uuid,
        "TIMESTAMP" => TypeCategory::Timestamp,
        "TIMESTAMPTZ" => TypeCategory::TimestampTz,
        "DATE" => TypeCategory::Date,
        "TIME" => TypeCategory::Time,
        "TIMETZ" => TypeCategory::TimeTz,
        "INTERVAL" => TypeCategory::Interval,
        "INET" | "CIDR" => TypeCategory::Network,
        "MACADDR" => TypeCategory::MacAddr,
        "INT4RANGE" | "INT8RANGE" | "NUMRANGE" | "DATERANGE" | "TSRANGE" | "TSTZRANGE" => {
            TypeCategory::Range
        }
        "TEXT[]" | "VARCHAR[]" | "NAME[]" => TypeCategory::TextArray,
        "INT2[]" | "INT4[]" | "INT8[]" => TypeCategory::IntegerArray,
        _ => TypeCategory::Unknown,
    }
}

// =============================================================================
// Scalar Formatting
// =============================================================================

/// Convert a float to JSON; NaN and infinities become their text form.
pub fn float_to_json(v: f64) -> JsonValue {
    serde_json::Number::from_f64(v)
        .map(JsonValue::Number)
        .unwrap_or_else(|| JsonValue::String(v.to_string()))
}

/// Render a `timestamptz` the way PostgreSQL prints it, e.g. `2024-05-01 09:30:00+00:00`.
pub fn format_timestamptz(v: &DateTime<FixedOffset>) -> String {
    v.format("%Y-%m-%d %H:%M:%S%.f%:z").to_string()
}

/// Render a `timetz`, e.g. `04:05:06+02` or `04:05:06.5-05:30`.
pub fn format_timetz(time: &NaiveTime, offset: &FixedOffset) -> String {
    let mut out = time.format("%H:%M:%S%.f").to_string();
    let seconds = offset.local_minus_utc();
    let abs = seconds.unsigned_abs();
    let _ = write!(
        out,
        "{}{:02}",
        if seconds < 0 { '-' } else { '+' },
        abs / 3600
    );
    if abs % 3600 != 0 {
        let _ = write!(out, ":{:02}", (abs % 3600) / 60);
    }
    if abs % 60 != 0 {
        let _ = write!(out, ":{:02}", abs % 60);
    }
    out
}

/// Render an `interval` in PostgreSQL's default `postgres` style,
/// e.g. `1 year 2 mons 3 days 04:05:06`.
pub fn format_interval(v: &PgInterval) -> String {
    let mut out = String::new();
    // A positive field after a negative one carries an explicit '+'
    let mut is_before = false;

    let parts = [
        (i64::from(v.months / 12), "year"),
        (i64::from(v.months % 12), "mon"),
        (i64::from(v.days), "day"),
    ];
    for (value, unit) in parts {
        if value == 0 {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        let sign = if is_before && value > 0 { "+" } else { "" };
        let plural = if value != 1 { "s" } else { "" };
        let _ = write!(out, "{sign}{value} {unit}{plural}");
        is_before = value < 0;
    }

    if v.microseconds != 0 || out.is_empty() {
        if !out.is_empty() {
            out.push(' ');
        }
        let sign = if v.microseconds < 0 {
            "-"
        } else if is_before {
            "+"
        } else {
            ""
        };
        let us = v.microseconds.unsigned_abs();
        let _ = write!(
            out,
            "{sign}{:02}:{:02}:{:02}",
            us / 3_600_000_000,
            (us / 60_000_000) % 60,
            (us / 1_000_000) % 60
        );
        let frac = us % 1_000_000;
        if frac != 0 {
            let digits = format!("{frac:06}");
            let _ = write!(out, ".{}", digits.trim_end_matches('0'));
        }
    }

    out
}

/// Render an `inet`/`cidr`. `inet` host addresses drop the full-length prefix.
pub fn format_network(net: &IpNetwork, is_cidr: bool) -> String {
    let full_prefix = match net {
        IpNetwork::V4(_) => 32,
        IpNetwork::V6(_) => 128,
    };
    if !is_cidr && net.prefix() == full_prefix {
        net.ip().to_string()
    } else {
        net.to_string()
    }
}

/// Render a `macaddr` as lowercase colon-separated hex.
pub fn format_mac(mac: &MacAddress) -> String {
    mac.bytes()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Render a range in PostgreSQL's text form, e.g. `[1,10)` or `(,2024-01-01)`.
pub fn format_range<T>(range: PgRange<T>, render: impl Fn(T) -> String) -> String {
    let mut out = String::new();
    match range.start {
        Bound::Unbounded => out.push('('),
        Bound::Included(v) => {
            out.push('[');
            out.push_str(&quote_range_bound(render(v)));
        }
        Bound::Excluded(v) => {
            out.push('(');
            out.push_str(&quote_range_bound(render(v)));
        }
    }
    out.push(',');
    match range.end {
        Bound::Unbounded => out.push(')'),
        Bound::Included(v) => {
            out.push_str(&quote_range_bound(render(v)));
            out.push(']');
        }
        Bound::Excluded(v) => {
            out.push_str(&quote_range_bound(render(v)));
            out.push(')');
        }
    }
    out
}

fn quote_range_bound(text: String) -> String {
    let needs_quotes = text.is_empty()
        || text
            .chars()
            .any(|c| matches!(c, '"' | '\\' | '(' | ')' | '[' | ']' | ',') || c.is_whitespace());
    if !needs_quotes {
        return text;
    }
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            quoted.push(c);
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Decode binary data to JSON value.
///
/// Valid UTF-8 is returned as text, anything else as base64.
pub fn decode_binary_value(bytes: &[u8]) -> JsonValue {
    match std::str::from_utf8(bytes) {
        Ok(s) => JsonValue::String(s.to_string()),
        Err(_) => JsonValue::String(STANDARD.encode(bytes)),
    }
}

/// Decode the wire value of a type with no decoder.
///
/// Enum labels and other text-like payloads are printable UTF-8; packed
/// binary structures are not and stay base64.
pub fn decode_opaque_value(bytes: &[u8]) -> JsonValue {
    match std::str::from_utf8(bytes) {
        Ok(s) if !s.chars().any(|c| c.is_control() && !c.is_whitespace()) => {
            JsonValue::String(s.to_string())
        }
        _ => JsonValue::String(STANDARD.encode(bytes)),
    }
}

/// `NaN` and the infinities of a binary `numeric`, which no decimal type holds.
pub fn numeric_special(bytes: &[u8]) -> Option<&'static str> {
    let sign = u16::from_be_bytes([*bytes.get(4)?, *bytes.get(5)?]);
    match sign {
        NUMERIC_NAN => Some("NaN"),
        NUMERIC_PINF => Some("Infinity"),
        NUMERIC_NINF => Some("-Infinity"),
        _ => None,
    }
}

/// Display scale (digits after the point) of a binary `numeric`.
fn numeric_display_scale(bytes: &[u8]) -> Option<i64> {
    Some(i16::from_be_bytes([*bytes.get(6)?, *bytes.get(7)?]).into())
}

/// `infinity`/`-infinity` of a binary `timestamp`, `timestamptz` or `date`.
pub fn temporal_infinity(bytes: &[u8]) -> Option<&'static str> {
    match bytes.len() {
        8 => match i64::from_be_bytes(bytes.try_into().ok()?) {
            i64::MAX => Some("infinity"),
            i64::MIN => Some("-infinity"),
            _ => None,
        },
        4 => match i32::from_be_bytes(bytes.try_into().ok()?) {
            i32::MAX => Some("infinity"),
            i32::MIN => Some("-infinity"),
            _ => None,
        },
        _ => None,
    }
}

// =============================================================================
// Row to JSON Trait
// =============================================================================

/// Trait for converting database rows to JSON maps.
pub trait RowToJson {
    fn to_json_map(&self) -> JsonRow;
}

impl RowToJson for PgRow {
    fn to_json_map(&self) -> JsonRow {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let type_name = col.type_info().name();
                let value = decode_column(self, idx, type_name, categorize_type(type_name));
                (col.name().to_string(), value)
            })
            .collect()
    }
}

// =============================================================================
// Decoders
// =============================================================================

fn decode_column(row: &PgRow, idx: usize, type_name: &str, category: TypeCategory) -> JsonValue {
    match category {
        TypeCategory::Integer => decode_integer(row, idx, type_name),
        TypeCategory::Float => {
            if type_name.eq_ignore_ascii_case("FLOAT4") {
                decode_with::<f32>(row, idx, |v| float_to_json(v as f64))
            } else {
                decode_with::<f64>(row, idx, float_to_json)
            }
        }
        TypeCategory::Decimal => decode_numeric(row, idx),
        TypeCategory::Money => decode_with::<PgMoney>(row, idx, |v| {
            JsonValue::String(v.to_decimal(MONEY_FRAC_DIGITS).to_string())
        }),
        TypeCategory::Boolean => decode_with::<bool>(row, idx, JsonValue::Bool),
        TypeCategory::Text => decode_with::<String>(row, idx, JsonValue::String),
        TypeCategory::Binary => decode_with::<Vec<u8>>(row, idx, |v| decode_binary_value(&v)),
        TypeCategory::Json => decode_with::<JsonValue>(row, idx, |v| v),
        TypeCategory::Uuid => decode_with::<Uuid>(row, idx, |v| JsonValue::String(v.to_string())),
        TypeCategory::Timestamp => decode_temporal::<NaiveDateTime>(row, idx, |v| v.to_string()),
        TypeCategory::TimestampTz => {
            decode_temporal::<DateTime<FixedOffset>>(row, idx, |v| format_timestamptz(&v))
        }
        TypeCategory::Date => decode_temporal::<NaiveDate>(row, idx, |v| v.to_string()),
        TypeCategory::Time => {
            decode_with::<NaiveTime>(row, idx, |v| JsonValue::String(v.to_string()))
        }
        TypeCategory::TimeTz => decode_with::<PgTimeTz<NaiveTime, FixedOffset>>(row, idx, |v| {
            JsonValue::String(format_timetz(&v.time, &v.offset))
        }),
        TypeCategory::Interval => {
            decode_with::<PgInterval>(row, idx, |v| JsonValue::String(format_interval(&v)))
        }
        TypeCategory::Network => {
            let is_cidr = type_name.eq_ignore_ascii_case("CIDR");
            decode_with::<IpNetwork>(row, idx, |v| {
                JsonValue::String(format_network(&v, is_cidr))
            })
        }
        TypeCategory::MacAddr => {
            decode_with::<MacAddress>(row, idx, |v| JsonValue::String(format_mac(&v)))
        }
        TypeCategory::Range => decode_range(row, idx, type_name),
        TypeCategory::TextArray => decode_with::<Vec<String>>(row, idx, |v| {
            JsonValue::Array(v.into_iter().map(JsonValue::String).collect())
        }),
        TypeCategory::IntegerArray => decode_integer_array(row, idx, type_name),
        TypeCategory::Unknown => decode_raw(row, idx),
    }
}

/// Decode with a concrete Rust type, falling back to the raw value on mismatch.
fn decode_with<T>(row: &PgRow, idx: usize, to_json: impl FnOnce(T) -> JsonValue) -> JsonValue
where
    T: for<'r> Decode<'r, Postgres> + Type<Postgres>,
{
    match row.try_get::<Option<T>, _>(idx) {
        Ok(Some(v)) => to_json(v),
        Ok(None) => JsonValue::Null,
        Err(e) => {
            tracing::debug!(column = idx, error = %e, "Typed decode failed, using raw value");
            decode_raw(row, idx)
        }
    }
}

/// Binary bytes of a non-null value, if the server sent binary.
fn binary_bytes(row: &PgRow, idx: usize) -> Option<&[u8]> {
    let value = row.try_get_raw(idx).ok()?;
    if value.is_null() || value.format() != PgValueFormat::Binary {
        return None;
    }
    value.as_bytes().ok()
}

fn decode_numeric(row: &PgRow, idx: usize) -> JsonValue {
    let bytes = binary_bytes(row, idx);
    if let Some(special) = bytes.and_then(numeric_special) {
        return JsonValue::String(special.to_string());
    }

    // BigDecimal covers the full NUMERIC range; the wire scale restores trailing zeros
    decode_with::<BigDecimal>(row, idx, |v| {
        let v = match bytes.and_then(numeric_display_scale) {
            Some(scale) => v.with_scale(scale),
            None => v,
        };
        JsonValue::String(v.to_plain_string())
    })
}

/// Timestamps and dates, with `infinity` handled before chrono sees it.
fn decode_temporal<T>(row: &PgRow, idx: usize, render: impl FnOnce(T) -> String) -> JsonValue
where
    T: for<'r> Decode<'r, Postgres> + Type<Postgres>,
{
    if let Some(marker) = binary_bytes(row, idx).and_then(temporal_infinity) {
        return JsonValue::String(marker.to_string());
    }
    decode_with::<T>(row, idx, |v| JsonValue::String(render(v)))
}

fn decode_range(row: &PgRow, idx: usize, type_name: &str) -> JsonValue {
    // Empty ranges decode as (,) in sqlx; the flag byte tells them apart
    if binary_bytes(row, idx).is_some_and(|b| b.first().is_some_and(|f| f & RANGE_EMPTY != 0)) {
        return JsonValue::String("empty".to_string());
    }

    fn text<T>(render: impl Fn(T) -> String) -> impl FnOnce(PgRange<T>) -> JsonValue {
        move |range| JsonValue::String(format_range(range, render))
    }

    match type_name.to_uppercase().as_str() {
        "INT4RANGE" => decode_with::<PgRange<i32>>(row, idx, text(|v: i32| v.to_string())),
        "INT8RANGE" => decode_with::<PgRange<i64>>(row, idx, text(|v: i64| v.to_string())),
        "NUMRANGE" => decode_with::<PgRange<BigDecimal>>(
            row,
            idx,
            text(|v: BigDecimal| v.normalized().to_plain_string()),
        ),
        "DATERANGE" => {
            decode_with::<PgRange<NaiveDate>>(row, idx, text(|v: NaiveDate| v.to_string()))
        }
        "TSRANGE" => decode_with::<PgRange<NaiveDateTime>>(
            row,
            idx,
            text(|v: NaiveDateTime| v.to_string()),
        ),
        _ => decode_with::<PgRange<DateTime<FixedOffset>>>(
            row,
            idx,
            text(|v: DateTime<FixedOffset>| format_timestamptz(&v)),
        ),
    }
}

fn decode_integer(row: &PgRow, idx: usize, type_name: &str) -> JsonValue {
    // sqlx matches integer widths exactly, so pick the decoder by type name
    match type_name.to_uppercase().as_str() {
        "INT2" | "SMALLINT" => decode_with::<i16>(row, idx, |v| JsonValue::Number(v.into())),
        "INT4" | "INTEGER" => decode_with::<i32>(row, idx, |v| JsonValue::Number(v.into())),
        "OID" => decode_with::<Oid>(row, idx, |v| JsonValue::Number(v.0.into())),
        _ => decode_with::<i64>(row, idx, |v| JsonValue::Number(v.into())),
    }
}

fn decode_integer_array(row: &PgRow, idx: usize, type_name: &str) -> JsonValue {
    fn numbers<T: Into<serde_json::Number>>(values: Vec<T>) -> JsonValue {
        JsonValue::Array(
            values
                .into_iter()
                .map(|v| JsonValue::Number(v.into()))
                .collect(),
        )
    }

    match type_name.to_uppercase().as_str() {
        "INT2[]" => decode_with::<Vec<i16>>(row, idx, numbers),
        "INT4[]" => decode_with::<Vec<i32>>(row, idx, numbers),
        _ => decode_with::<Vec<i64>>(row, idx, numbers),
    }
}

/// Last-resort conversion from the value as it came off the wire.
fn decode_raw(row: &PgRow, idx: usize) -> JsonValue {
    let Ok(value) = row.try_get_raw(idx) else {
        return JsonValue::Null;
    };
    if value.is_null() {
        return JsonValue::Null;
    }

    match value.format() {
        PgValueFormat::Text => value
            .as_str()
            .map(|s| JsonValue::String(s.to_string()))
            .unwrap_or(JsonValue::Null),
        PgValueFormat::Binary => value
            .as_bytes()
            .map(decode_opaque_value)
            .unwrap_or(JsonValue::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_categorize_type_integer() {
        assert_eq!(categorize_type("INT4"), TypeCategory::Integer);
        assert_eq!(categorize_type("INT8"), TypeCategory::Integer);
        assert_eq!(categorize_type("int2"), TypeCategory::Integer);
        assert_eq!(categorize_type("OID"), TypeCategory::Integer);
    }

    #[test]
    fn test_categorize_type_temporal() {
        assert_eq!(categorize_type("TIMESTAMP"), TypeCategory::Timestamp);
        assert_eq!(categorize_type("TIMESTAMPTZ"), TypeCategory::TimestampTz);
        assert_eq!(categorize_type("DATE"), TypeCategory::Date);
        assert_eq!(categorize_type("TIME"), TypeCategory::Time);
        assert_eq!(categorize_type("TIMETZ"), TypeCategory::TimeTz);
        assert_eq!(categorize_type("INTERVAL"), TypeCategory::Interval);
    }

    #[test]
    fn test_categorize_type_misc() {
        assert_eq!(categorize_type("NUMERIC"), TypeCategory::Decimal);
        assert_eq!(categorize_type("JSONB"), TypeCategory::Json);
        assert_eq!(categorize_type("UUID"), TypeCategory::Uuid);
        assert_eq!(categorize_type("BPCHAR"), TypeCategory::Text);
        assert_eq!(categorize_type("TEXT[]"), TypeCategory::TextArray);
        assert_eq!(categorize_type("INT4[]"), TypeCategory::IntegerArray);
        assert_eq!(categorize_type("INET"), TypeCategory::Network);
        assert_eq!(categorize_type("CIDR"), TypeCategory::Network);
        assert_eq!(categorize_type("MONEY"), TypeCategory::Money);
        assert_eq!(categorize_type("TSTZRANGE"), TypeCategory::Range);
        assert_eq!(categorize_type("TSVECTOR"), TypeCategory::Unknown);
    }

    #[test]
    fn test_format_interval() {
        let interval = |months, days, microseconds| PgInterval {
            months,
            days,
            microseconds,
        };
        assert_eq!(format_interval(&interval(0, 1, 0)), "1 day");
        assert_eq!(format_interval(&interval(0, 0, 0)), "00:00:00");
        assert_eq!(
            format_interval(&interval(14, 3, 14_706_000_000)),
            "1 year 2 mons 3 days 04:05:06"
        );
        assert_eq!(format_interval(&interval(0, 0, 1_500_000)), "00:00:01.5");
        assert_eq!(
            format_interval(&interval(0, -1, -7_200_000_000)),
            "-1 days -02:00:00"
        );
        assert_eq!(
            format_interval(&interval(0, -1, 7_200_000_000)),
            "-1 days +02:00:00"
        );
        assert_eq!(format_interval(&interval(0, 0, 90_000_000_000)), "25:00:00");
    }

    #[test]
    fn test_format_timetz() {
        let time = NaiveTime::from_hms_opt(4, 5, 6).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_timetz(&time, &plus_two), "04:05:06+02");

        let minus_half = FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap();
        assert_eq!(format_timetz(&time, &minus_half), "04:05:06-05:30");
    }

    #[test]
    fn test_format_network() {
        use sqlx::types::ipnetwork::{Ipv4Network, Ipv6Network};

        let host = IpNetwork::V4(Ipv4Network::new([10, 0, 0, 1].into(), 32).unwrap());
        assert_eq!(format_network(&host, false), "10.0.0.1");
        assert_eq!(format_network(&host, true), "10.0.0.1/32");

        let subnet = IpNetwork::V4(Ipv4Network::new([10, 0, 0, 0].into(), 24).unwrap());
        assert_eq!(format_network(&subnet, false), "10.0.0.0/24");

        let v6 = IpNetwork::V6(Ipv6Network::new("::1".parse().unwrap(), 128).unwrap());
        assert_eq!(format_network(&v6, false), "::1");
    }

    #[test]
    fn test_format_mac() {
        let mac = MacAddress::new([0x08, 0x00, 0x2B, 0x01, 0x02, 0x03]);
        assert_eq!(format_mac(&mac), "08:00:2b:01:02:03");
    }

    #[test]
    fn test_format_range() {
        let ints = PgRange {
            start: Bound::Included(1),
            end: Bound::Excluded(10),
        };
        assert_eq!(format_range(ints, |v: i32| v.to_string()), "[1,10)");

        let open = PgRange::<i32> {
            start: Bound::Unbounded,
            end: Bound::Included(5),
        };
        assert_eq!(format_range(open, |v| v.to_string()), "(,5]");

        let stamps = PgRange {
            start: Bound::Included("2024-01-01 10:00:00"),
            end: Bound::Unbounded,
        };
        assert_eq!(
            format_range(stamps, |v: &str| v.to_string()),
            r#"["2024-01-01 10:00:00",)"#
        );
    }

    #[test]
    fn test_quote_range_bound_escapes() {
        assert_eq!(quote_range_bound("plain".to_string()), "plain");
        assert_eq!(quote_range_bound(String::new()), r#""""#);
        assert_eq!(quote_range_bound(r#"a"b"#.to_string()), r#""a""b""#);
    }

    #[test]
    fn test_numeric_special() {
        // ndigits, weight, sign, dscale
        assert_eq!(numeric_special(&[0, 0, 0, 0, 0xC0, 0, 0, 0]), Some("NaN"));
        assert_eq!(numeric_special(&[0, 0, 0, 0, 0xD0, 0, 0, 0]), Some("Infinity"));
        assert_eq!(numeric_special(&[0, 0, 0, 0, 0xF0, 0, 0, 0]), Some("-Infinity"));
        assert_eq!(numeric_special(&[0, 1, 0, 0, 0x40, 0, 0, 2, 0, 1]), None);
        assert_eq!(numeric_special(&[0, 1]), None);
        assert_eq!(numeric_display_scale(&[0, 1, 0, 0, 0, 0, 0, 2]), Some(2));
    }

    #[test]
    fn test_temporal_infinity() {
        assert_eq!(temporal_infinity(&i64::MAX.to_be_bytes()), Some("infinity"));
        assert_eq!(temporal_infinity(&i64::MIN.to_be_bytes()), Some("-infinity"));
        assert_eq!(temporal_infinity(&i32::MAX.to_be_bytes()), Some("infinity"));
        assert_eq!(temporal_infinity(&0i64.to_be_bytes()), None);
        assert_eq!(temporal_infinity(&[1, 2]), None);
    }

    #[test]
    fn test_decode_opaque_value() {
        assert_eq!(
            decode_opaque_value(b"happy"),
            JsonValue::String("happy".to_string())
        );
        assert_eq!(
            decode_opaque_value(&[0, 0, 0, 1]),
            JsonValue::String("AAAAAQ==".to_string())
        );
    }

    #[test]
    fn test_float_to_json() {
        assert_eq!(float_to_json(1.5), serde_json::json!(1.5));
        assert_eq!(float_to_json(f64::NAN), JsonValue::String("NaN".to_string()));
        assert_eq!(
            float_to_json(f64::INFINITY),
            JsonValue::String("inf".to_string())
        );
    }

    #[test]
    fn test_format_timestamptz() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let ts = offset.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(format_timestamptz(&ts), "2024-05-01 09:30:00+00:00");

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = offset.with_ymd_and_hms(2024, 5, 1, 11, 30, 0).unwrap();
        assert_eq!(format_timestamptz(&ts), "2024-05-01 11:30:00+02:00");
    }

    #[test]
    fn test_decode_binary_value_with_valid_utf8() {
        let result = decode_binary_value(b"hello world");
        assert_eq!(result, JsonValue::String("hello world".to_string()));
    }

    #[test]
    fn test_decode_binary_value_with_invalid_utf8() {
        let bytes: &[u8] = &[0xFF, 0xFE, 0x00, 0x01];
        assert_eq!(
            decode_binary_value(bytes),
            JsonValue::String("//4AAQ==".to_string())
        );
    }

    #[test]
    fn test_decode_binary_value_empty() {
        assert_eq!(decode_binary_value(&[]), JsonValue::String(String::new()));
    }
}

//! Bound parameter values and dialect placeholders.

use crate::sql::Dialect;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;
use std::fmt;

/// A single cell or bound parameter, independent of the driver in use.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(uuid::Uuid),
    Timestamp(DateTime<Utc>),
    Json(Value),
    /// A non-NULL cell whose database type has no decoding; carries the type name.
    Unsupported(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Short kind name used in scan error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::Bool(_) => "bool",
            SqlValue::Int(_) => "int",
            SqlValue::Float(_) => "float",
            SqlValue::Text(_) => "text",
            SqlValue::Bytes(_) => "bytes",
            SqlValue::Uuid(_) => "uuid",
            SqlValue::Timestamp(_) => "timestamp",
            SqlValue::Json(_) => "json",
            SqlValue::Unsupported(_) => "unsupported",
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(b) => write!(f, "{}", b),
            SqlValue::Int(n) => write!(f, "{}", n),
            SqlValue::Float(n) => write!(f, "{}", n),
            SqlValue::Text(s) => f.write_str(s),
            SqlValue::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            SqlValue::Uuid(u) => write!(f, "{}", u),
            SqlValue::Timestamp(t) => f.write_str(&t.to_rfc3339()),
            SqlValue::Json(v) => write!(f, "{}", v),
            SqlValue::Unsupported(name) => write!(f, "<{}>", name),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Int(n)
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        SqlValue::Bool(b)
    }
}

impl<'q> Encode<'q, Postgres> for SqlValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            SqlValue::Null => <Option<String> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            SqlValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            SqlValue::Int(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            SqlValue::Float(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            SqlValue::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
            SqlValue::Bytes(b) => <Vec<u8> as Encode<Postgres>>::encode_by_ref(b, buf)?,
            SqlValue::Uuid(u) => <uuid::Uuid as Encode<Postgres>>::encode_by_ref(u, buf)?,
            SqlValue::Timestamp(t) => <DateTime<Utc> as Encode<Postgres>>::encode_by_ref(t, buf)?,
            SqlValue::Json(v) => <serde_json::Value as Encode<Postgres>>::encode_by_ref(v, buf)?,
            SqlValue::Unsupported(name) => return Err(format!("cannot bind a value of type {}", name).into()),
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        let name = match self {
            SqlValue::Null | SqlValue::Text(_) | SqlValue::Unsupported(_) => "TEXT",
            SqlValue::Bool(_) => "BOOL",
            SqlValue::Int(_) => "INT8",
            SqlValue::Float(_) => "FLOAT8",
            SqlValue::Bytes(_) => "BYTEA",
            SqlValue::Uuid(_) => "UUID",
            SqlValue::Timestamp(_) => "TIMESTAMPTZ",
            SqlValue::Json(_) => "JSONB",
        };
        Some(PgTypeInfo::with_name(name))
    }
}

impl sqlx::Type<Postgres> for SqlValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }

    fn compatible(_ty: &PgTypeInfo) -> bool {
        true
    }
}

/// Placeholder for the bound parameter at `index` (0-based).
///
/// Numbered dialects render the 1-based position: index 0 is `$1` on Postgres
/// and `:1` on Oracle. All other dialects, `Unsupported` included, use `?`.
pub fn build_param(index: usize, dialect: Dialect) -> String {
    match dialect {
        Dialect::Postgres => format!("${}", index + 1),
        Dialect::Oracle => format!(":{}", index + 1),
        Dialect::MySql | Dialect::Mssql | Dialect::Unsupported => "?".to_string(),
    }
}

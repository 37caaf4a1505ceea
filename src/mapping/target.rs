//! Scan targets: destinations a cursor writes one cell into.

use crate::sql::SqlValue;
use chrono::{DateTime, Utc};

/// A writable destination for one column of the current row.
pub trait ScanTarget: Send {
    fn assign(&mut self, value: SqlValue) -> Result<(), String>;
}

/// Write-only sink for columns that have no bound field.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl ScanTarget for Discard {
    fn assign(&mut self, _value: SqlValue) -> Result<(), String> {
        Ok(())
    }
}

fn mismatch(target: &str, value: &SqlValue) -> String {
    match value {
        SqlValue::Unsupported(name) => format!("unsupported column type {}", name),
        other => format!("converting {} to {} is unsupported", other.kind(), target),
    }
}

impl ScanTarget for String {
    fn assign(&mut self, value: SqlValue) -> Result<(), String> {
        match value {
            SqlValue::Null | SqlValue::Json(_) | SqlValue::Unsupported(_) => Err(mismatch("String", &value)),
            SqlValue::Text(s) => {
                *self = s;
                Ok(())
            }
            other => {
                *self = other.to_string();
                Ok(())
            }
        }
    }
}

impl ScanTarget for i64 {
    fn assign(&mut self, value: SqlValue) -> Result<(), String> {
        *self = match value {
            SqlValue::Int(n) => n,
            SqlValue::Bool(b) => i64::from(b),
            SqlValue::Text(ref s) => s
                .trim()
                .parse()
                .map_err(|e| format!("parsing '{}' as i64: {}", s, e))?,
            other => return Err(mismatch("i64", &other)),
        };
        Ok(())
    }
}

impl ScanTarget for i32 {
    fn assign(&mut self, value: SqlValue) -> Result<(), String> {
        let mut wide = 0i64;
        wide.assign(value)?;
        *self = i32::try_from(wide).map_err(|_| format!("{} out of range for i32", wide))?;
        Ok(())
    }
}

impl ScanTarget for f64 {
    fn assign(&mut self, value: SqlValue) -> Result<(), String> {
        *self = match value {
            SqlValue::Float(n) => n,
            SqlValue::Int(n) => n as f64,
            SqlValue::Text(ref s) => s
                .trim()
                .parse()
                .map_err(|e| format!("parsing '{}' as f64: {}", s, e))?,
            other => return Err(mismatch("f64", &other)),
        };
        Ok(())
    }
}

impl ScanTarget for bool {
    fn assign(&mut self, value: SqlValue) -> Result<(), String> {
        *self = match value {
            SqlValue::Bool(b) => b,
            SqlValue::Int(n) => n != 0,
            SqlValue::Text(ref s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "t" | "true" => true,
                "0" | "f" | "false" => false,
                _ => return Err(format!("parsing '{}' as bool", s)),
            },
            other => return Err(mismatch("bool", &other)),
        };
        Ok(())
    }
}

impl ScanTarget for Vec<u8> {
    fn assign(&mut self, value: SqlValue) -> Result<(), String> {
        *self = match value {
            SqlValue::Bytes(b) => b,
            SqlValue::Text(s) => s.into_bytes(),
            other => return Err(mismatch("bytes", &other)),
        };
        Ok(())
    }
}

impl ScanTarget for uuid::Uuid {
    fn assign(&mut self, value: SqlValue) -> Result<(), String> {
        *self = match value {
            SqlValue::Uuid(u) => u,
            SqlValue::Text(ref s) => {
                uuid::Uuid::parse_str(s.trim()).map_err(|e| format!("parsing '{}' as uuid: {}", s, e))?
            }
            other => return Err(mismatch("Uuid", &other)),
        };
        Ok(())
    }
}

impl ScanTarget for DateTime<Utc> {
    fn assign(&mut self, value: SqlValue) -> Result<(), String> {
        *self = match value {
            SqlValue::Timestamp(t) => t,
            SqlValue::Text(ref s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| format!("parsing '{}' as timestamp: {}", s, e))?,
            other => return Err(mismatch("DateTime<Utc>", &other)),
        };
        Ok(())
    }
}

impl ScanTarget for serde_json::Value {
    fn assign(&mut self, value: SqlValue) -> Result<(), String> {
        *self = match value {
            SqlValue::Null => serde_json::Value::Null,
            SqlValue::Json(v) => v,
            SqlValue::Text(ref s) => {
                serde_json::from_str(s).map_err(|e| format!("parsing json: {}", e))?
            }
            SqlValue::Bool(b) => serde_json::Value::Bool(b),
            SqlValue::Int(n) => serde_json::Value::Number(n.into()),
            SqlValue::Unsupported(_) => return Err(mismatch("json", &value)),
            other => serde_json::Value::String(other.to_string()),
        };
        Ok(())
    }
}

impl<T: ScanTarget + Default> ScanTarget for Option<T> {
    fn assign(&mut self, value: SqlValue) -> Result<(), String> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        let mut inner = T::default();
        inner.assign(value)?;
        *self = Some(inner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_only_fits_options() {
        let mut s = String::new();
        assert!(s.assign(SqlValue::Null).is_err());

        let mut o: Option<String> = Some("x".into());
        o.assign(SqlValue::Null).unwrap();
        assert_eq!(o, None);
        o.assign(SqlValue::Text("y".into())).unwrap();
        assert_eq!(o.as_deref(), Some("y"));
    }

    #[test]
    fn text_converts_to_scalars() {
        let mut n = 0i64;
        n.assign(SqlValue::Text(" 17 ".into())).unwrap();
        assert_eq!(n, 17);
        assert!(n.assign(SqlValue::Text("seventeen".into())).is_err());

        let mut b = false;
        b.assign(SqlValue::Text("t".into())).unwrap();
        assert!(b);

        let mut s = String::new();
        s.assign(SqlValue::Int(5)).unwrap();
        assert_eq!(s, "5");
    }

    #[test]
    fn i32_rejects_overflow() {
        let mut n = 0i32;
        assert!(n.assign(SqlValue::Int(i64::MAX)).is_err());
        n.assign(SqlValue::Int(-3)).unwrap();
        assert_eq!(n, -3);
    }

    #[test]
    fn discard_accepts_anything() {
        let mut sink = Discard;
        assert!(sink.assign(SqlValue::Null).is_ok());
        assert!(sink.assign(SqlValue::Bytes(vec![1, 2])).is_ok());
        assert!(sink.assign(SqlValue::Unsupported("TSVECTOR".into())).is_ok());
    }

    #[test]
    fn undecodable_type_is_named_in_the_error() {
        let cell = || SqlValue::Unsupported("INTERVAL".into());

        let mut s = String::from("kept");
        assert_eq!(s.assign(cell()).unwrap_err(), "unsupported column type INTERVAL");
        assert_eq!(s, "kept");

        let mut o: Option<String> = Some("kept".into());
        assert_eq!(o.assign(cell()).unwrap_err(), "unsupported column type INTERVAL");

        let mut n = 0i64;
        assert_eq!(n.assign(cell()).unwrap_err(), "unsupported column type INTERVAL");

        let mut j = serde_json::Value::Null;
        assert!(j.assign(cell()).is_err());
    }
}

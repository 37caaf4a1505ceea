//! Database seam: connections that run a parameterized query and cursors over the result.

use crate::error::MapError;
use crate::mapping::ScanTarget;
use crate::sql::SqlValue;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::VecDeque;
use std::sync::Arc;

/// A live database handle.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Identity of the underlying driver, used for dialect resolution.
    fn driver_name(&self) -> &str;

    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Box<dyn RowCursor>, sqlx::Error>;
}

#[async_trait]
impl<T: Connection + ?Sized> Connection for Arc<T> {
    fn driver_name(&self) -> &str {
        (**self).driver_name()
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Box<dyn RowCursor>, sqlx::Error> {
        (**self).query(sql, params).await
    }
}

/// Sequential handle over a query's rows.
///
/// `advance` must return true before `scan` may be called; `scan` takes exactly
/// one target per column, in column order.
pub trait RowCursor: Send {
    fn columns(&self) -> Result<Vec<String>, MapError>;

    fn advance(&mut self) -> bool;

    fn scan(&mut self, targets: &mut [&mut dyn ScanTarget]) -> Result<(), MapError>;

    fn close(&mut self);
}

/// Cursor over rows already materialized in memory.
#[derive(Debug, Default)]
pub struct BufferedCursor {
    columns: Vec<String>,
    pending: VecDeque<Vec<SqlValue>>,
    current: Option<Vec<SqlValue>>,
    closed: bool,
}

impl BufferedCursor {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        BufferedCursor {
            columns,
            pending: rows.into(),
            current: None,
            closed: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl RowCursor for BufferedCursor {
    fn columns(&self) -> Result<Vec<String>, MapError> {
        if self.closed {
            return Err(MapError::Columns("cursor is closed".into()));
        }
        Ok(self.columns.clone())
    }

    fn advance(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.current = self.pending.pop_front();
        self.current.is_some()
    }

    fn scan(&mut self, targets: &mut [&mut dyn ScanTarget]) -> Result<(), MapError> {
        let row = self.current.take().ok_or(MapError::CursorClosed)?;
        if targets.len() != row.len() {
            return Err(MapError::Arity {
                columns: row.len(),
                targets: targets.len(),
            });
        }
        for ((target, value), column) in targets.iter_mut().zip(row).zip(&self.columns) {
            target.assign(value).map_err(|reason| MapError::Scan {
                column: column.clone(),
                reason,
            })?;
        }
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
        self.pending.clear();
        self.current = None;
    }
}

/// Owns a cursor and closes it when dropped, on every exit path.
pub struct CursorGuard {
    cursor: Box<dyn RowCursor>,
}

impl CursorGuard {
    pub fn new(cursor: Box<dyn RowCursor>) -> Self {
        CursorGuard { cursor }
    }

    pub fn cursor(&mut self) -> &mut dyn RowCursor {
        self.cursor.as_mut()
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        self.cursor.close();
    }
}

#[async_trait]
impl Connection for PgPool {
    fn driver_name(&self) -> &str {
        <sqlx::Postgres as sqlx::Database>::NAME
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Box<dyn RowCursor>, sqlx::Error> {
        use sqlx::{Column, Row};
        let mut query = sqlx::query(sql);
        for p in params {
            query = query.bind(p.clone());
        }
        let rows = query.fetch_all(self).await?;
        // Without a row there is nothing to name; callers see an empty column list.
        let columns: Vec<String> = rows
            .first()
            .map(|r| r.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let values = rows
            .iter()
            .map(|row| (0..row.len()).map(|i| cell_to_value(row, i)).collect())
            .collect();
        Ok(Box::new(BufferedCursor::new(columns, values)))
    }
}

fn cell_to_value(row: &sqlx::postgres::PgRow, idx: usize) -> SqlValue {
    use sqlx::{Row, TypeInfo, ValueRef};
    let type_name = match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return SqlValue::Null,
        Ok(raw) => raw.type_info().name().to_string(),
        Err(_) => "UNKNOWN".to_string(),
    };
    if let Ok(n) = row.try_get::<i16, _>(idx) {
        return SqlValue::Int(n.into());
    }
    if let Ok(n) = row.try_get::<i32, _>(idx) {
        return SqlValue::Int(n.into());
    }
    if let Ok(n) = row.try_get::<i64, _>(idx) {
        return SqlValue::Int(n);
    }
    if let Ok(n) = row.try_get::<f32, _>(idx) {
        return SqlValue::Float(n.into());
    }
    if let Ok(n) = row.try_get::<f64, _>(idx) {
        return SqlValue::Float(n);
    }
    if let Ok(b) = row.try_get::<bool, _>(idx) {
        return SqlValue::Bool(b);
    }
    if let Ok(u) = row.try_get::<uuid::Uuid, _>(idx) {
        return SqlValue::Uuid(u);
    }
    if let Ok(t) = row.try_get::<chrono::DateTime<chrono::Utc>, _>(idx) {
        return SqlValue::Timestamp(t);
    }
    if let Ok(t) = row.try_get::<chrono::NaiveDateTime, _>(idx) {
        return SqlValue::Timestamp(t.and_utc());
    }
    if let Ok(s) = row.try_get::<String, _>(idx) {
        return SqlValue::Text(s);
    }
    if let Ok(v) = row.try_get::<serde_json::Value, _>(idx) {
        return SqlValue::Json(v);
    }
    if let Ok(b) = row.try_get::<Vec<u8>, _>(idx) {
        return SqlValue::Bytes(b);
    }
    undecoded(&type_name)
}

/// A non-NULL cell none of the known decoders accept.
fn undecoded(type_name: &str) -> SqlValue {
    SqlValue::Unsupported(type_name.to_string())
}

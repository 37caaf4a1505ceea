//! Row scanner: binds cursor columns to record fields by name.

use crate::error::MapError;
use crate::mapping::{BindingMap, Discard, Record, ScanTarget};
use crate::store::RowCursor;
use serde::{Deserialize, Serialize};

/// What `scan_all` does with a row that fails to scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
    /// Drop the row, log it and keep going. Results may be partial.
    #[default]
    Skip,
    /// Stop and return the first row error.
    Abort,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub appended: usize,
    pub skipped: usize,
}

/// Populate `dest` from the current row.
///
/// Each column resolves through `bindings` to a field target; unmapped columns
/// and second occurrences of an already-bound field go to a [`Discard`] sink,
/// so the cursor always receives one target per column.
fn scan_row<T: Record>(
    cursor: &mut dyn RowCursor,
    dest: &mut T,
    bindings: &BindingMap,
    columns: &[String],
) -> Result<(), MapError> {
    let mut fields: Vec<Option<&mut dyn ScanTarget>> = dest.scan_targets().into_iter().map(Some).collect();
    let mut sinks: Vec<Discard> = vec![Discard; columns.len()];
    let mut targets: Vec<&mut dyn ScanTarget> = Vec::with_capacity(columns.len());
    for (column, sink) in columns.iter().zip(sinks.iter_mut()) {
        let field = bindings
            .get(column)
            .and_then(|idx| fields.get_mut(idx))
            .and_then(Option::take);
        match field {
            Some(target) => targets.push(target),
            None => targets.push(sink),
        }
    }
    cursor.scan(&mut targets)
}

/// Populate `dest` from the first row. Further rows are left unread.
pub fn scan_one<T: Record>(
    cursor: &mut dyn RowCursor,
    dest: &mut T,
    bindings: &BindingMap,
) -> Result<(), MapError> {
    let columns = cursor.columns()?;
    if !cursor.advance() {
        return Err(MapError::NoRows);
    }
    scan_row(cursor, dest, bindings, &columns)
}

/// Append one record per row until the cursor is exhausted.
///
/// Under [`RowErrorPolicy::Skip`] a row that fails to scan is dropped and the
/// scan continues; the relative order of the remaining rows is kept.
pub fn scan_all<T: Record>(
    cursor: &mut dyn RowCursor,
    dest: &mut Vec<T>,
    bindings: &BindingMap,
    policy: RowErrorPolicy,
) -> Result<ScanSummary, MapError> {
    let columns = cursor.columns()?;
    let mut summary = ScanSummary::default();
    let mut row_number = 0usize;
    while cursor.advance() {
        row_number += 1;
        let mut item = T::default();
        match scan_row(cursor, &mut item, bindings, &columns) {
            Ok(()) => {
                dest.push(item);
                summary.appended += 1;
            }
            Err(e) if policy == RowErrorPolicy::Skip => {
                tracing::warn!(row = row_number, error = %e, "dropping row that failed to scan");
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(summary)
}

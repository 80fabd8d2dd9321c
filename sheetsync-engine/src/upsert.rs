//! Key-based upsert — patch rows whose key matches, append the rest.

use sheetsync_client::Transport;
use sheetsync_core::{Record, StreamName, TableId};

use crate::api::WorkbookApi;
use crate::convert::convert_row;
use crate::error::SyncError;

/// Aggregate outcome of one batch's row reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Rows patched in place by primary-key match.
    pub updated: usize,
    /// Records appended via the bulk row call.
    pub appended: usize,
    /// Status of the bulk append, when one was issued. `None` means every
    /// record matched an existing row and no append call was made.
    pub append_status: Option<u16>,
}

/// Reconcile `records` against the table's existing rows.
///
/// Without a primary key this is a single bulk append. With one, each
/// existing row's key cell is matched against the pending records (first
/// match wins; strict value equality, no type coercion); matches are patched
/// at their remote index and removed from the pending list. Scanning stops
/// as soon as nothing is pending; leftovers go out in one bulk append.
pub fn upsert<T: Transport>(
    api: &WorkbookApi<'_, T>,
    stream: &StreamName,
    table_id: &TableId,
    columns: &[String],
    primary_key: Option<&str>,
    records: &[Record],
) -> Result<UpsertOutcome, SyncError> {
    let mut pending: Vec<Record> = records.to_vec();
    let mut updated = 0usize;

    if let Some(key) = primary_key {
        let key_index =
            columns
                .iter()
                .position(|c| c == key)
                .ok_or_else(|| SyncError::KeyColumnMissing {
                    key: key.to_owned(),
                    stream: stream.to_string(),
                })?;

        for row in api.list_rows(stream, table_id)? {
            let Some(key_val) = row.values.first().and_then(|cells| cells.get(key_index)) else {
                continue;
            };
            let Some(pos) = pending.iter().position(|r| r.get(key) == Some(key_val)) else {
                continue;
            };

            let record = pending.remove(pos);
            api.update_row(stream, table_id, row.index, convert_row(columns, &record))?;
            updated += 1;

            if pending.is_empty() {
                break;
            }
        }
    }

    if pending.is_empty() {
        return Ok(UpsertOutcome {
            updated,
            appended: 0,
            append_status: None,
        });
    }

    let rows: Vec<Vec<_>> = pending.iter().map(|r| convert_row(columns, r)).collect();
    let appended = rows.len();
    let response = api.append_rows(stream, table_id, rows)?;
    Ok(UpsertOutcome {
        updated,
        appended,
        append_status: Some(response.status),
    })
}

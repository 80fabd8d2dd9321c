//! Schema reconciliation — worksheet table and columns vs. the batch header.
//!
//! Column order is remote-authoritative: after any mutation (and even when
//! none occurred) the column list is re-read from the table and returned as
//! the canonical order. Column handling is additive-only; nothing here
//! removes, renames or reorders a column that already exists.

use sheetsync_client::Transport;
use sheetsync_core::{ColumnId, Record, StreamName, TableId};

use crate::api::WorkbookApi;
use crate::convert::column_letter;
use crate::error::SyncError;

/// Result of reconciliation: the adopted table and its canonical column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledSchema {
    pub table_id: TableId,
    pub columns: Vec<String>,
}

/// The batch header: the union of all records' field names, in first-seen
/// order.
pub fn batch_header(records: &[Record]) -> Vec<String> {
    let mut header: Vec<String> = Vec::new();
    for record in records {
        for field in record.keys() {
            if !header.iter().any(|h| h == field) {
                header.push(field.clone());
            }
        }
    }
    header
}

/// Ensure a table exists for `stream` and that its columns cover `header`.
///
/// - No table: create one sized `A1:<last-col><row_count>` with headers
///   disabled, then assign each created column its header name in order.
/// - Table present: adopt the first (warning when several exist) and add the
///   header fields it lacks, one additive call each.
///
/// Any transport failure aborts the whole flush; a partial column set is
/// never returned.
pub fn reconcile<T: Transport>(
    api: &WorkbookApi<'_, T>,
    stream: &StreamName,
    header: &[String],
    row_count: usize,
) -> Result<ReconciledSchema, SyncError> {
    let tables = api.list_tables(stream)?;

    let table_id = match tables.first() {
        None => {
            let address = format!(
                "{stream}!A1:{}{row_count}",
                column_letter(header.len().max(1))
            );
            let table_id = api.add_table(stream, &address)?;
            tracing::info!("added table {table_id} to worksheet '{stream}'");

            // The fresh table comes with placeholder column names; rename
            // them to the header, in header order.
            let columns = api.list_columns(stream, &table_id)?;
            for (column, name) in columns.iter().zip(header) {
                api.set_column_name(stream, &table_id, &ColumnId(column.id.clone()), name)?;
            }
            table_id
        }
        Some(first) => {
            if tables.len() > 1 {
                tracing::warn!(
                    "worksheet '{stream}' has {} tables; adopting the first ({})",
                    tables.len(),
                    first.id
                );
            }
            let table_id = TableId(first.id.clone());

            let existing: Vec<String> = api
                .list_columns(stream, &table_id)?
                .into_iter()
                .map(|c| c.name)
                .collect();
            for name in header.iter().filter(|h| !existing.contains(h)) {
                api.add_column(stream, &table_id, name)?;
                tracing::debug!("added column '{name}' to table {table_id}");
            }
            table_id
        }
    };

    // Mandatory re-read: serialization must follow the table's own order,
    // never the local header or insertion order.
    let columns = api
        .list_columns(stream, &table_id)?
        .into_iter()
        .map(|c| c.name)
        .collect();
    Ok(ReconciledSchema { table_id, columns })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(body: &str) -> Record {
        serde_json::from_str(body).expect("record")
    }

    #[test]
    fn header_is_union_in_first_seen_order() {
        let records = vec![
            record(r#"{"id": 1, "name": "a"}"#),
            record(r#"{"id": 2, "email": "b@x.com"}"#),
            record(r#"{"name": "c", "id": 3}"#),
        ];
        assert_eq!(batch_header(&records), vec!["id", "name", "email"]);
    }

    #[test]
    fn header_of_empty_batch_is_empty() {
        assert!(batch_header(&[]).is_empty());
    }
}

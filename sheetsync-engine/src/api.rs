//! Typed view of the workbook REST surface.
//!
//! Thin wrappers over [`Transport`]: each method issues one call against the
//! per-stream worksheet path and decodes the `{value: [...]}` envelope Graph
//! wraps collections in. No retry or recovery here — that lives in the
//! transport.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use sheetsync_client::{ApiResponse, Transport};
use sheetsync_core::{ColumnId, StreamName, TableId};

use crate::error::SyncError;

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ValueList<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorksheetEntry {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableEntry {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnEntry {
    pub id: String,
    pub name: String,
}

/// One existing table row: remote index plus a single-row values matrix.
#[derive(Debug, Clone, Deserialize)]
pub struct RowEntry {
    pub index: u64,
    pub values: Vec<Vec<Value>>,
}

// ---------------------------------------------------------------------------
// API
// ---------------------------------------------------------------------------

/// Workbook operations used by the reconciler, upsert engine and orchestrator.
pub struct WorkbookApi<'a, T: Transport> {
    transport: &'a T,
}

impl<'a, T: Transport> WorkbookApi<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    fn decode<D: DeserializeOwned>(endpoint: &str, response: ApiResponse) -> Result<D, SyncError> {
        serde_json::from_value(response.body).map_err(|e| SyncError::MalformedResponse {
            endpoint: endpoint.to_owned(),
            source: e,
        })
    }

    pub fn list_worksheets(&self) -> Result<Vec<WorksheetEntry>, SyncError> {
        let endpoint = "workbook/worksheets/";
        let response = self.transport.request("GET", endpoint, None)?;
        let list: ValueList<WorksheetEntry> = Self::decode(endpoint, response)?;
        Ok(list.value)
    }

    pub fn add_worksheet(&self, name: &str) -> Result<ApiResponse, SyncError> {
        let response =
            self.transport
                .request("POST", "workbook/worksheets/add", Some(&json!({ "name": name })))?;
        Ok(response)
    }

    pub fn list_tables(&self, stream: &StreamName) -> Result<Vec<TableEntry>, SyncError> {
        let endpoint = format!("workbook/worksheets/{stream}/tables");
        let response = self.transport.request("GET", &endpoint, None)?;
        let list: ValueList<TableEntry> = Self::decode(&endpoint, response)?;
        Ok(list.value)
    }

    /// Create a table over `address` with the header row disabled; column
    /// names are assigned separately via [`Self::set_column_name`].
    pub fn add_table(&self, stream: &StreamName, address: &str) -> Result<TableId, SyncError> {
        let endpoint = format!("workbook/worksheets/{stream}/tables/add");
        let response = self.transport.request(
            "POST",
            &endpoint,
            Some(&json!({ "address": address, "hasHeaders": false })),
        )?;

        #[derive(Debug, Deserialize)]
        struct Created {
            id: String,
        }
        let created: Created = Self::decode(&endpoint, response)?;
        Ok(TableId(created.id))
    }

    pub fn list_columns(
        &self,
        stream: &StreamName,
        table: &TableId,
    ) -> Result<Vec<ColumnEntry>, SyncError> {
        let endpoint = format!("workbook/worksheets/{stream}/tables/{table}/columns");
        let response = self.transport.request("GET", &endpoint, None)?;
        let list: ValueList<ColumnEntry> = Self::decode(&endpoint, response)?;
        Ok(list.value)
    }

    pub fn set_column_name(
        &self,
        stream: &StreamName,
        table: &TableId,
        column: &ColumnId,
        name: &str,
    ) -> Result<ApiResponse, SyncError> {
        let endpoint = format!("workbook/worksheets/{stream}/tables/{table}/columns/{column}");
        let response = self
            .transport
            .request("PATCH", &endpoint, Some(&json!({ "name": name })))?;
        Ok(response)
    }

    pub fn add_column(
        &self,
        stream: &StreamName,
        table: &TableId,
        name: &str,
    ) -> Result<ApiResponse, SyncError> {
        let endpoint = format!("workbook/worksheets/{stream}/tables/{table}/columns/add");
        let response = self
            .transport
            .request("POST", &endpoint, Some(&json!({ "name": name })))?;
        Ok(response)
    }

    pub fn list_rows(
        &self,
        stream: &StreamName,
        table: &TableId,
    ) -> Result<Vec<RowEntry>, SyncError> {
        let endpoint = format!("workbook/worksheets/{stream}/tables/{table}/rows");
        let response = self.transport.request("GET", &endpoint, None)?;
        let list: ValueList<RowEntry> = Self::decode(&endpoint, response)?;
        Ok(list.value)
    }

    /// Replace the values of one row, addressed by its remote index.
    pub fn update_row(
        &self,
        stream: &StreamName,
        table: &TableId,
        index: u64,
        values: Vec<Value>,
    ) -> Result<ApiResponse, SyncError> {
        let endpoint =
            format!("workbook/worksheets/{stream}/tables/{table}/rows/itemAt(index={index})");
        let response = self
            .transport
            .request("PATCH", &endpoint, Some(&json!({ "values": [values] })))?;
        Ok(response)
    }

    /// Append converted rows in one bulk call.
    pub fn append_rows(
        &self,
        stream: &StreamName,
        table: &TableId,
        rows: Vec<Vec<Value>>,
    ) -> Result<ApiResponse, SyncError> {
        let endpoint = format!("workbook/worksheets/{stream}/tables/{table}/rows");
        let response = self
            .transport
            .request("POST", &endpoint, Some(&json!({ "values": rows })))?;
        Ok(response)
    }
}

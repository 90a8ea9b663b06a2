//! Host table abstraction.
//!
//! The pipeline never touches storage directly. A host (spreadsheet, JSON
//! workbook, database) implements [`TableHost`] and the pipeline drives it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TableError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Structured location cells (`{location, lat?, lon?, cityname?}`).
    Location,
    Number,
    Text,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            FieldKind::Location => "location",
            FieldKind::Number => "number",
            FieldKind::Text => "text",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMeta {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub id: String,
    pub name: String,
    pub kind: FieldKind,
}

/// A record as returned by the host: cell values keyed by field id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// One page of records plus the cursor for the next page.
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    pub records: Vec<Record>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Field values to write to one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordUpdate {
    pub record_id: String,
    pub fields: Map<String, Value>,
}

#[async_trait]
pub trait TableHost: Send + Sync {
    async fn list_tables(&self) -> Result<Vec<TableMeta>, TableError>;

    /// Fields of `table_id` with the given kind.
    async fn fields_of_kind(
        &self,
        table_id: &str,
        kind: FieldKind,
    ) -> Result<Vec<FieldMeta>, TableError>;

    /// Fetches up to `page_size` records starting at `cursor` (`None` for the
    /// first page).
    async fn get_record_page(
        &self,
        table_id: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<RecordPage, TableError>;

    /// Writes all `updates` in one batched operation.
    async fn write_record_fields(
        &self,
        table_id: &str,
        updates: &[RecordUpdate],
    ) -> Result<(), TableError>;
}

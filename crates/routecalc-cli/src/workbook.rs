//! JSON workbook host.
//!
//! A workbook is a single JSON file:
//!
//! ```json
//! { "tables": [ {
//!     "id": "tbl1", "name": "Trips",
//!     "fields": [ { "id": "from", "name": "From", "type": "location" } ],
//!     "records": [ { "id": "rec1", "fields": { "from": { "location": "..." } } } ]
//! } ] }
//! ```
//!
//! Every batched write is saved back to the file before it is acknowledged.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use async_trait::async_trait;
use routecalc_batch::{
    FieldKind, FieldMeta, Record, RecordPage, RecordUpdate, TableError, TableHost, TableMeta,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkbookData {
    #[serde(default)]
    tables: Vec<WorkbookTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkbookTable {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    fields: Vec<WorkbookField>,
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkbookField {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: FieldKind,
}

pub(crate) struct Workbook {
    path: PathBuf,
    data: Mutex<WorkbookData>,
}

impl Workbook {
    pub(crate) fn open(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read workbook {}", path.display()))?;
        let data: WorkbookData = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse workbook {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            data: Mutex::new(data),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, WorkbookData>, TableError> {
        self.data
            .lock()
            .map_err(|_| TableError::Backend("workbook lock poisoned".to_string()))
    }

    /// Writes the workbook to a temporary sibling file, then renames it into
    /// place.
    fn save(&self, data: &WorkbookData) -> Result<(), TableError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let body = serde_json::to_vec_pretty(data)
            .map_err(|e| TableError::Backend(format!("failed to serialize workbook: {e}")))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| backend_io("create temporary workbook", &e))?;
        tmp.write_all(&body)
            .map_err(|e| backend_io("write temporary workbook", &e))?;
        tmp.persist(&self.path)
            .map_err(|e| backend_io("replace workbook", &e.error))?;
        Ok(())
    }
}

fn backend_io(action: &str, err: &std::io::Error) -> TableError {
    TableError::Backend(format!("failed to {action}: {err}"))
}

fn find_table<'d>(data: &'d WorkbookData, table_id: &str) -> Result<&'d WorkbookTable, TableError> {
    data.tables
        .iter()
        .find(|t| t.id == table_id)
        .ok_or_else(|| TableError::TableNotFound(table_id.to_string()))
}

#[async_trait]
impl TableHost for Workbook {
    async fn list_tables(&self) -> Result<Vec<TableMeta>, TableError> {
        let data = self.lock()?;
        Ok(data
            .tables
            .iter()
            .map(|t| TableMeta {
                id: t.id.clone(),
                name: t.name.clone(),
            })
            .collect())
    }

    async fn fields_of_kind(
        &self,
        table_id: &str,
        kind: FieldKind,
    ) -> Result<Vec<FieldMeta>, TableError> {
        let data = self.lock()?;
        let table = find_table(&data, table_id)?;
        Ok(table
            .fields
            .iter()
            .filter(|f| f.kind == kind)
            .map(|f| FieldMeta {
                id: f.id.clone(),
                name: f.name.clone(),
                kind: f.kind,
            })
            .collect())
    }

    async fn get_record_page(
        &self,
        table_id: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<RecordPage, TableError> {
        let data = self.lock()?;
        let table = find_table(&data, table_id)?;
        let start = match cursor {
            None => 0,
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| TableError::Backend(format!("invalid page cursor \"{c}\"")))?,
        };
        let total = table.records.len();
        let start = start.min(total);
        let end = start.saturating_add(page_size).min(total);
        let has_more = end < total;
        Ok(RecordPage {
            records: table.records[start..end].to_vec(),
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }

    async fn write_record_fields(
        &self,
        table_id: &str,
        updates: &[RecordUpdate],
    ) -> Result<(), TableError> {
        let mut data = self.lock()?;
        let mut next = data.clone();
        let table = next
            .tables
            .iter_mut()
            .find(|t| t.id == table_id)
            .ok_or_else(|| TableError::TableNotFound(table_id.to_string()))?;

        // Check everything first so a bad update leaves the batch unapplied.
        for update in updates {
            if !table.records.iter().any(|r| r.id == update.record_id) {
                return Err(TableError::Backend(format!(
                    "record \"{}\" not found in table \"{table_id}\"",
                    update.record_id
                )));
            }
            if let Some(field) = update
                .fields
                .keys()
                .find(|k| !table.fields.iter().any(|f| &f.id == *k))
            {
                return Err(TableError::FieldNotFound {
                    table: table_id.to_string(),
                    field: field.clone(),
                });
            }
        }

        for update in updates {
            if let Some(record) = table.records.iter_mut().find(|r| r.id == update.record_id) {
                for (field, value) in &update.fields {
                    record.fields.insert(field.clone(), value.clone());
                }
            }
        }

        // Memory only changes once the file on disk does.
        self.save(&next)?;
        *data = next;
        tracing::debug!(
            table = table_id,
            records = updates.len(),
            path = %self.path.display(),
            "workbook saved"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "workbook_test.rs"]
mod tests;

//! Shared fakes for pipeline integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use routecalc_amap::{AmapError, DistanceSource};
use routecalc_batch::{
    FieldKind, FieldMeta, Record, RecordPage, RecordUpdate, RunRequest, TableError, TableHost,
    TableMeta,
};
use routecalc_core::{DistanceResult, LocationValue, RoutingStrategy, TravelMode};
use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;

pub const TABLE: &str = "trips";

/// In-memory table with the fields `from`, `to` (location) and `km`, `min`
/// (number). Every batched write is recorded.
pub struct MemoryHost {
    pub records: Vec<Record>,
    pub writes: Mutex<Vec<Vec<RecordUpdate>>>,
    pub page_fetches: AtomicUsize,
    pub write_attempts: AtomicUsize,
    /// 1-based write attempt that fails with a backend error.
    pub fail_on_write: Option<usize>,
}

impl MemoryHost {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            writes: Mutex::new(Vec::new()),
            page_fetches: AtomicUsize::new(0),
            write_attempts: AtomicUsize::new(0),
            fail_on_write: None,
        }
    }

    pub fn writes(&self) -> Vec<Vec<RecordUpdate>> {
        self.writes.lock().unwrap().clone()
    }

    pub fn write_sizes(&self) -> Vec<usize> {
        self.writes().iter().map(Vec::len).collect()
    }
}

fn field(id: &str, kind: FieldKind) -> FieldMeta {
    FieldMeta {
        id: id.to_string(),
        name: id.to_string(),
        kind,
    }
}

#[async_trait]
impl TableHost for MemoryHost {
    async fn list_tables(&self) -> Result<Vec<TableMeta>, TableError> {
        Ok(vec![TableMeta {
            id: TABLE.to_string(),
            name: "Trips".to_string(),
        }])
    }

    async fn fields_of_kind(
        &self,
        table_id: &str,
        kind: FieldKind,
    ) -> Result<Vec<FieldMeta>, TableError> {
        if table_id != TABLE {
            return Err(TableError::TableNotFound(table_id.to_string()));
        }
        let all = [
            field("from", FieldKind::Location),
            field("to", FieldKind::Location),
            field("km", FieldKind::Number),
            field("min", FieldKind::Number),
        ];
        Ok(all.into_iter().filter(|f| f.kind == kind).collect())
    }

    async fn get_record_page(
        &self,
        _table_id: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<RecordPage, TableError> {
        self.page_fetches.fetch_add(1, Ordering::SeqCst);
        let start = cursor.map_or(0, |c| c.parse::<usize>().unwrap());
        let end = (start + page_size).min(self.records.len());
        let has_more = end < self.records.len();
        Ok(RecordPage {
            records: self.records[start..end].to_vec(),
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }

    async fn write_record_fields(
        &self,
        _table_id: &str,
        updates: &[RecordUpdate],
    ) -> Result<(), TableError> {
        let attempt = self.write_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_write == Some(attempt) {
            return Err(TableError::Backend("disk full".to_string()));
        }
        self.writes.lock().unwrap().push(updates.to_vec());
        Ok(())
    }
}

pub fn location(text: &str, lon: f64, lat: f64, city: &str) -> Value {
    json!({ "location": text, "lon": lon, "lat": lat, "cityname": city })
}

/// `n` records `rec1..=recN` with usable origin and destination cells.
pub fn trip_records(n: usize) -> Vec<Record> {
    (1..=n)
        .map(|i| {
            let mut fields = Map::new();
            fields.insert("from".into(), location("A", 116.4, 39.9, "Beijing"));
            fields.insert("to".into(), location("B", 116.5, 40.0, "Beijing"));
            Record {
                id: format!("rec{i}"),
                fields,
            }
        })
        .collect()
}

pub fn driving_request() -> RunRequest {
    RunRequest {
        table_id: TABLE.to_string(),
        origin_field: "from".to_string(),
        destination_field: "to".to_string(),
        mode: TravelMode::Driving,
        strategy: RoutingStrategy::new("32"),
        distance_field: Some("km".to_string()),
        duration_field: Some("min".to_string()),
    }
}

/// Returns a fixed result, optionally failing on chosen call numbers and
/// cancelling a token after a number of calls.
pub struct ScriptedSource {
    pub result: DistanceResult,
    pub calls: AtomicUsize,
    pub fail_on_call: Option<usize>,
    pub cancel_after: Option<(usize, CancellationToken)>,
    pub strategies: Mutex<Vec<Option<String>>>,
}

impl ScriptedSource {
    pub fn new(result: DistanceResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
            fail_on_call: None,
            cancel_after: None,
            strategies: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DistanceSource for ScriptedSource {
    async fn compute(
        &self,
        _origin: &LocationValue,
        _destination: &LocationValue,
        _mode: TravelMode,
        strategy: Option<&RoutingStrategy>,
    ) -> Result<DistanceResult, AmapError> {
        self.strategies
            .lock()
            .unwrap()
            .push(strategy.map(|s| s.code().to_string()));
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((after, token)) = &self.cancel_after {
            if call >= *after {
                token.cancel();
            }
        }
        if self.fail_on_call == Some(call) {
            return Err(AmapError::Provider {
                info: "SERVICE_NOT_AVAILABLE".to_string(),
                infocode: "10002".to_string(),
            });
        }
        Ok(self.result)
    }
}

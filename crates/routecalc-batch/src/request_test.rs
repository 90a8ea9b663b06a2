use async_trait::async_trait;

use super::*;
use crate::table::{FieldMeta, RecordPage, RecordUpdate, TableMeta};

struct SchemaHost;

fn field(id: &str, kind: FieldKind) -> FieldMeta {
    FieldMeta {
        id: id.to_string(),
        name: id.to_uppercase(),
        kind,
    }
}

#[async_trait]
impl TableHost for SchemaHost {
    async fn list_tables(&self) -> Result<Vec<TableMeta>, TableError> {
        Ok(vec![TableMeta {
            id: "trips".to_string(),
            name: "Trips".to_string(),
        }])
    }

    async fn fields_of_kind(
        &self,
        table_id: &str,
        kind: FieldKind,
    ) -> Result<Vec<FieldMeta>, TableError> {
        assert_eq!(table_id, "trips");
        let all = [
            field("from", FieldKind::Location),
            field("to", FieldKind::Location),
            field("km", FieldKind::Number),
            field("min", FieldKind::Number),
            field("note", FieldKind::Text),
        ];
        Ok(all.into_iter().filter(|f| f.kind == kind).collect())
    }

    async fn get_record_page(
        &self,
        _: &str,
        _: usize,
        _: Option<&str>,
    ) -> Result<RecordPage, TableError> {
        Ok(RecordPage::default())
    }

    async fn write_record_fields(&self, _: &str, _: &[RecordUpdate]) -> Result<(), TableError> {
        Ok(())
    }
}

fn request() -> RunRequest {
    RunRequest {
        table_id: "trips".to_string(),
        origin_field: "from".to_string(),
        destination_field: "to".to_string(),
        mode: TravelMode::Driving,
        strategy: RoutingStrategy::new("32"),
        distance_field: Some("km".to_string()),
        duration_field: Some("min".to_string()),
    }
}

fn form_error(req: &RunRequest) -> String {
    match req.check_form() {
        Err(BatchError::InvalidRequest(msg)) => msg,
        other => panic!("expected InvalidRequest, got: {other:?}"),
    }
}

#[test]
fn valid_form_passes() {
    assert!(request().check_form().is_ok());
}

#[test]
fn missing_table_or_fields_rejected() {
    let mut req = request();
    req.table_id = String::new();
    assert!(form_error(&req).contains("table"));

    let mut req = request();
    req.origin_field = String::new();
    assert!(form_error(&req).contains("origin"));

    let mut req = request();
    req.destination_field = String::new();
    assert!(form_error(&req).contains("destination"));
}

#[test]
fn no_output_field_rejected() {
    let mut req = request();
    req.distance_field = None;
    req.duration_field = None;
    assert!(form_error(&req).contains("at least one output field"));
}

#[test]
fn single_output_field_is_enough() {
    let mut req = request();
    req.duration_field = None;
    assert!(req.check_form().is_ok());
}

#[test]
fn same_origin_and_destination_rejected() {
    let mut req = request();
    req.destination_field = "from".to_string();
    assert!(form_error(&req).contains("different fields"));
}

#[test]
fn same_output_fields_rejected() {
    let mut req = request();
    req.duration_field = Some("km".to_string());
    assert!(form_error(&req).contains("distance and duration"));
}

#[test]
fn normalized_trims_and_blanks_to_none() {
    let mut req = request();
    req.table_id = " trips ".to_string();
    req.distance_field = Some("   ".to_string());
    let req = req.normalized();
    assert_eq!(req.table_id, "trips");
    assert!(req.distance_field.is_none());
    assert_eq!(req.duration_field.as_deref(), Some("min"));
}

#[test]
fn normalized_clears_strategy_for_walking() {
    let mut req = request();
    req.mode = TravelMode::Walking;
    assert!(req.normalized().strategy.is_none());

    let mut req = request();
    req.mode = TravelMode::Transit;
    assert_eq!(req.normalized().strategy.unwrap().code(), "32");
}

#[tokio::test]
async fn validate_accepts_well_typed_request() {
    let req = request().validate(&SchemaHost).await.unwrap();
    assert_eq!(req.origin_field, "from");
}

#[tokio::test]
async fn validate_rejects_unknown_table() {
    let mut req = request();
    req.table_id = "nope".to_string();
    let err = req.validate(&SchemaHost).await.unwrap_err();
    assert!(matches!(err, BatchError::Table(TableError::TableNotFound(ref t)) if t == "nope"));
}

#[tokio::test]
async fn validate_rejects_non_location_input() {
    let mut req = request();
    req.origin_field = "note".to_string();
    let err = req.validate(&SchemaHost).await.unwrap_err();
    assert!(
        matches!(err, BatchError::InvalidRequest(ref m) if m.contains("origin field \"note\"")),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn validate_rejects_non_number_output() {
    let mut req = request();
    req.duration_field = Some("to".to_string());
    let err = req.validate(&SchemaHost).await.unwrap_err();
    assert!(
        matches!(err, BatchError::InvalidRequest(ref m) if m.contains("duration output field")),
        "got: {err:?}"
    );
}

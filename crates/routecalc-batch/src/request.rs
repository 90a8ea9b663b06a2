//! Run parameters and their validation against the host table.

use routecalc_core::{RoutingStrategy, TravelMode};

use crate::error::{BatchError, TableError};
use crate::table::{FieldKind, TableHost};

/// What to compute and where to write it.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub table_id: String,
    /// Location field holding the origin.
    pub origin_field: String,
    /// Location field holding the destination.
    pub destination_field: String,
    pub mode: TravelMode,
    pub strategy: Option<RoutingStrategy>,
    /// Number field receiving kilometres.
    pub distance_field: Option<String>,
    /// Number field receiving minutes.
    pub duration_field: Option<String>,
}

impl RunRequest {
    /// Trims identifiers, turns blank optional fields into `None` and drops
    /// the strategy for modes that ignore it.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            table_id: self.table_id.trim().to_string(),
            origin_field: self.origin_field.trim().to_string(),
            destination_field: self.destination_field.trim().to_string(),
            mode: self.mode,
            strategy: RoutingStrategy::for_mode(self.strategy, self.mode),
            distance_field: non_blank(self.distance_field),
            duration_field: non_blank(self.duration_field),
        }
    }

    /// Checks the request on its own, without consulting the table.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidRequest`] describing the first problem.
    pub fn check_form(&self) -> Result<(), BatchError> {
        if self.table_id.is_empty() {
            return Err(invalid("no table selected"));
        }
        if self.origin_field.is_empty() {
            return Err(invalid("no origin field selected"));
        }
        if self.destination_field.is_empty() {
            return Err(invalid("no destination field selected"));
        }
        if self.origin_field == self.destination_field {
            return Err(invalid("origin and destination must be different fields"));
        }
        match (&self.distance_field, &self.duration_field) {
            (None, None) => Err(invalid(
                "select at least one output field (distance or duration)",
            )),
            (Some(d), Some(t)) if d == t => Err(invalid(
                "distance and duration must be written to different fields",
            )),
            _ => Ok(()),
        }
    }

    /// Normalizes the request and verifies it against `host`: the table must
    /// exist, inputs must be location fields and outputs number fields.
    ///
    /// # Errors
    ///
    /// - [`BatchError::InvalidRequest`] for form or field-kind problems.
    /// - [`BatchError::Table`] when the table is missing or the host fails.
    pub async fn validate<H: TableHost + ?Sized>(self, host: &H) -> Result<Self, BatchError> {
        let request = self.normalized();
        request.check_form()?;

        let tables = host.list_tables().await?;
        if !tables.iter().any(|t| t.id == request.table_id) {
            return Err(TableError::TableNotFound(request.table_id.clone()).into());
        }

        let locations = host
            .fields_of_kind(&request.table_id, FieldKind::Location)
            .await?;
        for (role, id) in [
            ("origin", &request.origin_field),
            ("destination", &request.destination_field),
        ] {
            if !locations.iter().any(|f| &f.id == id) {
                return Err(invalid(&format!(
                    "{role} field \"{id}\" is not a location field of table \"{}\"",
                    request.table_id
                )));
            }
        }

        let numbers = host
            .fields_of_kind(&request.table_id, FieldKind::Number)
            .await?;
        for (role, id) in [
            ("distance", request.distance_field.as_ref()),
            ("duration", request.duration_field.as_ref()),
        ] {
            let Some(id) = id else { continue };
            if !numbers.iter().any(|f| &f.id == id) {
                return Err(invalid(&format!(
                    "{role} output field \"{id}\" is not a number field of table \"{}\"",
                    request.table_id
                )));
            }
        }

        Ok(request)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(message: &str) -> BatchError {
    BatchError::InvalidRequest(message.to_string())
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;

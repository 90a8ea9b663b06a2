//! Location cell values and the normalized distance result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A geocoded cell value as stored by the host table.
///
/// Hosts may carry extra keys (`address`, `name`, `pname`, ...); only the four
/// fields below are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationValue {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cityname: Option<String>,
}

impl LocationValue {
    /// Reads a location from a raw cell.
    ///
    /// Returns `None` unless the cell is an object with a string `location`.
    /// Non-numeric `lat`/`lon` and non-string `cityname` are treated as absent.
    #[must_use]
    pub fn from_cell(cell: &Value) -> Option<Self> {
        let obj = cell.as_object()?;
        let location = obj.get("location")?.as_str()?.to_string();
        Some(Self {
            location,
            lat: obj.get("lat").and_then(Value::as_f64),
            lon: obj.get("lon").and_then(Value::as_f64),
            cityname: obj
                .get("cityname")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    /// A location is usable only when its text form is non-empty.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.location.trim().is_empty()
    }

    /// The provider query parameter: `"{lon},{lat}"` when both coordinates are
    /// present, otherwise the raw location text.
    #[must_use]
    pub fn request_param(&self) -> String {
        match (self.lon, self.lat) {
            (Some(lon), Some(lat)) => format!("{lon},{lat}"),
            _ => self.location.clone(),
        }
    }

    /// City name with surrounding whitespace removed; blank names are `None`.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.cityname
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Normalized provider result. Either field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    pub distance_km: Option<f64>,
    pub duration_min: Option<f64>,
}

impl DistanceResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distance_km.is_none() && self.duration_min.is_none()
    }

    /// Builds a result from provider units (meters, seconds).
    #[must_use]
    pub fn from_provider_units(meters: Option<f64>, seconds: Option<f64>) -> Self {
        Self {
            distance_km: meters.map(|m| m / 1000.0),
            duration_min: seconds.map(|s| s / 60.0),
        }
    }
}

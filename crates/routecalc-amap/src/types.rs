//! AMap response types.
//!
//! AMap encodes numbers as JSON strings (`"distance": "1234"`), occasionally
//! as JSON numbers, and renders absent values as `[]` or `""`. The lenient
//! deserializers below accept all three so a missing value becomes `None`
//! instead of a parse failure.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Status fields shared by every AMap response.
///
/// `status` is `"1"` on success. `infocode` is `"10000"` when the request
/// was fully served; `info` explains failures.
#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub info: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub infocode: String,
}

// ---------------------------------------------------------------------------
// v3 distance (direct)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DistanceResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub results: Vec<DistanceEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DistanceEntry {
    /// Meters.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: Option<f64>,
    /// Seconds.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
}

// ---------------------------------------------------------------------------
// v5 direction (driving / walking / bicycling)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PathResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default, deserialize_with = "object_or_none")]
    pub route: Option<PathRoute>,
}

#[derive(Debug, Deserialize)]
pub struct PathRoute {
    #[serde(default, deserialize_with = "list_or_empty")]
    pub paths: Vec<RoutePath>,
}

#[derive(Debug, Deserialize)]
pub struct RoutePath {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
    /// Present when the request carried `show_fields=cost`.
    #[serde(default, deserialize_with = "object_or_none")]
    pub cost: Option<RouteCost>,
}

#[derive(Debug, Deserialize)]
pub struct RouteCost {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
}

// ---------------------------------------------------------------------------
// v5 transit/integrated
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct TransitResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default, deserialize_with = "object_or_none")]
    pub route: Option<TransitRoute>,
}

#[derive(Debug, Deserialize)]
pub struct TransitRoute {
    #[serde(default, deserialize_with = "list_or_empty")]
    pub transits: Vec<TransitPlan>,
}

#[derive(Debug, Deserialize)]
pub struct TransitPlan {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "object_or_none")]
    pub cost: Option<RouteCost>,
}

// ---------------------------------------------------------------------------
// v3 geocode (citycode lookup)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default, deserialize_with = "list_or_empty")]
    pub geocodes: Vec<Geocode>,
}

#[derive(Debug, Deserialize)]
pub struct Geocode {
    /// A string on success; `[]` when the provider has no code for the match.
    #[serde(default)]
    pub citycode: Value,
}

impl Geocode {
    /// The city-code, if the provider returned a non-empty string.
    #[must_use]
    pub fn citycode(&self) -> Option<&str> {
        self.citycode
            .as_str()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Lenient field deserializers
// ---------------------------------------------------------------------------

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn object_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value)
            .map(Some)
            .map_err(de::Error::custom),
        _ => Ok(None),
    }
}

fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Array(_)) => serde_json::from_value(value).map_err(de::Error::custom),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numbers_encoded_as_strings_are_parsed() {
        let parsed: PathResponse = serde_json::from_value(json!({
            "status": "1",
            "info": "OK",
            "infocode": "10000",
            "route": { "paths": [{ "distance": "5230", "cost": { "duration": "780" } }] }
        }))
        .unwrap();
        let path = &parsed.route.unwrap().paths[0];
        assert_eq!(path.distance, Some(5230.0));
        assert_eq!(path.cost.as_ref().unwrap().duration, Some(780.0));
    }

    #[test]
    fn empty_array_placeholders_become_none() {
        let parsed: PathResponse = serde_json::from_value(json!({
            "status": "1",
            "infocode": "10000",
            "route": { "paths": [{ "distance": [], "cost": [] }] }
        }))
        .unwrap();
        let path = &parsed.route.unwrap().paths[0];
        assert!(path.distance.is_none());
        assert!(path.cost.is_none());
    }

    #[test]
    fn numeric_status_is_read_as_string() {
        let parsed: DistanceResponse =
            serde_json::from_value(json!({ "status": 1, "infocode": 10000 })).unwrap();
        assert_eq!(parsed.envelope.status, "1");
        assert_eq!(parsed.envelope.infocode, "10000");
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn geocode_with_array_citycode_has_no_code() {
        let parsed: GeocodeResponse = serde_json::from_value(json!({
            "status": "1",
            "infocode": "10000",
            "geocodes": [{ "citycode": [] }]
        }))
        .unwrap();
        assert!(parsed.geocodes[0].citycode().is_none());
    }
}

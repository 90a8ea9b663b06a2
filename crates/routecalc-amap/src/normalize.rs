//! Reduction of the per-mode AMap payloads to one [`DistanceResult`].
//!
//! Path-finding and transit responses use a two-tier check: `status` must be
//! `"1"` AND `infocode` must be `"10000"`. The direct-distance endpoint only
//! reports `status` and is judged on that plus a non-empty result list.

use routecalc_core::{DistanceResult, TravelMode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AmapError;
use crate::types::{DistanceResponse, Envelope, PathResponse, TransitResponse};

pub const SUCCESS_STATUS: &str = "1";
pub const OK_INFOCODE: &str = "10000";
/// `ROUTE_FAIL`: the provider found no connected route between the points.
pub const NO_ROUTE_INFOCODE: &str = "20802";

/// A provider payload tagged with the schema it was parsed as.
#[derive(Debug)]
pub enum ModeResponse {
    Direct(DistanceResponse),
    Path(PathResponse),
    Transit(TransitResponse),
}

impl ModeResponse {
    /// Parses `raw` with the schema used by `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`AmapError::Deserialize`] if the payload does not match.
    pub fn parse(mode: TravelMode, raw: Value) -> Result<Self, AmapError> {
        match mode {
            TravelMode::Direct => parse_as(mode, raw).map(ModeResponse::Direct),
            TravelMode::Driving | TravelMode::Walking | TravelMode::Bicycling => {
                parse_as(mode, raw).map(ModeResponse::Path)
            }
            TravelMode::Transit => parse_as(mode, raw).map(ModeResponse::Transit),
        }
    }

    /// Applies the schema's success rules and converts units.
    ///
    /// # Errors
    ///
    /// Returns [`AmapError::Provider`] when the provider reports failure.
    pub fn into_result(self) -> Result<DistanceResult, AmapError> {
        match self {
            ModeResponse::Direct(resp) => normalize_direct(resp),
            ModeResponse::Path(resp) => normalize_path(resp),
            ModeResponse::Transit(resp) => normalize_transit(resp),
        }
    }
}

/// Parses and normalizes a raw payload for `mode`.
///
/// An empty route list or the no-route infocode yields an empty result rather
/// than an error; callers distinguish "nothing to write" from failure.
///
/// # Errors
///
/// - [`AmapError::Provider`] when the provider reports failure.
/// - [`AmapError::Deserialize`] when the payload does not match the schema.
pub fn normalize(mode: TravelMode, raw: Value) -> Result<DistanceResult, AmapError> {
    ModeResponse::parse(mode, raw)?.into_result()
}

fn parse_as<T: DeserializeOwned>(mode: TravelMode, raw: Value) -> Result<T, AmapError> {
    serde_json::from_value(raw).map_err(|source| AmapError::Deserialize {
        context: format!("{mode} response"),
        source,
    })
}

fn normalize_direct(resp: DistanceResponse) -> Result<DistanceResult, AmapError> {
    if resp.envelope.status != SUCCESS_STATUS {
        return Err(provider_error(&resp.envelope));
    }
    let Some(first) = resp.results.first() else {
        return Err(AmapError::Provider {
            info: "no distance results returned".to_string(),
            infocode: resp.envelope.infocode,
        });
    };
    Ok(DistanceResult::from_provider_units(
        first.distance,
        first.duration,
    ))
}

fn normalize_path(resp: PathResponse) -> Result<DistanceResult, AmapError> {
    if !passes_two_tier(&resp.envelope)? {
        return Ok(DistanceResult::default());
    }
    let Some(path) = resp.route.and_then(|r| r.paths.into_iter().next()) else {
        tracing::debug!("path response carried no paths");
        return Ok(DistanceResult::default());
    };
    let seconds = path.cost.and_then(|c| c.duration).or(path.duration);
    Ok(DistanceResult::from_provider_units(path.distance, seconds))
}

fn normalize_transit(resp: TransitResponse) -> Result<DistanceResult, AmapError> {
    if !passes_two_tier(&resp.envelope)? {
        return Ok(DistanceResult::default());
    }
    let Some(plan) = resp.route.and_then(|r| r.transits.into_iter().next()) else {
        tracing::debug!("transit response carried no transit plans");
        return Ok(DistanceResult::default());
    };
    let seconds = plan.cost.and_then(|c| c.duration).or(plan.duration);
    Ok(DistanceResult::from_provider_units(plan.distance, seconds))
}

/// `Ok(true)` when the response is usable, `Ok(false)` for the soft no-route
/// condition, `Err` for any other failure.
fn passes_two_tier(envelope: &Envelope) -> Result<bool, AmapError> {
    if envelope.infocode == NO_ROUTE_INFOCODE {
        tracing::debug!(info = %envelope.info, "provider reported no route");
        return Ok(false);
    }
    if envelope.status != SUCCESS_STATUS || envelope.infocode != OK_INFOCODE {
        return Err(provider_error(envelope));
    }
    Ok(true)
}

fn provider_error(envelope: &Envelope) -> AmapError {
    let info = if envelope.info.is_empty() {
        "unknown error".to_string()
    } else {
        envelope.info.clone()
    };
    AmapError::Provider {
        info,
        infocode: envelope.infocode.clone(),
    }
}

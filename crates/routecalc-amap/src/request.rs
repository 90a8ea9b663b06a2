//! Mode-specific request construction.
//!
//! | mode      | endpoint                            | strategy | `show_fields=cost` |
//! |-----------|-------------------------------------|----------|--------------------|
//! | direct    | `v3/distance` (`type=0`)            | no       | no                 |
//! | driving   | `v5/direction/driving`              | optional | yes                |
//! | walking   | `v5/direction/walking`              | no       | yes                |
//! | bicycling | `v5/direction/bicycling`            | no       | yes                |
//! | transit   | `v5/direction/transit/integrated`   | optional | yes                |
//!
//! Transit additionally needs `city1`/`city2` city-codes, resolved from the
//! records' city names through a [`CitycodeResolver`].

use std::fmt;

use reqwest::Url;
use routecalc_core::{RoutingStrategy, TravelMode};

use crate::citycode::CitycodeResolver;
use crate::client::{redact_key, AmapClient};
use crate::error::AmapError;

/// Inputs for one route request. `origin`/`destination` are already in
/// parameter form (`"lon,lat"` or address text).
#[derive(Debug, Clone, Copy)]
pub struct RouteQuery<'a> {
    pub origin: &'a str,
    pub destination: &'a str,
    pub origin_city: Option<&'a str>,
    pub destination_city: Option<&'a str>,
    pub mode: TravelMode,
    pub strategy: Option<&'a RoutingStrategy>,
}

/// A fully built provider request.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub mode: TravelMode,
    pub url: Url,
}

impl RequestDescriptor {
    /// The request URL with the API key masked.
    #[must_use]
    pub fn redacted(&self) -> String {
        redact_key(&self.url)
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mode, self.redacted())
    }
}

/// Builds the provider request for `query`.
///
/// Only transit performs network calls (two concurrent city-code lookups).
///
/// # Errors
///
/// - [`AmapError::CitycodeResolution`] when a transit city name is blank or
///   cannot be resolved to a city-code.
/// - [`AmapError::InvalidBaseUrl`] if the endpoint URL cannot be built.
pub async fn build_request(
    client: &AmapClient,
    query: &RouteQuery<'_>,
    resolver: &CitycodeResolver<'_>,
) -> Result<RequestDescriptor, AmapError> {
    let key = client.api_key();
    let strategy = query
        .strategy
        .filter(|_| query.mode.accepts_strategy())
        .map(RoutingStrategy::code);

    let url = match query.mode {
        TravelMode::Direct => client.build_url(
            "v3/distance",
            &[
                ("origins", query.origin),
                ("destination", query.destination),
                ("type", "0"),
                ("key", key),
            ],
        )?,
        TravelMode::Driving | TravelMode::Walking | TravelMode::Bicycling => {
            let path = format!("v5/direction/{}", query.mode);
            let mut params = vec![
                ("origin", query.origin),
                ("destination", query.destination),
                ("key", key),
                ("show_fields", "cost"),
            ];
            if let Some(code) = strategy {
                params.push(("strategy", code));
            }
            client.build_url(&path, &params)?
        }
        TravelMode::Transit => {
            let (city1, city2) = resolve_transit_cities(query, resolver).await?;
            let mut params = vec![
                ("origin", query.origin),
                ("destination", query.destination),
                ("city1", city1.as_str()),
                ("city2", city2.as_str()),
                ("key", key),
                ("show_fields", "cost"),
            ];
            if let Some(code) = strategy {
                params.push(("strategy", code));
            }
            client.build_url("v5/direction/transit/integrated", &params)?
        }
    };

    Ok(RequestDescriptor {
        mode: query.mode,
        url,
    })
}

async fn resolve_transit_cities(
    query: &RouteQuery<'_>,
    resolver: &CitycodeResolver<'_>,
) -> Result<(String, String), AmapError> {
    let origin_city = non_blank(query.origin_city);
    let destination_city = non_blank(query.destination_city);

    let (Some(origin_city), Some(destination_city)) = (origin_city, destination_city) else {
        let mut blank = Vec::new();
        if origin_city.is_none() {
            blank.push("origin city");
        }
        if destination_city.is_none() {
            blank.push("destination city");
        }
        return Err(AmapError::CitycodeResolution(format!(
            "transit mode requires origin and destination city names; blank: {}",
            blank.join(", ")
        )));
    };

    let (city1, city2) = tokio::join!(
        resolver.resolve(origin_city),
        resolver.resolve(destination_city)
    );

    match (city1, city2) {
        (Some(c1), Some(c2)) => Ok((c1, c2)),
        (c1, c2) => {
            let mut unresolved = Vec::new();
            if c1.is_none() {
                unresolved.push(format!("origin city \"{origin_city}\""));
            }
            if c2.is_none() {
                unresolved.push(format!("destination city \"{destination_city}\""));
            }
            Err(AmapError::CitycodeResolution(format!(
                "no city-code found for {}",
                unresolved.join(" and ")
            )))
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

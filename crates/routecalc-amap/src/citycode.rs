//! City name to city-code resolution for transit requests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::client::AmapClient;
use crate::error::AmapError;
use crate::normalize::{OK_INFOCODE, SUCCESS_STATUS};
use crate::types::GeocodeResponse;

/// Resolves city names to AMap city-codes via the geocoding endpoint.
///
/// Successful lookups are memoized for the resolver's lifetime, which is one
/// batch run. Failures are never cached so a later record can retry.
pub struct CitycodeResolver<'a> {
    client: &'a AmapClient,
    /// Keyed by the city name exactly as passed to [`Self::resolve`].
    cache: Mutex<HashMap<String, String>>,
}

impl<'a> CitycodeResolver<'a> {
    #[must_use]
    pub fn new(client: &'a AmapClient) -> Self {
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the city-code for `city`, or `None` if it cannot be resolved.
    ///
    /// Never fails: transport and provider errors are logged and collapse to
    /// `None`.
    /// The geocoder is queried with surrounding whitespace removed.
    pub async fn resolve(&self, city: &str) -> Option<String> {
        if city.trim().is_empty() {
            return None;
        }

        if let Some(code) = self.cached(city) {
            tracing::debug!(city, citycode = %code, "citycode cache hit");
            return Some(code);
        }

        match self.lookup(city.trim()).await {
            Ok(Some(code)) => {
                if let Ok(mut cache) = self.cache.lock() {
                    cache.insert(city.to_string(), code.clone());
                }
                tracing::debug!(city, citycode = %code, "citycode resolved");
                Some(code)
            }
            Ok(None) => {
                tracing::warn!(city, "geocoder returned no citycode");
                None
            }
            Err(e) => {
                tracing::warn!(city, error = %e, "citycode lookup failed");
                None
            }
        }
    }

    /// Number of memoized city-codes.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn cached(&self, city: &str) -> Option<String> {
        self.cache.lock().ok()?.get(city).cloned()
    }

    async fn lookup(&self, city: &str) -> Result<Option<String>, AmapError> {
        let url = self.client.build_url(
            "v3/geocode/geo",
            &[("address", city), ("key", self.client.api_key())],
        )?;
        let raw = self.client.get_json(&url, "citycode lookup").await?;
        let resp: GeocodeResponse =
            serde_json::from_value(raw).map_err(|source| AmapError::Deserialize {
                context: "geocode response".to_string(),
                source,
            })?;

        let envelope = &resp.envelope;
        if envelope.status != SUCCESS_STATUS || envelope.infocode != OK_INFOCODE {
            return Err(AmapError::Provider {
                info: envelope.info.clone(),
                infocode: envelope.infocode.clone(),
            });
        }

        Ok(resp
            .geocodes
            .first()
            .and_then(|g| g.citycode())
            .map(str::to_string))
    }
}

//! Single-pair distance computation.

use async_trait::async_trait;
use routecalc_core::{DistanceResult, LocationValue, RoutingStrategy, TravelMode};

use crate::citycode::CitycodeResolver;
use crate::client::AmapClient;
use crate::error::AmapError;
use crate::normalize::normalize;
use crate::request::{build_request, RouteQuery};

/// Anything that can turn an origin/destination pair into a
/// [`DistanceResult`]. The batch orchestrator depends on this seam rather
/// than on [`DistanceCalculator`] directly.
#[async_trait]
pub trait DistanceSource: Send + Sync {
    async fn compute(
        &self,
        origin: &LocationValue,
        destination: &LocationValue,
        mode: TravelMode,
        strategy: Option<&RoutingStrategy>,
    ) -> Result<DistanceResult, AmapError>;
}

/// Computes distance and duration between two locations through AMap.
///
/// Holds the city-code cache for one run; build a fresh calculator per run.
pub struct DistanceCalculator<'a> {
    client: &'a AmapClient,
    resolver: CitycodeResolver<'a>,
}

impl<'a> DistanceCalculator<'a> {
    #[must_use]
    pub fn new(client: &'a AmapClient) -> Self {
        Self {
            client,
            resolver: CitycodeResolver::new(client),
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &CitycodeResolver<'a> {
        &self.resolver
    }
}

#[async_trait]
impl DistanceSource for DistanceCalculator<'_> {
    async fn compute(
        &self,
        origin: &LocationValue,
        destination: &LocationValue,
        mode: TravelMode,
        strategy: Option<&RoutingStrategy>,
    ) -> Result<DistanceResult, AmapError> {
        match (origin.is_usable(), destination.is_usable()) {
            (true, true) => {}
            (false, true) => return Err(AmapError::InvalidInput("origin location is empty".into())),
            (true, false) => {
                return Err(AmapError::InvalidInput(
                    "destination location is empty".into(),
                ))
            }
            (false, false) => {
                return Err(AmapError::InvalidInput(
                    "origin and destination locations are empty".into(),
                ))
            }
        }

        let strategy = RoutingStrategy::for_mode(strategy.cloned(), mode);
        let origin_param = origin.request_param();
        let destination_param = destination.request_param();
        let query = RouteQuery {
            origin: &origin_param,
            destination: &destination_param,
            origin_city: origin.city(),
            destination_city: destination.city(),
            mode,
            strategy: strategy.as_ref(),
        };

        let request = build_request(self.client, &query, &self.resolver).await?;
        tracing::debug!(request = %request, "sending route request");

        let raw = self
            .client
            .get_json(&request.url, &format!("{mode} route request"))
            .await?;
        normalize(mode, raw)
    }
}

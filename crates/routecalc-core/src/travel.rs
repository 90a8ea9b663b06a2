use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Travel mode selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Direct,
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub const ALL: [TravelMode; 5] = [
        TravelMode::Direct,
        TravelMode::Driving,
        TravelMode::Walking,
        TravelMode::Bicycling,
        TravelMode::Transit,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Direct => "direct",
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }

    /// Whether a routing strategy code is meaningful for this mode.
    #[must_use]
    pub fn accepts_strategy(self) -> bool {
        matches!(self, TravelMode::Driving | TravelMode::Transit)
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        TravelMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == needle)
            .ok_or_else(|| CoreError::UnknownTravelMode(s.to_string()))
    }
}

/// Opaque provider strategy code, only forwarded for driving and transit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingStrategy(String);

impl RoutingStrategy {
    /// Returns `None` for blank codes.
    #[must_use]
    pub fn new(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.is_empty() {
            None
        } else {
            Some(Self(code.to_string()))
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Drops the strategy when `mode` ignores it.
    #[must_use]
    pub fn for_mode(strategy: Option<Self>, mode: TravelMode) -> Option<Self> {
        strategy.filter(|_| mode.accepts_strategy())
    }
}

impl fmt::Display for RoutingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Known driving strategy codes and their labels. `32` is the provider default.
pub const DRIVING_STRATEGIES: &[(&str, &str)] = &[
    ("0", "fastest"),
    ("1", "lowest cost"),
    ("2", "shortest distance"),
    ("32", "provider recommended (default)"),
    ("33", "avoid congestion"),
    ("34", "highway priority"),
    ("35", "avoid highways"),
];

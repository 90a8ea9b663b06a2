use thiserror::Error;

/// Errors returned by the AMap adapter.
#[derive(Debug, Error)]
pub enum AmapError {
    /// The underlying `reqwest::Client` could not be built.
    #[error("HTTP client construction failed: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Network or TLS failure below the provider protocol.
    #[error("transport error during {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-2xx HTTP status.
    #[error("transport error during {context}: unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16, context: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The provider reported failure; `info` is passed through verbatim.
    #[error("AMap API error: {info} (infocode: {infocode})")]
    Provider { info: String, infocode: String },

    /// Transit prerequisites (city names, city-codes) were not met.
    #[error("citycode resolution failed: {0}")]
    CitycodeResolution(String),

    /// A record's location data is missing or unusable.
    #[error("invalid location input: {0}")]
    InvalidInput(String),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl AmapError {
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AmapError::InvalidInput(_))
    }

    /// `true` for failures below the provider protocol layer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AmapError::Transport { .. } | AmapError::UnexpectedStatus { .. }
        )
    }
}

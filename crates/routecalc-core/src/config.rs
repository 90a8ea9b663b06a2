use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    load_app_config_with_key(None)
}

/// Load configuration where the API key may come from somewhere other than
/// the environment (the CLI `--api-key` flag).
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid, or if no API key is available
/// from either `api_key` or `AMAP_API_KEY`.
pub fn load_app_config_with_key(api_key: Option<&str>) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    let override_key = api_key.map(str::to_string);
    build_app_config(|key| {
        if key == "AMAP_API_KEY" {
            if let Some(k) = &override_key {
                return Ok(k.clone());
            }
        }
        std::env::var(key)
    })
}

/// Tracing filter directive from `ROUTECALC_LOG_LEVEL`, defaulting to `info`.
///
/// Read separately from [`AppConfig`] so logging is available to commands that
/// never need an API key.
#[must_use]
pub fn load_log_level() -> String {
    dotenvy::dotenv().ok();
    log_level_from(|key| std::env::var(key))
}

fn log_level_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    lookup("ROUTECALC_LOG_LEVEL")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "info".to_string())
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_nonzero_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(value)
    };

    let amap_api_key = require("AMAP_API_KEY")?;
    let amap_base_url = or_default("ROUTECALC_AMAP_BASE_URL", "https://restapi.amap.com");
    let request_timeout_secs = parse_u64("ROUTECALC_REQUEST_TIMEOUT_SECS", "0")?;
    let user_agent = or_default("ROUTECALC_USER_AGENT", "routecalc/0.1 (distance-batch)");
    let page_size = parse_nonzero_usize("ROUTECALC_PAGE_SIZE", "200")?;
    let batch_size = parse_nonzero_usize("ROUTECALC_BATCH_SIZE", "10")?;
    let call_delay_ms = parse_u64("ROUTECALC_CALL_DELAY_MS", "50")?;
    let batch_delay_ms = parse_u64("ROUTECALC_BATCH_DELAY_MS", "100")?;

    Ok(AppConfig {
        amap_api_key,
        amap_base_url,
        request_timeout_secs,
        user_agent,
        page_size,
        batch_size,
        call_delay_ms,
        batch_delay_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

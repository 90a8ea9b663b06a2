use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("AMAP_API_KEY", "test-key");
    m
}

#[test]
fn build_app_config_fails_without_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "AMAP_API_KEY"),
        "expected MissingEnvVar(AMAP_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_key_as_missing() {
    let mut map = HashMap::new();
    map.insert("AMAP_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.amap_api_key, "test-key");
    assert_eq!(cfg.amap_base_url, "https://restapi.amap.com");
    assert_eq!(cfg.request_timeout_secs, 0);
    assert_eq!(cfg.user_agent, "routecalc/0.1 (distance-batch)");
    assert_eq!(cfg.page_size, 200);
    assert_eq!(cfg.batch_size, 10);
    assert_eq!(cfg.call_delay_ms, 50);
    assert_eq!(cfg.batch_delay_ms, 100);
}

#[test]
fn base_url_override() {
    let mut map = full_env();
    map.insert("ROUTECALC_AMAP_BASE_URL", "http://127.0.0.1:9000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.amap_base_url, "http://127.0.0.1:9000");
}

#[test]
fn request_timeout_override() {
    let mut map = full_env();
    map.insert("ROUTECALC_REQUEST_TIMEOUT_SECS", "15");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 15);
}

#[test]
fn request_timeout_invalid() {
    let mut map = full_env();
    map.insert("ROUTECALC_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ROUTECALC_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(ROUTECALC_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn batch_size_override() {
    let mut map = full_env();
    map.insert("ROUTECALC_BATCH_SIZE", "25");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.batch_size, 25);
}

#[test]
fn batch_size_zero_is_rejected() {
    let mut map = full_env();
    map.insert("ROUTECALC_BATCH_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, ref reason }) if var == "ROUTECALC_BATCH_SIZE" && reason.contains("at least 1")),
        "expected InvalidEnvVar(ROUTECALC_BATCH_SIZE), got: {result:?}"
    );
}

#[test]
fn page_size_invalid() {
    let mut map = full_env();
    map.insert("ROUTECALC_PAGE_SIZE", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ROUTECALC_PAGE_SIZE"),
        "expected InvalidEnvVar(ROUTECALC_PAGE_SIZE), got: {result:?}"
    );
}

#[test]
fn delays_override() {
    let mut map = full_env();
    map.insert("ROUTECALC_CALL_DELAY_MS", "0");
    map.insert("ROUTECALC_BATCH_DELAY_MS", "1000");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.call_delay_ms, 0);
    assert_eq!(cfg.batch_delay_ms, 1000);
}

#[test]
fn call_delay_invalid() {
    let mut map = full_env();
    map.insert("ROUTECALC_CALL_DELAY_MS", "1.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ROUTECALC_CALL_DELAY_MS"),
        "expected InvalidEnvVar(ROUTECALC_CALL_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-key"), "api key leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn log_level_defaults_to_info() {
    let map: HashMap<&str, &str> = HashMap::new();
    assert_eq!(log_level_from(lookup_from_map(&map)), "info");
}

#[test]
fn log_level_override_is_trimmed() {
    let mut map = HashMap::new();
    map.insert("ROUTECALC_LOG_LEVEL", " routecalc_batch=debug ");
    assert_eq!(log_level_from(lookup_from_map(&map)), "routecalc_batch=debug");
}

#[test]
fn blank_log_level_falls_back_to_info() {
    let mut map = HashMap::new();
    map.insert("ROUTECALC_LOG_LEVEL", "  ");
    assert_eq!(log_level_from(lookup_from_map(&map)), "info");
}

#[derive(Clone)]
pub struct AppConfig {
    pub amap_api_key: String,
    pub amap_base_url: String,
    /// Per-request timeout; `0` leaves provider calls unbounded.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub page_size: usize,
    pub batch_size: usize,
    pub call_delay_ms: u64,
    pub batch_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("amap_api_key", &"[redacted]")
            .field("amap_base_url", &self.amap_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_size", &self.page_size)
            .field("batch_size", &self.batch_size)
            .field("call_delay_ms", &self.call_delay_ms)
            .field("batch_delay_ms", &self.batch_delay_ms)
            .finish()
    }
}

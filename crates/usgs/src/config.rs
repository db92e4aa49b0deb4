//! USGS client configuration.

const DEFAULT_BASE_URL: &str = "https://waterservices.usgs.gov/nwis/dv/";

/// Configuration for the daily-values client.
#[derive(Debug, Clone)]
pub struct UsgsConfig {
    base_url: String,
    chunk_size: usize,
    delay_ms: u64,
    timeout_secs: u64,
    max_retries: u32,
}

impl Default for UsgsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chunk_size: 100,
            delay_ms: 300,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

impl UsgsConfig {
    /// Set the service base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the number of gauges per request. The API accepts up to 100.
    pub fn with_chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = n.max(1);
        self
    }

    /// Set the delay between chunk requests, in milliseconds.
    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// Set the per-request timeout, in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the retry budget per chunk (on top of the first attempt).
    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Returns the service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the gauges-per-request chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the inter-request delay in milliseconds.
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Returns the per-request timeout in seconds.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Returns the retry budget per chunk.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

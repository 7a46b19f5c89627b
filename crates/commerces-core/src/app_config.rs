use std::time::Duration;

/// Public records endpoint of the RATP approved-businesses dataset.
pub const DEFAULT_API_URL: &str =
    "https://data.ratp.fr/api/explore/v2.1/catalog/datasets/commerces-de-proximite-agrees-ratp/records";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// How long a fetched dataset is served from memory before refetching.
    pub cache_ttl_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

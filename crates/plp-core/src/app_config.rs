#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Root of the remote catalog API, without a trailing slash.
    pub api_base_url: String,
    /// Items per `load_more` fetch in the incremental catalog.
    pub page_size: u32,
    /// Items per request on the filtered listing page.
    pub listing_page_size: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    /// Quiet period before a burst of search input triggers a fetch.
    pub search_debounce_ms: u64,
}

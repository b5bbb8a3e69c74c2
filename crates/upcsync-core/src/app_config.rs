use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub error_log_path: PathBuf,
    pub catalog_base_url: String,
    pub page_size: u32,
    pub api_key: String,
    pub contact: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub retry_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

/// The subset of [`AppConfig`] the catalog HTTP client needs.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub contact: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub retry_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl AppConfig {
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_key: self.api_key.clone(),
            contact: self.contact.clone(),
            user_agent: self.user_agent.clone(),
            request_timeout_secs: self.request_timeout_secs,
            retry_delay_ms: self.retry_delay_ms,
            retry_max_delay_ms: self.retry_max_delay_ms,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("error_log_path", &self.error_log_path)
            .field("catalog_base_url", &self.catalog_base_url)
            .field("page_size", &self.page_size)
            .field("api_key", &"[redacted]")
            .field("contact", &self.contact)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("retry_max_delay_ms", &self.retry_max_delay_ms)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[redacted]")
            .field("contact", &self.contact)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("retry_max_delay_ms", &self.retry_max_delay_ms)
            .finish()
    }
}

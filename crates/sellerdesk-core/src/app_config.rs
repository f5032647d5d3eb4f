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

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    /// Etsy application keystring; sent as the `x-api-key` header.
    pub etsy_client_id: Option<String>,
    pub etsy_shared_secret: Option<String>,
    pub shipentegra_base_url: String,
    pub shipentegra_client_id: Option<String>,
    pub shipentegra_client_secret: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub sync_page_size: u32,
    pub sync_window_days: i64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field(
                "etsy_client_id",
                &self.etsy_client_id.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "etsy_shared_secret",
                &self.etsy_shared_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("shipentegra_base_url", &self.shipentegra_base_url)
            .field(
                "shipentegra_client_id",
                &self.shipentegra_client_id.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "shipentegra_client_secret",
                &self.shipentegra_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("sync_page_size", &self.sync_page_size)
            .field("sync_window_days", &self.sync_window_days)
            .finish()
    }
}

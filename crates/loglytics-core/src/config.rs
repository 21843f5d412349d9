#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub search_url: String,
    pub search_username: String,
    pub search_password: String,
    /// Accept self-signed TLS certificates on the search engine connection.
    /// Development convenience only.
    pub search_allow_unsecure: bool,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("LOGLYTICS_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            search_url: std::env::var("LOGLYTICS_SEARCH_URL")
                .unwrap_or_else(|_| "http://localhost:9200".to_string()),
            search_username: std::env::var("LOGLYTICS_SEARCH_USERNAME").unwrap_or_default(),
            search_password: std::env::var("LOGLYTICS_SEARCH_PASSWORD").unwrap_or_default(),
            search_allow_unsecure: std::env::var("LOGLYTICS_SEARCH_ALLOW_UNSECURE")
                .map(|v| v == "true")
                .unwrap_or(false),
            cors_origins: std::env::var("LOGLYTICS_CORS_ORIGINS")
                .map(|v| v.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
        })
    }
}

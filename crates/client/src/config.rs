/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Framemark server, without a trailing slash.
    pub api_url: String,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default                  |
    /// |---------------------|--------------------------|
    /// | `FRAMEMARK_API_URL` | `http://127.0.0.1:5001`  |
    pub fn from_env() -> Self {
        let api_url = std::env::var("FRAMEMARK_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5001".into());
        Self::new(api_url)
    }

    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }
}

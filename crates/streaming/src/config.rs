use std::env;

pub const API_URL_ENV: &str = "EARTH_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Where the metrics API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ApiConfig {
    /// Trailing slashes are dropped so endpoints can always start with `/`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Reads `EARTH_API_URL` at runtime.
    pub fn from_env() -> Self {
        Self::from_value(env::var(API_URL_ENV).ok())
    }

    /// Uses the value baked in at build time, for targets without a process
    /// environment.
    pub fn from_build_env() -> Self {
        Self::from_value(option_env!("EARTH_API_URL").map(str::to_string))
    }

    fn from_value(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Self::new(v),
            _ => Self::default(),
        }
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

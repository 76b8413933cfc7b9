use std::env;

/// Environment variable holding the training service base URL.
pub const API_URL_VAR: &str = "TRAINING_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Where the external training/inference service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    /// Creates a new client configuration.
    ///
    /// # Args
    /// * `base_url` - Root URL of the service. A trailing `/` is dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut url = base_url.into().trim().to_string();
        while url.ends_with('/') {
            url.pop();
        }
        Self { base_url: url }
    }

    /// Reads the base URL from `TRAINING_API_URL`, falling back to
    /// `http://localhost:8000` when unset or blank.
    pub fn from_env() -> Self {
        match env::var(API_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

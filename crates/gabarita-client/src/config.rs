//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the backend lives and which routes carry special meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin, without a trailing slash (`http://127.0.0.1:5000`).
    pub base_url: String,

    /// Per-request timeout handed to the transport.
    pub timeout: Duration,

    /// The host route users are sent to when their session expires.
    pub login_route: String,

    /// Refresh endpoint path.
    pub refresh_path: String,

    /// Remote sign-out endpoint path.
    pub logout_path: String,
}

impl ClientConfig {
    /// Default config pointed at another backend.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Joins the base URL and an absolute API path.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout: Duration::from_secs(30),
            login_route: "/login".to_string(),
            refresh_path: "/api/auth/refresh-token".to_string(),
            logout_path: "/api/auth/logout".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.login_route, "/login");
        assert_eq!(config.refresh_path, "/api/auth/refresh-token");
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ClientConfig::with_base_url("https://api.example.com/");
        assert_eq!(config.url("/api/planos"), "https://api.example.com/api/planos");
        assert_eq!(config.url("api/planos"), "https://api.example.com/api/planos");
    }
}

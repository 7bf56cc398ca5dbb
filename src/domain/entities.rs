//! Domain entities: core data structures

use std::fmt;

/// Basic-auth credentials and API location of one cluster.
#[derive(Clone, PartialEq, Eq)]
pub struct ClusterCredentials {
    pub username: String,
    pub password: String,
    /// Base URL of the management API, without trailing slash
    pub base_url: String,
}

impl ClusterCredentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for a path relative to the base URL.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Replace username and password, keeping the base URL.
    pub fn with_login(mut self, username: &str, password: &str) -> Self {
        self.username = username.to_string();
        self.password = password.to_string();
        self
    }
}

impl fmt::Debug for ClusterCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

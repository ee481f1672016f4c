use std::path::PathBuf;

/// Configuration errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin, e.g. `http://localhost:8001`.
    pub backend_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// File backing the durable session store.
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8001".into(),
            request_timeout_secs: 30,
            session_file: PathBuf::from(".buildsite-session.json"),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                   |
    /// |----------------------------------|---------------------------|
    /// | `BUILDSITE_BACKEND_URL`          | `http://localhost:8001`   |
    /// | `BUILDSITE_REQUEST_TIMEOUT_SECS` | `30`                      |
    /// | `BUILDSITE_SESSION_FILE`         | `.buildsite-session.json` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let backend_url = lookup("BUILDSITE_BACKEND_URL").unwrap_or(defaults.backend_url);

        let request_timeout_secs = match lookup("BUILDSITE_REQUEST_TIMEOUT_SECS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "BUILDSITE_REQUEST_TIMEOUT_SECS",
                expected: "u64",
                value,
            })?,
            None => defaults.request_timeout_secs,
        };

        let session_file = lookup("BUILDSITE_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_file);

        Ok(Self {
            backend_url,
            request_timeout_secs,
            session_file,
        })
    }

    /// Base URL of the REST API (`{backend_url}/api`).
    pub fn api_url(&self) -> String {
        format!("{}/api", self.backend_url.trim_end_matches('/'))
    }
}

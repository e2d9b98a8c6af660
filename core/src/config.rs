//! Client configuration.

use serde::Deserialize;

use crate::error::TransifexError;

pub const DEFAULT_BASE_URL: &str = "https://www.transifex.com";
pub const DEFAULT_API_PATH: &str = "/api/2";

/// Where the API lives and how to authenticate against it.
///
/// Deserializable so callers can embed it in their own config files; missing
/// fields fall back to the public Transifex endpoint without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_path: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_path: DEFAULT_API_PATH.to_string(),
            username: None,
            password: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.username = Some(username.to_string());
        self.password = Some(password.to_string());
        self
    }

    /// Read `TRANSIFEX_API_URL`, `TRANSIFEX_API_PATH`, `TRANSIFEX_USERNAME`
    /// and `TRANSIFEX_PASSWORD`, keeping defaults for unset variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: lookup("TRANSIFEX_API_URL").unwrap_or(defaults.base_url),
            api_path: lookup("TRANSIFEX_API_PATH").unwrap_or(defaults.api_path),
            username: lookup("TRANSIFEX_USERNAME"),
            password: lookup("TRANSIFEX_PASSWORD"),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), TransifexError> {
        if self.base_url.trim().is_empty() {
            return Err(TransifexError::Config("base_url must not be empty".to_string()));
        }
        match (&self.username, &self.password) {
            (Some(_), None) => Err(TransifexError::Config(
                "username is set but password is missing".to_string(),
            )),
            (None, Some(_)) => Err(TransifexError::Config(
                "password is set but username is missing".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

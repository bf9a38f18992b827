use serde::Deserialize;

/// Backend location used when neither the environment nor the caller sets one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8081";

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "HOMECOMFORT_API_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API base URL must not be empty")]
    EmptyBaseUrl,

    #[error("failed to read configuration from environment: {0}")]
    Env(#[from] serde_env::Error),
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    homecomfort_api_url: Option<String>,
}

/// Injected configuration for the business layer: where the REST API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    api_base_url: String,
}

impl BusinessConfig {
    /// Builds a config for `base_url`, trimming any trailing `/`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        let trimmed = base_url.as_ref().trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        Ok(Self {
            api_base_url: trimmed.to_owned(),
        })
    }

    /// Reads [`API_URL_ENV`] from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Reads the config from an explicit set of variables.
    pub fn from_vars<I, S>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let raw: RawConfig = serde_env::from_iter(vars)?;
        match raw.homecomfort_api_url {
            Some(url) => Self::new(url),
            None => Ok(Self::default()),
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Joins an endpoint path (`"users/block"`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
        }
    }
}

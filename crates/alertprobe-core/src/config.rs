//! Configuration management for AlertProbe
//!
//! Sources are layered lowest first: built-in defaults, an optional config
//! file, `ALERTPROBE__SECTION__KEY` environment variables, and finally the
//! `ARAALI_API_TOKEN` / `ARAALI_BACKEND` overrides.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Environment variable holding the bearer token
pub const TOKEN_ENV: &str = "ARAALI_API_TOKEN";

/// Environment variable overriding the backend host
pub const BACKEND_ENV: &str = "ARAALI_BACKEND";

const ENV_PREFIX: &str = "ALERTPROBE";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Alert service connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Scenario runner defaults
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from every source, reading the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Ok(dotenv) = dotenvy::dotenv() {
            debug!(path = %dotenv.display(), "Loaded .env file");
        }

        let mut config = Self::from_layers(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.backend.validate()?;
        Ok(config)
    }

    /// Defaults, file and prefixed environment layers, without overrides
    pub fn from_layers(path: Option<&Path>) -> Result<Self> {
        Self::layered(path, None)
    }

    /// Like [`Config::from_layers`], reading prefixed variables from `env`
    /// instead of the process environment when it is given
    fn layered(path: Option<&Path>, env: Option<::config::Map<String, String>>) -> Result<Self> {
        let defaults = ::config::Config::try_from(&Self::default())?;

        let mut builder = ::config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Apply the token and backend overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.is_empty()) {
            self.backend.token = token;
        }
        if let Some(host) = lookup(BACKEND_ENV).filter(|h| !h.is_empty()) {
            self.backend.host = host;
        }
    }
}

/// Alert service connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Hostname, or a full base URL
    pub host: String,

    /// Bearer credential; never serialized
    #[serde(default, skip_serializing)]
    pub token: String,

    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Path of the list endpoint below the base URL
    pub list_path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: "nightly.aws.araalinetworks.com".to_string(),
            token: String::new(),
            timeout: Duration::from_secs(30),
            list_path: "/api/v2/listAlerts".to_string(),
        }
    }
}

impl BackendConfig {
    /// Config pointing at `host` with `token`, other settings default
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: token.into(),
            ..Self::default()
        }
    }

    /// Base URL; bare hostnames are served over HTTPS
    pub fn base_url(&self) -> Result<Url> {
        let raw = if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("https://{}", self.host)
        };
        Url::parse(&raw).map_err(|e| Error::config(format!("invalid backend '{}': {e}", self.host)))
    }

    /// Full URL of the list endpoint
    pub fn list_url(&self) -> Result<Url> {
        self.base_url()?
            .join(&self.list_path)
            .map_err(|e| Error::config(format!("invalid list path '{}': {e}", self.list_path)))
    }

    /// Check the settings can produce a usable client
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::config("backend host is empty"));
        }
        if self.timeout.is_zero() {
            return Err(Error::config("backend timeout must be positive"));
        }
        self.list_url().map(|_| ())
    }

    /// True when a bearer credential is configured
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("host", &self.host)
            .field("token", &if self.has_token() { "<redacted>" } else { "<unset>" })
            .field("timeout", &self.timeout)
            .field("list_path", &self.list_path)
            .finish()
    }
}

/// Scenario runner defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Tenant used by the built-in scenarios
    pub tenant_id: String,
    /// Wall-clock bound for a single scenario
    #[serde(with = "humantime_serde")]
    pub deadline: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tenant_id: "meta-tap".to_string(),
            deadline: Duration::from_secs(60),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

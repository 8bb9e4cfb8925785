use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "fxd4.toml";
pub const DEFAULT_SESSION_COOKIE: &str = "fxd4_session";
pub const DEFAULT_SESSION_MAX_AGE: u64 = 60 * 60;
pub const DEFAULT_APP_VERSION: &str = "0.0.0";

/// Application configuration.
///
/// Values are read from a TOML file first and then overridden by the
/// environment, so a deployment can keep secrets out of the file.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the hosted project, e.g. `https://xyzcompany.supabase.co`.
    /// Env: SUPABASE_URL
    pub supabase_url: Option<String>,

    /// Project API key sent with every request.
    /// Env: SUPABASE_KEY
    pub supabase_key: Option<String>,

    /// Render detailed error pages.
    /// Env: APP_DEBUG (only `true` enables it)
    /// Default: false
    pub app_debug: Option<bool>,

    /// Version shown on production error pages.
    /// Env: APP_VERSION
    /// Default: 0.0.0
    pub app_version: Option<String>,

    /// Deployment environment. `production` enables secure cookies.
    /// Env: APP_ENV, falling back to NODE_ENV
    pub app_env: Option<String>,

    /// Name of the session cookie.
    /// Default: fxd4_session
    pub session_cookie: Option<String>,

    /// Lifetime of the session cookie in seconds.
    /// Default: 3600
    pub session_max_age: Option<u64>,

    /// User agent for outgoing requests.
    pub user_agent: Option<String>,

    /// Global request timeout in seconds. Unset means no timeout.
    pub timeout: Option<u64>,
}

/// Borrowed project credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub url: &'a str,
    pub key: &'a str,
}

impl Config {
    /// Loads the configuration from `path`, `$FXD4_CONFIG`, or `./fxd4.toml`
    /// (first match wins) and applies environment overrides.
    ///
    /// An explicitly requested file must exist. The implicit locations are
    /// optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => {
                match env::var("FXD4_CONFIG") {
                    Ok(path) => (PathBuf::from(path), true),
                    Err(_) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
                }
            }
        };

        let mut config = if path.exists() || required {
            debug!("reading config from {}", path.display());
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| {
            ConfigError::IoError {
                path: path.display().to_string(),
                source,
            }
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overrides file values with the process environment.
    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var("SUPABASE_URL") {
            self.supabase_url = Some(url);
        }
        if let Ok(key) = env::var("SUPABASE_KEY") {
            self.supabase_key = Some(key);
        }
        if let Ok(debug) = env::var("APP_DEBUG") {
            self.app_debug = Some(is_true(&debug));
        }
        if let Ok(version) = env::var("APP_VERSION") {
            self.app_version = Some(version);
        }
        if let Ok(app_env) = env::var("APP_ENV").or_else(|_| env::var("NODE_ENV")) {
            self.app_env = Some(app_env);
        }
    }

    /// Returns the project credentials, failing when either is unset or blank.
    pub fn credentials(&self) -> Result<Credentials<'_>> {
        let url = self.supabase_url.as_deref().filter(|s| !s.trim().is_empty());
        let key = self.supabase_key.as_deref().filter(|s| !s.trim().is_empty());

        match (url, key) {
            (Some(url), Some(key)) => {
                Ok(Credentials {
                    url,
                    key,
                })
            }
            _ => Err(ConfigError::MissingCredentials),
        }
    }

    pub fn debug(&self) -> bool {
        self.app_debug.unwrap_or(false)
    }

    pub fn app_version(&self) -> &str {
        self.app_version.as_deref().unwrap_or(DEFAULT_APP_VERSION)
    }

    pub fn is_production(&self) -> bool {
        self.app_env.as_deref() == Some("production")
    }

    pub fn session_cookie(&self) -> &str {
        self.session_cookie
            .as_deref()
            .unwrap_or(DEFAULT_SESSION_COOKIE)
    }

    pub fn session_max_age(&self) -> Duration {
        Duration::from_secs(self.session_max_age.unwrap_or(DEFAULT_SESSION_MAX_AGE))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// Serializes the configuration with the API key masked.
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut config = self.clone();
        if config.supabase_key.is_some() {
            config.supabase_key = Some("********".into());
        }
        Ok(toml::to_string_pretty(&config)?)
    }
}

/// Only `true` (any case) switches a flag on; every other value is off.
fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

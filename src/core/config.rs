//! Application configuration.
//!
//! The server loads [`Config`] from environment variables using
//! `Config::from_env()` after calling `dotenvy::dotenv()`, then hands the
//! browser a [`ClientConfig`] through `GET /api/config`.

use serde::{Deserialize, Serialize};

use crate::core::login::{ErrorCodeMatching, LoginSettings};
#[cfg(feature = "ssr")]
use crate::core::login::{DEFAULT_PARTNER, DEFAULT_REDIRECT_PATH};

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    MissingVar(&'static str),
}

/// Settings the browser needs to run the login flow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Firebase web API key used for `accounts:signInWithPassword`
    pub firebase_api_key: String,
    /// Base URL of the backend API serving `/user/me`
    pub api_url: String,
    pub partner: String,
    pub redirect_path: String,
    #[serde(default)]
    pub strict_error_codes: bool,
}

impl ClientConfig {
    pub fn login_settings(&self) -> LoginSettings {
        LoginSettings {
            partner: self.partner.clone(),
            redirect_path: self.redirect_path.clone(),
            error_matching: if self.strict_error_codes {
                ErrorCodeMatching::Strict
            } else {
                ErrorCodeMatching::Lenient
            },
        }
    }

    /// URL of the current-user endpoint
    pub fn user_url(&self) -> String {
        format!("{}/user/me", self.api_url.trim_end_matches('/'))
    }
}

/// Application configuration loaded from environment variables.
#[cfg(feature = "ssr")]
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase web API key
    pub firebase_api_key: Option<String>,

    /// Backend API base URL
    /// Example: https://api.example.com/api/v1
    pub api_url: Option<String>,

    /// Partner tag attached to login analytics events
    pub partner: String,

    /// Path to navigate to after a successful login
    pub redirect_path: String,

    /// Show the authentication error only for unknown-user and wrong-password
    pub strict_error_codes: bool,
}

#[cfg(feature = "ssr")]
impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            firebase_api_key: lookup("FIREBASE_API_KEY"),
            api_url: lookup("API_URL"),
            partner: lookup("LOGIN_PARTNER").unwrap_or_else(|| DEFAULT_PARTNER.to_string()),
            redirect_path: lookup("LOGIN_REDIRECT_PATH")
                .unwrap_or_else(|| DEFAULT_REDIRECT_PATH.to_string()),
            strict_error_codes: lookup("STRICT_AUTH_ERROR_CODES")
                .is_some_and(|v| parse_flag(&v)),
        }
    }

    /// Check if Firebase is configured
    pub fn has_firebase(&self) -> bool {
        self.firebase_api_key.is_some()
    }

    /// Check if the backend API is configured
    pub fn has_api(&self) -> bool {
        self.api_url.is_some()
    }

    /// Build the browser configuration, requiring Firebase and the API URL
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        Ok(ClientConfig {
            firebase_api_key: self
                .firebase_api_key
                .clone()
                .ok_or(ConfigError::MissingVar("FIREBASE_API_KEY"))?,
            api_url: self
                .api_url
                .clone()
                .ok_or(ConfigError::MissingVar("API_URL"))?,
            partner: self.partner.clone(),
            redirect_path: self.redirect_path.clone(),
            strict_error_codes: self.strict_error_codes,
        })
    }
}

#[cfg(feature = "ssr")]
impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(feature = "ssr")]
fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

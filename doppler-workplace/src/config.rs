//! API configuration for the workplace client.
//!
//! Holds the Doppler API host, the access token and the request timeout.
//! Configuration is loaded from environment variables with defaults that
//! point at the public API.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default Doppler API host.
pub const DEFAULT_API_HOST: &str = "https://api.doppler.com";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Configuration for talking to the Doppler API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API (e.g., "https://api.doppler.com").
    pub base_url: String,

    /// Access token sent as a bearer credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_HOST.to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Create a configuration for the given host and token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DOPPLER_API_HOST`: API base URL (default: https://api.doppler.com)
    /// - `DOPPLER_TOKEN`: access token
    /// - `DOPPLER_TIMEOUT_SECS`: request timeout in seconds (default: 30, must be positive)
    ///
    /// An empty `DOPPLER_TOKEN` counts as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();

        let timeout_secs = match std::env::var("DOPPLER_TIMEOUT_SECS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "DOPPLER_TIMEOUT_SECS".to_string(),
                        message: format!("expected a positive number of seconds, got {:?}", raw),
                    })
                }
            },
            Err(_) => default.timeout_secs,
        };

        Ok(Self {
            base_url: std::env::var("DOPPLER_API_HOST").unwrap_or(default.base_url),
            token: std::env::var("DOPPLER_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout_secs,
        })
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build a full URL by appending a path to the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Check if token authentication is available.
    pub fn has_auth(&self) -> bool {
        self.token.is_some()
    }

    /// Validate that the configuration can authenticate against the API.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.is_none() {
            return Err(ConfigError::MissingEnvVar("DOPPLER_TOKEN".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "https://api.doppler.com");
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.has_auth());
    }

    #[test]
    fn test_url_joining() {
        let config = ApiConfig::new("https://api.example.com", "dp.st.token");

        assert_eq!(
            config.url("/v3/workplace/roles"),
            "https://api.example.com/v3/workplace/roles"
        );
        assert_eq!(
            config.url("v3/workplace/roles"),
            "https://api.example.com/v3/workplace/roles"
        );
    }

    #[test]
    fn test_url_trailing_slash() {
        let config = ApiConfig::new("https://api.example.com/", "dp.st.token");

        assert_eq!(
            config.url("/v3/workplace/permissions"),
            "https://api.example.com/v3/workplace/permissions"
        );
    }

    #[test]
    fn test_validate() {
        let mut config = ApiConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingEnvVar(ref var)) if var == "DOPPLER_TOKEN"
        ));

        config.token = Some("dp.st.token".to_string());
        assert!(config.validate().is_ok());

        config.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    /// Environment variables read by `from_env`.
    const ENV_VARS: [&str; 3] = ["DOPPLER_API_HOST", "DOPPLER_TOKEN", "DOPPLER_TIMEOUT_SECS"];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    // The process environment is shared between test threads, so every
    // `from_env` case runs inside this one test.
    #[test]
    fn test_from_env() {
        clear_env();

        let config = ApiConfig::from_env().unwrap();
        assert_eq!(config.base_url, DEFAULT_API_HOST);
        assert!(config.token.is_none());
        assert_eq!(config.timeout_secs, 30);

        std::env::set_var("DOPPLER_API_HOST", "https://doppler.internal.example");
        std::env::set_var("DOPPLER_TOKEN", "dp.st.prd.abc123");
        std::env::set_var("DOPPLER_TIMEOUT_SECS", "12");
        let config = ApiConfig::from_env().unwrap();
        assert_eq!(config.base_url, "https://doppler.internal.example");
        assert_eq!(config.token.as_deref(), Some("dp.st.prd.abc123"));
        assert_eq!(config.timeout(), Duration::from_secs(12));
        assert!(config.validate().is_ok());

        std::env::set_var("DOPPLER_TOKEN", "");
        let config = ApiConfig::from_env().unwrap();
        assert!(config.token.is_none());
        assert!(!config.has_auth());

        for bad in ["soon", "-5", "1.5", "0"] {
            std::env::set_var("DOPPLER_TIMEOUT_SECS", bad);
            match ApiConfig::from_env() {
                Err(ConfigError::InvalidValue { key, .. }) => {
                    assert_eq!(key, "DOPPLER_TIMEOUT_SECS")
                }
                other => panic!("unexpected result for {:?}: {:?}", bad, other),
            }
        }

        clear_env();
    }

    #[test]
    fn test_config_deserializes_without_token() {
        let config: ApiConfig =
            serde_json::from_str(r#"{"base_url":"http://localhost:8080","timeout_secs":5}"#)
                .unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.token.is_none());
    }
}

//! Application Configuration
//!
//! Configuration for the Auth application layer. The two signing
//! secrets are required process configuration; `from_env` refuses to
//! produce a config without them so the caller can abort before the
//! listener binds.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Fatal configuration errors, surfaced at startup only
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not defined")]
    MissingSecret(&'static str),
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for access tokens
    pub access_token_secret: Vec<u8>,
    /// HMAC secret for refresh tokens, independent of the access secret
    pub refresh_token_secret: Vec<u8>,
    /// Access token TTL (15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token TTL (7 days)
    pub refresh_token_ttl: Duration,
    /// Cookie carrying the access token
    pub access_cookie_name: String,
    /// Cookie carrying the refresh token
    pub refresh_cookie_name: String,
    /// Whether to require Secure cookies
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Mint a fresh refresh token on every `/token` call
    pub rotate_refresh_tokens: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: Vec::new(),
            refresh_token_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(15 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            access_cookie_name: "auth".to_string(),
            refresh_cookie_name: "refreshAuth".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            rotate_refresh_tokens: false,
        }
    }
}

impl AuthConfig {
    /// Load config from the environment.
    ///
    /// `ACCESS_TOKEN_SECRET` and `REFRESH_TOKEN_SECRET` are required;
    /// an unset or empty value is a fatal startup condition, not a
    /// per-request error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let access = required_secret("ACCESS_TOKEN_SECRET")?;
        let refresh = required_secret("REFRESH_TOKEN_SECRET")?;

        let mut config = Self {
            access_token_secret: access.into_bytes(),
            refresh_token_secret: refresh.into_bytes(),
            ..Self::default()
        };

        if let Ok(value) = env::var("COOKIE_SECURE") {
            config.cookie_secure = value != "false";
        }
        if let Ok(value) = env::var("ROTATE_REFRESH_TOKENS") {
            config.rotate_refresh_tokens = value == "true";
        }

        Ok(config)
    }

    /// Create config with random secrets (for development and tests)
    pub fn with_random_secrets() -> Self {
        Self {
            access_token_secret: platform::crypto::random_bytes(32),
            refresh_token_secret: platform::crypto::random_bytes(32),
            ..Self::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secrets()
        }
    }

    /// Access token TTL in whole seconds (cookie Max-Age)
    pub fn access_token_ttl_secs(&self) -> i64 {
        self.access_token_ttl.as_secs() as i64
    }

    /// Refresh token TTL in whole seconds (cookie Max-Age)
    pub fn refresh_token_ttl_secs(&self) -> i64 {
        self.refresh_token_ttl.as_secs() as i64
    }
}

fn required_secret(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingSecret(name)),
    }
}

//! Connection settings

use crate::error::{HttpError, Result};
use std::time::Duration;

pub const DEFAULT_API_HOST: &str = "https://api.pure1.purestorage.com/fusion";
pub const API_HOST_ENV: &str = "FUSION_API_HOST";
pub const ACCESS_TOKEN_ENV: &str = "FUSION_ACCESS_TOKEN";
pub const REQUEST_TIMEOUT_ENV: &str = "FUSION_REQUEST_TIMEOUT_SECS";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`crate::FusionClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub access_token: String,
    /// Upper bound for a single HTTP request
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Create ClientConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let access_token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| HttpError::MissingEnvVar(ACCESS_TOKEN_ENV.to_string()))?;
        let base_url = std::env::var(API_HOST_ENV).unwrap_or_else(|_| DEFAULT_API_HOST.to_string());

        let mut config = Self::new(base_url, access_token);
        if let Ok(raw) = std::env::var(REQUEST_TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                HttpError::InvalidConfig(format!(
                    "{} must be a number of seconds, got '{}'",
                    REQUEST_TIMEOUT_ENV, raw
                ))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

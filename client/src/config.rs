//! # Client Configuration
//!
//! Settings loaded from environment variables (a `.env` file is honoured by
//! the `dmc` binary). Every value has a default, so an empty environment
//! yields a working configuration against the public service.
//!
//! | variable | default |
//! |---|---|
//! | `DMC_API_BASE_URL` | `https://daemacoin-server.xquare.app` |
//! | `DMC_REQUEST_TIMEOUT_SECS` | `10` |
//! | `DMC_POLL_INTERVAL_MS` | `3000` |
//! | `DMC_LEADERBOARD_LIMIT` | `10` |
//! | `DMC_USERS_PAGE_SIZE` | `20` |
//! | `DMC_GITHUB_CLIENT_ID` | public OAuth app id |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::core::error::AppError;

pub const DEFAULT_API_BASE_URL: &str = "https://daemacoin-server.xquare.app";
pub const DEFAULT_GITHUB_CLIENT_ID: &str = "Ov23liHgU8D73ZmDOReG";

/// Client configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the DaemaCoin API, without trailing slash
    pub api_base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Balance polling period while signed in
    pub poll_interval: Duration,
    /// Leaderboard page size
    pub leaderboard_limit: u32,
    /// User directory page size
    pub users_page_size: u32,
    /// GitHub OAuth app id, used to build the authorize URL
    pub github_client_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(3000),
            leaderboard_limit: 10,
            users_page_size: 20,
            github_client_id: DEFAULT_GITHUB_CLIENT_ID.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables and validate it.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let config = Self {
            api_base_url: env::var("DMC_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            request_timeout: env_parse::<u64>("DMC_REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            poll_interval: env_parse::<u64>("DMC_POLL_INTERVAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll_interval),
            leaderboard_limit: env_parse("DMC_LEADERBOARD_LIMIT")?.unwrap_or(defaults.leaderboard_limit),
            users_page_size: env_parse("DMC_USERS_PAGE_SIZE")?.unwrap_or(defaults.users_page_size),
            github_client_id: env::var("DMC_GITHUB_CLIENT_ID").unwrap_or(defaults.github_client_id),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.api_base_url.is_empty() {
            return Err(AppError::Config("DMC_API_BASE_URL must not be empty".to_string()));
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "DMC_API_BASE_URL must be an http(s) URL, got {}",
                self.api_base_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(AppError::Config("DMC_REQUEST_TIMEOUT_SECS must be greater than 0".to_string()));
        }
        if self.poll_interval.is_zero() {
            return Err(AppError::Config("DMC_POLL_INTERVAL_MS must be greater than 0".to_string()));
        }
        if self.leaderboard_limit == 0 || self.users_page_size == 0 {
            return Err(AppError::Config("page sizes must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// GitHub OAuth authorize URL (scopes needed for commit webhooks).
    pub fn github_authorize_url(&self) -> String {
        format!(
            "https://github.com/login/oauth/authorize?client_id={}&scope=write:repo_hook%20public_repo",
            self.github_client_id
        )
    }
}

/// Read and parse an optional environment variable.
///
/// Unset yields `Ok(None)`; set but unparsable is a configuration error.
fn env_parse<T: FromStr>(name: &'static str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} has the wrong format: {:?}", name, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval, Duration::from_secs(3));
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = ClientConfig { api_base_url: "ftp://example.com".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));

        config.api_base_url = "http://127.0.0.1:3001".into();
        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        config.poll_interval = Duration::from_secs(1);
        config.users_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn authorize_url_carries_client_id() {
        let config = ClientConfig { github_client_id: "abc123".into(), ..Default::default() };
        let url = config.github_authorize_url();
        assert!(url.starts_with("https://github.com/login/oauth/authorize?client_id=abc123&"));
        assert!(url.contains("public_repo"));
    }
}

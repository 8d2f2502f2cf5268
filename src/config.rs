//! Client configuration.
//!
//! The only operator-facing setting is where the generation service lives.
//! The optional request timeout is off by default: the service can take a
//! while on large timetables and the workflow has always waited for it.

use crate::error::ScheduleError;
use serde::{Deserialize, Serialize};

/// Base URL used when none is configured (the service's default bind port).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

/// Configuration for talking to the schedule-generation service.
///
/// # Example
/// ```rust
/// use schedule_gen::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("https://schedules.example.edu/")
///     .request_timeout_secs(300)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url, "https://schedules.example.edu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service root, without a trailing slash. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Whole-request timeout in seconds. Default: `None` (wait indefinitely).
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn no_timeout(mut self) -> Self {
        self.config.request_timeout_secs = None;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ScheduleError> {
        let c = &self.config;
        let parsed = reqwest::Url::parse(&c.base_url).map_err(|e| {
            ScheduleError::InvalidConfig(format!("base URL '{}' is not a URL: {e}", c.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScheduleError::InvalidConfig(format!(
                "base URL must be http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(ScheduleError::InvalidConfig(
                "request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

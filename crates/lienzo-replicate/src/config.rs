//! Public configuration for the predictor client.

use std::time::Duration;

/// Configuration for the Replicate-style predictor client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use lienzo_replicate::ReplicateConfig;
/// use std::time::Duration;
///
/// let config = ReplicateConfig::new("r8_example_token", "model-version-sha")
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    /// Base URL for the predictions API.
    pub(crate) base_url: String,
    /// API token sent as `Authorization: Token <token>`.
    pub(crate) token: String,
    /// Model version identifier submitted with every prediction.
    pub(crate) model_version: String,
    /// User agent string for HTTP requests.
    pub(crate) user_agent: String,
    /// Per-request timeout.
    pub(crate) timeout: Duration,
    /// Maximum retry attempts for transient errors on read paths.
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff.
    pub(crate) retry_base_delay: Duration,
}

impl ReplicateConfig {
    /// Create a configuration with default settings for a token and model
    /// version.
    #[must_use]
    pub fn new(token: impl Into<String>, model_version: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.replicate.com/v1/predictions".to_string(),
            token: token.into(),
            model_version: model_version.into(),
            user_agent: concat!("lienzo-replicate/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }

    /// Set the base URL for the predictions API.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retry attempts for transient errors.
    ///
    /// Defaults to 3 retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    ///
    /// Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}

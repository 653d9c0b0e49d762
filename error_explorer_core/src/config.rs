/**
 * Reporter configuration.
 *
 * All values are validated at construction time — an invalid webhook URL,
 * token, project name, timeout or retry count is a startup bug and fails
 * loudly instead of being silently defaulted. Once built, a
 * `ReporterConfig` is immutable for the process lifetime.
 */
use std::time::Duration;

use url::Url;

use crate::protocol::levels::LogLevel;

/// Allowed per-attempt HTTP timeout range, in seconds.
const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=30;

/// Allowed retry count range (retries beyond the first attempt).
const RETRIES_RANGE: std::ops::RangeInclusive<u32> = 0..=5;

/// Validation failure raised while building a `ReporterConfig`.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("webhook_url must be a valid http(s) URL")]
    InvalidWebhookUrl,

    #[error("token must be at least 10 characters long")]
    TokenTooShort,

    #[error("token must contain only alphanumeric characters, hyphens and underscores")]
    InvalidTokenCharset,

    #[error("project_name must be at least 2 characters long")]
    ProjectNameTooShort,

    #[error("project_name must contain only alphanumeric characters, hyphens and underscores")]
    InvalidProjectNameCharset,

    #[error("timeout must be between 1 and 30 seconds, got {0}")]
    TimeoutOutOfRange(u64),

    #[error("max_retries must be between 0 and 5, got {0}")]
    RetriesOutOfRange(u32),
}

/**
 * Validated reporter settings.
 *
 * Construct with `ReporterConfig::new(url, token, project)` and adjust the
 * optional knobs through the chained setters:
 *
 * ```ignore
 * let config = ReporterConfig::new("https://errors.example.com", "tok-1234567890", "my-app")?
 *     .minimum_level(LogLevel::Warning)
 *     .timeout_secs(10)?
 *     .max_retries(2)?;
 * ```
 */
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    webhook_base_url: String,
    project_token: String,
    project_name: String,
    enabled: bool,
    minimum_level: LogLevel,
    ignored_types: Vec<String>,
    timeout: Duration,
    max_retries: u32,
}

impl ReporterConfig {
    /**
     * Builds a config from the three required values, with defaults for
     * the rest: enabled, minimum level `error`, no ignored types, 5 s
     * timeout, 3 retries.
     */
    pub fn new(
        webhook_base_url: impl Into<String>,
        project_token: impl Into<String>,
        project_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let webhook_base_url = webhook_base_url.into();
        let project_token = project_token.into();
        let project_name = project_name.into();

        validate_webhook_url(&webhook_base_url)?;
        validate_token(&project_token)?;
        validate_project_name(&project_name)?;

        Ok(Self {
            webhook_base_url,
            project_token,
            project_name,
            enabled: true,
            minimum_level: LogLevel::Error,
            ignored_types: Vec::new(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
        })
    }

    /// Turns reporting on or off globally.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Minimum severity for message events; lower ones are skipped.
    pub fn minimum_level(mut self, level: LogLevel) -> Self {
        self.minimum_level = level;
        self
    }

    /// Error type tags that are never reported (exact match).
    pub fn ignored_types(mut self, types: Vec<String>) -> Self {
        self.ignored_types = types;
        self
    }

    /// Per-attempt HTTP timeout; must be within [1, 30] seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Result<Self, ConfigError> {
        if !TIMEOUT_RANGE.contains(&secs) {
            return Err(ConfigError::TimeoutOutOfRange(secs));
        }
        self.timeout = Duration::from_secs(secs);
        Ok(self)
    }

    /// Retries after the first attempt; must be within [0, 5].
    pub fn max_retries(mut self, retries: u32) -> Result<Self, ConfigError> {
        if !RETRIES_RANGE.contains(&retries) {
            return Err(ConfigError::RetriesOutOfRange(retries));
        }
        self.max_retries = retries;
        Ok(self)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn webhook_base_url(&self) -> &str {
        &self.webhook_base_url
    }

    pub fn project_token(&self) -> &str {
        &self.project_token
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get_minimum_level(&self) -> LogLevel {
        self.minimum_level
    }

    pub fn get_ignored_types(&self) -> &[String] {
        &self.ignored_types
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn get_max_retries(&self) -> u32 {
        self.max_retries
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_webhook_url(url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(url).map_err(|_| ConfigError::InvalidWebhookUrl)?;

    if parsed.scheme() != "https" && parsed.scheme() != "http" {
        return Err(ConfigError::InvalidWebhookUrl);
    }

    Ok(())
}

fn validate_token(token: &str) -> Result<(), ConfigError> {
    if token.len() < 10 {
        return Err(ConfigError::TokenTooShort);
    }

    if !is_identifier_charset(token) {
        return Err(ConfigError::InvalidTokenCharset);
    }

    Ok(())
}

fn validate_project_name(name: &str) -> Result<(), ConfigError> {
    if name.len() < 2 {
        return Err(ConfigError::ProjectNameTooShort);
    }

    if !is_identifier_charset(name) {
        return Err(ConfigError::InvalidProjectNameCharset);
    }

    Ok(())
}

fn is_identifier_charset(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

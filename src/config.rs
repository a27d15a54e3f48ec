//! # Sequence configuration.
//!
//! Provides [`Config`], the timing parameters of a shutdown sequence.
//!
//! Config is used in two ways:
//! 1. **Typed**: `Builder::with_config(cfg)` or the individual `with_delay` / `with_timeout` setters
//! 2. **From text**: [`Config::from_env`] for deployments that tune shutdown without a rebuild
//!
//! ## Environment
//! - `SHUTDOWN_DELAY_MS`: pause between the shutdown request and the first step
//! - `SHUTDOWN_TIMEOUT_MS`: upper bound on the whole step loop
//!
//! Values are signed integers; negative values are rejected with [`ConfigError::Negative`].

use std::time::Duration;

use crate::error::ConfigError;

/// Environment key for [`Config::delay`].
pub const ENV_DELAY_MS: &str = "SHUTDOWN_DELAY_MS";
/// Environment key for [`Config::timeout`].
pub const ENV_TIMEOUT_MS: &str = "SHUTDOWN_TIMEOUT_MS";

/// Timing parameters of a shutdown sequence.
///
/// ## Field semantics
/// - `delay`: wall-clock pause between `start` acquiring the guard and the first step (`0s` = none)
/// - `timeout`: upper bound on the step loop; the step deadline is `start time + timeout`
///   (`0s` = the deadline is the start time itself)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Pause inserted before the step loop begins.
    pub delay: Duration,

    /// Upper bound on total step-loop wall-clock time.
    pub timeout: Duration,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// Unset keys keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use shutdown_sequencer::Config;
    ///
    /// let cfg = Config::from_lookup(|key| match key {
    ///     "SHUTDOWN_TIMEOUT_MS" => Some("1500".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(cfg.timeout, Duration::from_millis(1500));
    /// assert_eq!(cfg.delay, Duration::ZERO);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(ENV_DELAY_MS) {
            cfg.delay = parse_millis("delay", &raw)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            cfg.timeout = parse_millis("timeout", &raw)?;
        }
        Ok(cfg)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `delay = 0s` (start immediately)
    /// - `timeout = 60s`
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            timeout: Duration::from_secs(60),
        }
    }
}

fn parse_millis(option: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let value: i64 = raw.trim().parse().map_err(|source| ConfigError::Parse {
        option,
        value: raw.to_string(),
        source,
    })?;
    u64::try_from(value)
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::Negative { option, value })
}

//! Poll settings
//!
//! Fixed delays used by the build event poller. There is no adaptive
//! back-off: an empty poll always waits `idle_delay`, a processed batch
//! always waits `poll_interval`.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Delay before retrying after a poll that produced no events
pub const DEFAULT_IDLE_DELAY: Duration = Duration::from_millis(100);

/// Delay between polls once a batch has been processed
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Poller timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Wait after an empty or undecodable response
    pub idle_delay: Duration,

    /// Wait after a processed, non-terminal batch
    pub poll_interval: Duration,
}

impl PollSettings {
    pub fn new(idle_delay: Duration, poll_interval: Duration) -> Self {
        Self {
            idle_delay,
            poll_interval,
        }
    }

    /// Creates settings from environment variables
    ///
    /// Expected environment variables:
    /// - BUILDWATCH_IDLE_DELAY_MS (optional, default: 100)
    /// - BUILDWATCH_POLL_INTERVAL_MS (optional, default: 300)
    pub fn from_env() -> Self {
        let idle_delay = env_millis("BUILDWATCH_IDLE_DELAY_MS").unwrap_or(DEFAULT_IDLE_DELAY);
        let poll_interval =
            env_millis("BUILDWATCH_POLL_INTERVAL_MS").unwrap_or(DEFAULT_POLL_INTERVAL);

        Self {
            idle_delay,
            poll_interval,
        }
    }

    /// Validates the settings
    pub fn validate(&self) -> Result<()> {
        if self.idle_delay.is_zero() {
            return Err(ClientError::InvalidRequest(
                "idle_delay must be greater than 0".to_string(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(ClientError::InvalidRequest(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        if self.poll_interval < self.idle_delay {
            return Err(ClientError::InvalidRequest(
                "poll_interval must not be shorter than idle_delay".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_DELAY, DEFAULT_POLL_INTERVAL)
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PollSettings::default();
        assert_eq!(settings.idle_delay, Duration::from_millis(100));
        assert_eq!(settings.poll_interval, Duration::from_millis(300));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_env_reads_and_falls_back() {
        // SAFETY: no other test in this crate touches these variables.
        unsafe {
            std::env::set_var("BUILDWATCH_IDLE_DELAY_MS", "25");
            std::env::set_var("BUILDWATCH_POLL_INTERVAL_MS", "750");
        }
        let settings = PollSettings::from_env();
        assert_eq!(settings.idle_delay, Duration::from_millis(25));
        assert_eq!(settings.poll_interval, Duration::from_millis(750));

        unsafe {
            std::env::set_var("BUILDWATCH_IDLE_DELAY_MS", "fast");
            std::env::remove_var("BUILDWATCH_POLL_INTERVAL_MS");
        }
        let settings = PollSettings::from_env();
        assert_eq!(settings.idle_delay, DEFAULT_IDLE_DELAY);
        assert_eq!(settings.poll_interval, DEFAULT_POLL_INTERVAL);

        unsafe {
            std::env::remove_var("BUILDWATCH_IDLE_DELAY_MS");
        }
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = PollSettings::default();

        settings.idle_delay = Duration::ZERO;
        assert!(settings.validate().is_err());

        settings.idle_delay = Duration::from_millis(500);
        assert!(settings.validate().is_err());

        settings.poll_interval = Duration::from_millis(500);
        assert!(settings.validate().is_ok());

        settings.poll_interval = Duration::ZERO;
        assert!(settings.validate().is_err());
    }
}

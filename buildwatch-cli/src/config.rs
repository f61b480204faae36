//! Configuration module
//!
//! Handles CLI configuration: the build service URL and poller timing.

use std::time::Duration;

use buildwatch_client::PollSettings;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the build service
    pub server_url: String,

    /// Poller timing
    pub poll_settings: PollSettings,
}

impl Config {
    /// Builds the configuration, letting explicit overrides win over the environment
    pub fn new(
        server_url: String,
        idle_delay_ms: Option<u64>,
        poll_interval_ms: Option<u64>,
    ) -> Self {
        let mut poll_settings = PollSettings::from_env();

        if let Some(ms) = idle_delay_ms {
            poll_settings.idle_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = poll_interval_ms {
            poll_settings.poll_interval = Duration::from_millis(ms);
        }

        Self {
            server_url,
            poll_settings,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            anyhow::bail!("server_url must start with http:// or https://");
        }

        self.poll_settings.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let config = Config::new("http://localhost:7860".to_string(), Some(50), Some(1000));
        assert_eq!(config.poll_settings.idle_delay, Duration::from_millis(50));
        assert_eq!(config.poll_settings.poll_interval, Duration::from_millis(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = Config::new("localhost:7860".to_string(), Some(50), Some(1000));
        assert!(config.validate().is_err());

        let config = Config::new("http://localhost:7860".to_string(), Some(0), Some(1000));
        assert!(config.validate().is_err());
    }
}

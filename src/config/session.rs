//! Session store configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_TTL_SECS: u64 = 24 * 60 * 60;

/// Session lifetime and capacity
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime from creation, in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Maximum number of live sessions before oldest-first eviction
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Background sweep interval; unset means sweeping only on create
    #[serde(default)]
    pub sweep_interval_secs: Option<u64>,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Background sweep interval. Zero is treated as unset.
    pub fn sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_secs == 0 || self.ttl_secs > MAX_TTL_SECS {
            return Err(ValidationError::InvalidTtl);
        }
        if self.max_sessions == 0 {
            return Err(ValidationError::InvalidCapacity);
        }
        if self.sweep_interval_secs == Some(0) {
            return Err(ValidationError::InvalidSweepInterval);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
            max_sessions: default_max_sessions(),
            sweep_interval_secs: None,
        }
    }
}

fn default_ttl() -> u64 {
    60 * 60
}

fn default_max_sessions() -> usize {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.ttl(), Duration::from_secs(3600));
        assert_eq!(config.max_sessions, 5000);
        assert!(config.sweep_interval().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_sweep_interval_disables_sweeper() {
        let config = SessionConfig {
            sweep_interval_secs: Some(0),
            ..Default::default()
        };
        assert!(config.sweep_interval().is_none());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = SessionConfig {
            ttl_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTtl));
    }

    #[test]
    fn test_ttl_above_a_day_rejected() {
        let config = SessionConfig {
            ttl_secs: MAX_TTL_SECS + 1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTtl));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = SessionConfig {
            max_sessions: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCapacity));
    }

    #[test]
    fn test_zero_sweep_interval_rejected() {
        let config = SessionConfig {
            sweep_interval_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidSweepInterval)
        );
    }
}

use std::time::Duration;

use crate::{
    constants::{BACKOFF_FACTOR, DEFAULT_MAX_ATTEMPTS, INITIAL_RETRY_DELAY, MAX_DELAY},
    error::{Error, Result},
};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub backoff_factor: u32,
    pub max_delay: Duration,
}

impl RetryConfig {
    pub fn with_max_attempts(max_attempts: usize) -> Result<Self> {
        if max_attempts == 0 {
            return Err(Error::InvalidMaxAttempts(0));
        }
        Ok(Self {
            max_attempts,
            ..Default::default()
        })
    }

    /// Delay to wait after `delay`, capped at `max_delay`.
    pub(crate) fn next_delay(&self, delay: Duration) -> Duration {
        delay.saturating_mul(self.backoff_factor).min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: INITIAL_RETRY_DELAY,
            backoff_factor: BACKOFF_FACTOR,
            max_delay: MAX_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a_single_attempt() {
        assert_eq!(RetryConfig::default().max_attempts, 1);
    }

    #[test]
    fn zero_attempts_is_rejected() {
        assert!(matches!(
            RetryConfig::with_max_attempts(0),
            Err(Error::InvalidMaxAttempts(0))
        ));
    }

    #[test]
    fn backoff_is_capped() {
        let config = RetryConfig::with_max_attempts(5).unwrap();
        assert_eq!(
            config.next_delay(Duration::from_millis(100)),
            Duration::from_millis(200)
        );
        assert_eq!(config.next_delay(Duration::from_secs(20)), MAX_DELAY);
    }
}

use std::time::Duration;

use crate::domain::ValidationError;

/// Bounded retry policy for transient failures.
///
/// `attempts` counts every request, including the first one. The `delay` is awaited between
/// attempts; a zero delay retries immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Default total number of attempts.
    pub const DEFAULT_ATTEMPTS: u32 = 3;
    /// Default wait between attempts.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

    /// Create a policy. `attempts` must be at least 1.
    pub fn new(attempts: u32, delay: Duration) -> Result<Self, ValidationError> {
        if attempts == 0 {
            return Err(ValidationError::TooSmall {
                field: "retry_attempts",
                min: 1,
                actual: 0,
            });
        }
        Ok(Self { attempts, delay })
    }

    /// Create a policy that retries without waiting.
    pub fn no_delay(attempts: u32) -> Result<Self, ValidationError> {
        Self::new(attempts, Duration::ZERO)
    }

    /// A single attempt, never retried.
    pub fn never() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub(crate) async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: Self::DEFAULT_ATTEMPTS,
            delay: Self::DEFAULT_DELAY,
        }
    }
}

use std::{future::Future, time::Duration};

use dioxus_logger::tracing;

use crate::server::error::Error;

/// Retries an operation a bounded number of times with a fixed delay between attempts
///
/// Every failed attempt is recorded so callers can report how many attempts failed and why.
pub struct RetryContext {
    /// Max attempts before failure
    max_attempts: u32,
    /// Fixed delay between attempts
    delay: Duration,
    /// Error text of every failed attempt, oldest first
    failures: Vec<String>,
}

impl Default for RetryContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryContext {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

    pub fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            delay: Self::DEFAULT_DELAY,
            failures: Vec::new(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Error text of every failed attempt so far
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Execute `operation` until it succeeds or the attempt limit is reached
    ///
    /// Sleeps for the configured delay after each failed attempt except the last one.
    ///
    /// # Arguments
    /// - `description`: Description of the operation for logging (e.g., "warehouse connection")
    /// - `operation`: Async function performing one attempt
    ///
    /// # Returns
    /// - `Ok(R)` - Result of the first successful attempt
    /// - `Err(Error)` - Error of the last attempt once every attempt failed
    pub async fn execute_with_retry<R, F, Fut>(
        &mut self,
        description: &str,
        mut operation: F,
    ) -> Result<R, Error>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, Error>>,
    {
        let mut attempt_count = 0;

        loop {
            attempt_count += 1;

            tracing::debug!(
                "Processing {} (attempt {}/{})",
                description,
                attempt_count,
                self.max_attempts
            );

            match operation().await {
                Ok(result) => {
                    tracing::debug!("Successfully processed {}", description);
                    return Ok(result);
                }
                Err(e) => {
                    self.failures.push(e.to_string());

                    if attempt_count >= self.max_attempts {
                        tracing::error!(
                            "Max attempts ({}) exceeded for {}: {}",
                            self.max_attempts,
                            description,
                            e
                        );
                        return Err(e);
                    }

                    tracing::warn!(
                        "Attempt {}/{} of {} failed, retrying after {:?}: {}",
                        attempt_count,
                        self.max_attempts,
                        description,
                        self.delay,
                        e
                    );

                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}

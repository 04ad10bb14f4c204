//! Retry with exponential backoff and jitter, shared by every external API
//! client (chat, image, publishing). Which failures are worth retrying is
//! the caller's decision via a predicate.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(800),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Capped exponential delay before jitter, for a 1-based attempt number.
    /// Pure so tests can assert the schedule without sleeping.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }
}

/// Runs `operation` up to `policy.max_attempts` times. Errors the predicate
/// rejects are returned immediately; retryable errors sleep a jittered
/// exponential delay between attempts. The last error is returned when
/// attempts run out.
pub async fn with_backoff<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    is_retryable: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if !is_retryable(&e) || attempt >= policy.max_attempts {
                    return Err(e);
                }
                let delay = jittered(policy.delay_for_attempt(attempt));
                warn!(
                    "Attempt {attempt}/{} failed: {e} — retrying after {}ms",
                    policy.max_attempts,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Jitter factor in [0.5, 1.5) applied to every delay.
fn jittered(delay: Duration) -> Duration {
    delay.mul_f64(0.5 + rand::thread_rng().gen::<f64>())
}

//! Resilience — retry policy as data, and the combinator that consumes it.
//!
//! # Design
//!
//! ```text
//! attempt 1 ──Ok──────────────────────────────▶ Ok(value)
//!    │ Err(retriable)
//!    ├─ sleep(delay)
//! attempt 2 ──Ok──────────────────────────────▶ Ok(value)
//!    │ Err(non-retriable) ────────────────────▶ Err(e), no more attempts
//!    ├─ sleep(delay)
//! attempt N ──Err─────────────────────────────▶ Err(last), attempts = N
//! ```
//!
//! There is no sleep after the final attempt, so a run that always fails
//! transiently performs `max_attempts` calls and `max_attempts - 1` sleeps.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::errors::ConfigError;

/// How many times to try a fallible remote call, and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    /// Create a policy. `max_attempts` counts the first try and must be at least 1.
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::invalid("max_attempts", "must be at least 1"));
        }
        Ok(Self {
            max_attempts,
            delay,
        })
    }

    /// A single attempt with no retries.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Upper bound on wall time for a full run, given a per-attempt timeout.
    pub fn worst_case_latency(&self, per_attempt_timeout: Duration) -> Duration {
        (per_attempt_timeout + self.delay) * self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            delay: Self::DEFAULT_DELAY,
        }
    }
}

/// Result of a retry run plus the number of attempts it took.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
}

impl<T, E> RetryOutcome<T, E> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run `op` under `policy`, retrying errors for which `is_retriable` is true.
///
/// `op` receives the 1-indexed attempt number. Non-retriable errors end the
/// run immediately.
pub async fn retry_with_backoff<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    is_retriable: R,
    mut op: F,
) -> RetryOutcome<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: Display,
{
    let max = policy.max_attempts;
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(attempt, max, "Retry succeeded");
                }
                return RetryOutcome {
                    result: Ok(value),
                    attempts: attempt,
                };
            }
            Err(e) if !is_retriable(&e) => {
                tracing::debug!(attempt, error = %e, "Non-retriable failure, giving up");
                return RetryOutcome {
                    result: Err(e),
                    attempts: attempt,
                };
            }
            Err(e) => {
                tracing::warn!(attempt, max, error = %e, "Attempt failed");
                if attempt >= max {
                    return RetryOutcome {
                        result: Err(e),
                        attempts: attempt,
                    };
                }
            }
        }

        if !policy.delay.is_zero() {
            tokio::time::sleep(policy.delay).await;
        }
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, PartialEq)]
    enum TestErr {
        Flaky,
        Fatal,
    }

    impl Display for TestErr {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    fn retriable(e: &TestErr) -> bool {
        *e == TestErr::Flaky
    }

    #[test]
    fn test_policy_rejects_zero_attempts() {
        assert!(RetryPolicy::new(0, Duration::from_secs(1)).is_err());
        assert!(RetryPolicy::new(1, Duration::ZERO).is_ok());
    }

    #[test]
    fn test_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_worst_case_latency() {
        let policy = RetryPolicy::new(3, Duration::from_secs(2)).unwrap();
        assert_eq!(
            policy.worst_case_latency(Duration::from_secs(10)),
            Duration::from_secs(36)
        );
    }

    #[tokio::test]
    async fn test_first_attempt_succeeds() {
        let calls = Cell::new(0);
        let outcome = retry_with_backoff(&RetryPolicy::default(), retriable, |_| {
            calls.set(calls.get() + 1);
            async { Ok::<_, TestErr>(7) }
        })
        .await;
        assert_eq!(outcome.result, Ok(7));
        assert_eq!(outcome.attempts, 1);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_on_second_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_millis(500)).unwrap();
        let start = tokio::time::Instant::now();
        let outcome = retry_with_backoff(&policy, retriable, |attempt| async move {
            if attempt == 1 {
                Err(TestErr::Flaky)
            } else {
                Ok("ok")
            }
        })
        .await;
        assert_eq!(outcome.result, Ok("ok"));
        assert_eq!(outcome.attempts, 2);
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_with_one_fewer_sleep_than_attempts() {
        let policy = RetryPolicy::new(4, Duration::from_secs(2)).unwrap();
        let calls = Cell::new(0);
        let start = tokio::time::Instant::now();
        let outcome = retry_with_backoff(&policy, retriable, |_| {
            calls.set(calls.get() + 1);
            async { Err::<(), _>(TestErr::Flaky) }
        })
        .await;
        assert_eq!(outcome.result, Err(TestErr::Flaky));
        assert_eq!(outcome.attempts, 4);
        assert_eq!(calls.get(), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retriable_stops_immediately() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1)).unwrap();
        let start = tokio::time::Instant::now();
        let outcome = retry_with_backoff(&policy, retriable, |_| async {
            Err::<(), _>(TestErr::Fatal)
        })
        .await;
        assert_eq!(outcome.result, Err(TestErr::Fatal));
        assert_eq!(outcome.attempts, 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}

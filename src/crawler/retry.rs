//! Retry policy for fetch attempts
//!
//! Only transient failures (timeouts, connection failures, renderer errors)
//! are retried. The policy reports how many attempts it made, which delays it
//! slept, and the state transitions it went through.

use crate::state::FetchState;
use crate::FetchError;
use std::future::Future;
use std::time::Duration;

/// Delay schedule between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same pause before every retry
    Fixed(Duration),
    /// `unit * 2^(k-1)` before retry `k`: 1, 2, 4, ... units
    Exponential { unit: Duration },
}

impl Backoff {
    /// Delay slept before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        match *self {
            Self::Fixed(delay) => delay,
            Self::Exponential { unit } => {
                let factor = 2u32.saturating_pow(retry.saturating_sub(1));
                unit.saturating_mul(factor)
            }
        }
    }
}

/// Attempt budget plus delay schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

/// Result of running an operation under a [`RetryPolicy`]
#[derive(Debug, Clone)]
pub struct RetryOutcome<T> {
    pub result: Result<T, FetchError>,
    /// Attempts actually made
    pub attempts: u32,
    /// Delays slept between attempts, in order
    pub delays: Vec<Duration>,
    /// Every state the fetch passed through, starting at `Pending`
    pub history: Vec<FetchState>,
}

impl RetryPolicy {
    /// Web page policy: `attempts` tries with a fixed pause
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(delay),
        }
    }

    /// Document policy: `attempts` tries with doubling pauses
    pub fn exponential(max_attempts: u32, unit: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential { unit },
        }
    }

    /// Single attempt, no retries
    pub fn once() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    /// Runs `op` until it succeeds, fails terminally, or the budget runs out
    ///
    /// `op` receives the 1-based attempt number. No delay follows the final
    /// failed attempt.
    ///
    /// # Example
    ///
    /// ```
    /// use finharvest::crawler::RetryPolicy;
    /// use finharvest::FetchError;
    /// use std::time::Duration;
    ///
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// let outcome = rt.block_on(
    ///     RetryPolicy::exponential(3, Duration::from_millis(1))
    ///         .run(|_| async { Err::<(), _>(FetchError::Timeout) }),
    /// );
    /// assert_eq!(outcome.attempts, 3);
    /// assert_eq!(outcome.delays.len(), 2);
    /// ```
    pub async fn run<T, F, Fut>(&self, mut op: F) -> RetryOutcome<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut history = vec![FetchState::Pending];
        let mut delays = Vec::new();
        let mut attempt = 0;

        loop {
            attempt += 1;
            transition(&mut history, FetchState::Fetching);

            match op(attempt).await {
                Ok(value) => {
                    transition(&mut history, FetchState::Success);
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt,
                        delays,
                        history,
                    };
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.backoff.delay_for(attempt);
                    tracing::warn!(
                        "Attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt,
                        max_attempts,
                        e,
                        delay
                    );
                    transition(&mut history, FetchState::RetryWait);
                    tokio::time::sleep(delay).await;
                    delays.push(delay);
                }
                Err(e) => {
                    transition(&mut history, FetchState::Failed);
                    return RetryOutcome {
                        result: Err(e),
                        attempts: attempt,
                        delays,
                        history,
                    };
                }
            }
        }
    }
}

fn transition(history: &mut Vec<FetchState>, next: FetchState) {
    if let Some(current) = history.last() {
        debug_assert!(
            current.can_transition_to(next),
            "illegal fetch transition {} -> {}",
            current,
            next
        );
        tracing::trace!("Fetch state {} -> {}", current, next);
    }
    history.push(next);
}

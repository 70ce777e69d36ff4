//! Bounded retry for flaky page interactions.

use log::debug;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// How many times to try an operation and how long to pause between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    #[serde(default)]
    pub backoff_ms: u64,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff_ms: u64) -> Self {
        RetryPolicy {
            max_attempts,
            backoff_ms,
        }
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Every attempt failed; carries the error of the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `operation` until it succeeds or `policy.max_attempts` tries are used up.
///
/// The closure receives the 1-based attempt number. The backoff sleep happens
/// only between attempts, never after the final failure. A policy of zero
/// attempts is treated as one.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, Exhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= max_attempts => {
                return Err(Exhausted {
                    attempts: attempt,
                    last_error: err,
                })
            }
            Err(err) => {
                debug!("Attempt {}/{} failed: {}, trying again", attempt, max_attempts, err);
                if policy.backoff_ms > 0 {
                    tokio::time::sleep(policy.backoff()).await;
                }
                attempt += 1;
            }
        }
    }
}

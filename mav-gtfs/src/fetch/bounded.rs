//! Bounded-concurrency batch fetching with timeout and retry.
//!
//! Every task is attempted up to `max_attempts` times, each attempt under its
//! own deadline. Tasks that never succeed are dropped: a batch always
//! completes and reports whatever succeeded.

use std::fmt::{Debug, Display};
use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::config::FeedConfig;

use super::error::FetchError;

/// Per-task timeout and retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Deadline for a single attempt.
    pub timeout: Duration,
    /// Attempts before giving up (first try included).
    pub max_attempts: u32,
    /// Delay before the first retry, doubled for each further retry.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, max_attempts: u32, backoff: Duration) -> Self {
        Self {
            timeout,
            max_attempts,
            backoff,
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.timeout, config.max_attempts, config.backoff)
    }

    /// Delay after the given failed attempt (1-based).
    fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.backoff.saturating_mul(factor)
    }

    /// Run `call` under this policy.
    ///
    /// A timed-out attempt is dropped, so a late response can never be
    /// observed. Returns `FetchError::Exhausted` once every attempt failed.
    pub async fn call<T, E, F, Fut>(&self, mut call: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let error = match tokio::time::timeout(self.timeout, call()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => FetchError::Failure(e.to_string()),
                Err(_) => FetchError::Timeout(self.timeout),
            };

            debug!(attempt, max_attempts = attempts, error = %error, "fetch attempt failed");

            if attempt >= attempts {
                return Err(FetchError::Exhausted {
                    attempts,
                    last: Box::new(error),
                });
            }

            let delay = self.delay_after(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FeedConfig::default())
    }
}

/// A task result tagged with the task's submission position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indexed<T> {
    pub index: usize,
    pub value: T,
}

/// Outcome of a batch.
#[derive(Debug, Clone)]
pub struct FetchReport<T> {
    /// Successful results, in completion order.
    pub results: Vec<Indexed<T>>,
    /// Tasks dropped after exhausting their attempts.
    pub dropped: usize,
}

impl<T> FetchReport<T> {
    /// Successful results in submission order.
    pub fn into_ordered(mut self) -> Vec<T> {
        self.results.sort_by_key(|r| r.index);
        self.results.into_iter().map(|r| r.value).collect()
    }
}

/// Runs a batch of fetch tasks with at most `concurrency` in flight.
#[derive(Debug, Clone, Copy)]
pub struct BoundedFetcher {
    concurrency: usize,
    policy: RetryPolicy,
}

impl BoundedFetcher {
    pub fn new(concurrency: usize, policy: RetryPolicy) -> Self {
        Self {
            concurrency: concurrency.max(1),
            policy,
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.concurrency, RetryPolicy::from_config(config))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `f` for every task.
    ///
    /// Results are collected by the single stream consumer, so workers never
    /// share mutable state.
    pub async fn run<D, T, E, F, Fut>(&self, tasks: Vec<D>, f: F) -> FetchReport<T>
    where
        D: Debug,
        F: Fn(&D) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let total = tasks.len();
        let f = &f;
        let policy = &self.policy;

        let outcomes: Vec<(usize, Result<T, FetchError>)> =
            stream::iter(tasks.into_iter().enumerate())
                .map(|(index, task)| async move {
                    let outcome = policy.call(|| f(&task)).await;
                    if let Err(e) = &outcome {
                        warn!(index, task = ?task, error = %e, "dropping task");
                    }
                    (index, outcome)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        let mut report = FetchReport {
            results: Vec::with_capacity(total),
            dropped: 0,
        };
        for (index, outcome) in outcomes {
            match outcome {
                Ok(value) => report.results.push(Indexed { index, value }),
                Err(_) => report.dropped += 1,
            }
        }

        debug!(
            total,
            succeeded = report.results.len(),
            dropped = report.dropped,
            "batch complete"
        );

        report
    }
}

//! Fetch error types.

use std::time::Duration;

/// Failure of a fetch task.
///
/// `Timeout` and `Failure` describe a single attempt and are retried;
/// `Exhausted` is the terminal state of a task that ran out of attempts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// A single attempt exceeded its deadline
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    /// The underlying call failed
    #[error("fetch failed: {0}")]
    Failure(String),

    /// Every attempt failed
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<FetchError>,
    },
}

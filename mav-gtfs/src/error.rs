//! Run-level errors.

use chrono::{DateTime, Utc};

use crate::domain::InvalidRange;
use crate::fetch::FetchError;

/// Errors that abort a feed build.
///
/// Per-task fetch failures and malformed timetables are not here: they are
/// dropped, logged and counted in [`crate::pipeline::FeedStats`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error(transparent)]
    InvalidRange(#[from] InvalidRange),

    #[error("window ends {end}, more than {horizon_days} days ahead")]
    WindowTooFarAhead {
        end: DateTime<Utc>,
        horizon_days: i64,
    },

    #[error("could not fetch station list: {0}")]
    Stations(FetchError),
}

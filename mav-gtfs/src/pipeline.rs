//! End-to-end feed build.
//!
//! Validate the window, list stations, discover trains, collect their
//! timetables, then assemble the tables. Only the validation and the station
//! list can fail the run; everything later degrades by dropping tasks.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::config::FeedConfig;
use crate::domain::{civil_date, date_range, days_between};
use crate::error::FeedError;
use crate::fetch::{BoundedFetcher, TimetableCollector, TrainDiscovery};
use crate::gtfs::{FeedBuilder, FeedPeriod, FeedTables};
use crate::source::TransitSource;

/// The window to build a feed for. Both ends are inclusive civil days in
/// the railway timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FeedRequest {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// Counters describing one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub days: usize,
    pub stations: usize,
    pub trains: usize,
    pub timetables: usize,
    /// Trains for which upstream had no timetable.
    pub empty_timetables: usize,
    /// Departure board requests dropped after exhausting their attempts.
    pub dropped_boards: usize,
    /// Timetable requests dropped after exhausting their attempts.
    pub dropped_timetables: usize,
    /// Timetables rejected during canonicalization.
    pub skipped_timetables: usize,
    pub trips: usize,
}

/// A built feed.
#[derive(Debug, Clone)]
pub struct FeedOutput {
    pub tables: FeedTables,
    pub stats: FeedStats,
}

/// Check the window against `now` and expand it into civil days.
///
/// Runs before any upstream call.
pub fn validate(
    request: &FeedRequest,
    config: &FeedConfig,
    now: DateTime<Utc>,
) -> Result<Vec<DateTime<Tz>>, FeedError> {
    if days_between(now, request.end, config.timezone) > config.horizon_days {
        return Err(FeedError::WindowTooFarAhead {
            end: request.end,
            horizon_days: config.horizon_days,
        });
    }
    Ok(date_range(request.start, request.end, config.timezone)?)
}

/// Build a feed for `request` from `source`.
pub async fn build_feed<S: TransitSource>(
    source: &S,
    request: &FeedRequest,
    config: &FeedConfig,
    now: DateTime<Utc>,
) -> Result<FeedOutput, FeedError> {
    let days = validate(request, config, now)?;
    let fetcher = BoundedFetcher::from_config(config);

    info!(days = days.len(), "fetching stations");
    let stations = fetcher
        .policy()
        .call(|| source.stations())
        .await
        .map_err(FeedError::Stations)?;
    info!(stations = stations.len(), "stations loaded");

    let discovery = TrainDiscovery::new(source, &fetcher)
        .discover(&days, &stations)
        .await;

    let collection = TimetableCollector::new(source, &fetcher)
        .collect(&discovery.trains)
        .await;

    let period = FeedPeriod {
        start: civil_date(request.start, config.timezone),
        end: civil_date(request.end, config.timezone),
    };
    let built = FeedBuilder::new(config).build(
        period,
        &stations,
        &discovery.trains,
        &collection.timetables,
    );

    let stats = FeedStats {
        days: days.len(),
        stations: stations.len(),
        trains: discovery.trains.len(),
        timetables: collection.timetables.len(),
        empty_timetables: collection.empty,
        dropped_boards: discovery.dropped_tasks,
        dropped_timetables: collection.dropped_tasks,
        skipped_timetables: built.skipped_timetables,
        trips: built.trip_groups,
    };
    info!(?stats, "feed built");

    Ok(FeedOutput {
        tables: built.tables,
        stats,
    })
}

//! Train discovery from station departure boards.
//!
//! Queries every (day, station) board in the window and merges the trains
//! into one list deduplicated by train ID.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use tracing::info;

use crate::domain::{Station, TrainRef};
use crate::source::{SourceError, TransitSource};

use super::bounded::BoundedFetcher;

/// The universe of trains running in the window.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Trains, deduplicated by ID, in first-seen submission order.
    pub trains: Vec<TrainRef>,
    /// Board requests that failed on every attempt.
    pub dropped_tasks: usize,
}

/// Discovers trains using departure boards.
pub struct TrainDiscovery<'a, S: TransitSource> {
    source: &'a S,
    fetcher: &'a BoundedFetcher,
}

impl<'a, S: TransitSource> TrainDiscovery<'a, S> {
    pub fn new(source: &'a S, fetcher: &'a BoundedFetcher) -> Self {
        Self { source, fetcher }
    }

    /// Fetch one board per (day, station) and merge the trains.
    ///
    /// Boards are merged in submission order (days outer, stations inner),
    /// so the first occurrence of an ID does not depend on network timing.
    pub async fn discover(&self, days: &[DateTime<Tz>], stations: &[Station]) -> Discovery {
        let tasks: Vec<(NaiveDate, &Station)> = days
            .iter()
            .flat_map(|day| stations.iter().map(move |s| (day.date_naive(), s)))
            .collect();

        info!(
            days = days.len(),
            stations = stations.len(),
            tasks = tasks.len(),
            "discovering trains"
        );

        let source = self.source;
        let report = self
            .fetcher
            .run(tasks, |&(date, station): &(NaiveDate, &Station)| async move {
                info!(station = %station.id, name = %station.name, %date, "departures");
                let departures = source.departures(station, date).await?;
                Ok::<_, SourceError>(
                    departures.into_iter().map(|d| d.train).collect::<Vec<_>>(),
                )
            })
            .await;

        let dropped_tasks = report.dropped;
        let trains = dedup_by_id(report.into_ordered().into_iter().flatten());

        info!(trains = trains.len(), dropped_tasks, "discovery complete");

        Discovery {
            trains,
            dropped_tasks,
        }
    }
}

/// Keep the first occurrence of each train ID.
pub fn dedup_by_id(trains: impl IntoIterator<Item = TrainRef>) -> Vec<TrainRef> {
    let mut seen = HashSet::new();
    trains
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect()
}

//! Per-train timetable collection.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info};

use crate::domain::{RawTimetable, TrainRef};
use crate::source::TransitSource;

use super::bounded::BoundedFetcher;

/// Timetables fetched for the discovered trains.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Timetables in the order their trains were discovered.
    pub timetables: Vec<RawTimetable>,
    /// Trains for which upstream had no timetable.
    pub empty: usize,
    /// Trains whose fetch failed on every attempt.
    pub dropped_tasks: usize,
}

/// Fetches one timetable per train.
pub struct TimetableCollector<'a, S: TransitSource> {
    source: &'a S,
    fetcher: &'a BoundedFetcher,
}

impl<'a, S: TransitSource> TimetableCollector<'a, S> {
    pub fn new(source: &'a S, fetcher: &'a BoundedFetcher) -> Self {
        Self { source, fetcher }
    }

    pub async fn collect(&self, trains: &[TrainRef]) -> Collection {
        let total = trains.len();
        let started = AtomicUsize::new(0);
        let source = self.source;
        let started_ref = &started;

        info!(trains = total, "collecting timetables");

        let report = self
            .fetcher
            .run(trains.iter().collect(), |train: &&TrainRef| {
                let train = *train;
                async move {
                    let n = started_ref.fetch_add(1, Ordering::Relaxed);
                    debug!(train = %train.id, progress = n, total, "timetable");
                    source.timetable(&train.id).await
                }
            })
            .await;

        let dropped_tasks = report.dropped;
        let fetched = report.into_ordered();
        let empty = fetched.iter().filter(|t| t.is_none()).count();
        let timetables: Vec<RawTimetable> = fetched.into_iter().flatten().collect();

        info!(
            timetables = timetables.len(),
            empty, dropped_tasks, "collection complete"
        );

        Collection {
            timetables,
            empty,
            dropped_tasks,
        }
    }
}

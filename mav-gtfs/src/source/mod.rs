//! Upstream rail data sources.
//!
//! The feed builder needs three capabilities from upstream: the station
//! list, a station's departure board for one day, and a train's full
//! timetable. [`TransitSource`] abstracts them so the pipeline can run
//! against the live API, a snapshot file, or test stubs.
//!
//! Key characteristics of the upstream data:
//! - Train IDs are per day; the same train number on two days has two IDs
//! - A timetable is keyed by train ID only, not by date
//! - Times are absolute instants (RFC 3339)

mod client;
mod convert;
mod error;
mod snapshot;
mod types;

pub use client::{HttpSource, SourceConfig};
pub use convert::ConversionError;
pub use error::SourceError;
pub use snapshot::SnapshotSource;
pub use types::{
    CoordinatesDto, DepartureDto, SnapshotDto, StationDto, StopDto, TimetableDto, TrainDto,
};

use chrono::NaiveDate;

use crate::domain::{Departure, RawTimetable, Station, TrainId};

/// Upstream capabilities consumed by the feed builder.
///
/// Any call may fail or hang; callers apply their own timeout and retry.
#[allow(async_fn_in_trait)]
pub trait TransitSource {
    /// List every station.
    async fn stations(&self) -> Result<Vec<Station>, SourceError>;

    /// Departures from `station` on the civil day `date`.
    async fn departures(
        &self,
        station: &Station,
        date: NaiveDate,
    ) -> Result<Vec<Departure>, SourceError>;

    /// Full stop-level timetable of a train, or `None` if upstream has none.
    async fn timetable(&self, train: &TrainId) -> Result<Option<RawTimetable>, SourceError>;
}

//! Concurrent acquisition of upstream data.
//!
//! Two phases share one primitive: [`BoundedFetcher`] runs a batch of
//! upstream calls with a concurrency cap, a per-attempt timeout and bounded
//! retry. Discovery turns (day, station) pairs into the set of trains;
//! collection turns trains into timetables. Individual failures only ever
//! cost the data point they were fetching.

mod bounded;
mod collector;
mod discovery;
mod error;

pub use bounded::{BoundedFetcher, FetchReport, Indexed, RetryPolicy};
pub use collector::{Collection, TimetableCollector};
pub use discovery::{Discovery, TrainDiscovery, dedup_by_id};
pub use error::FetchError;

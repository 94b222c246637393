//! GTFS feed builder for the Hungarian state railways.
//!
//! Crawls per-station departure boards for a window of days, fetches every
//! train's timetable, and folds trains that repeat the same pattern on
//! different days into one trip with several service dates.

pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod gtfs;
pub mod pipeline;
pub mod source;

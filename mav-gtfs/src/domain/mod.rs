//! Domain types for the feed builder.
//!
//! This module contains validated representations of the upstream rail data
//! (stations, trains, timetables) and civil-day arithmetic. Identifier types
//! enforce their invariants at construction time, so code that receives
//! them can rely on them being usable inside canonical keys.

mod dates;
mod id;
mod station;
mod timetable;
mod train;

pub use dates::{InvalidRange, civil_date, date_range, days_between, start_of_day};
pub use id::{InvalidId, StopId, TrainId};
pub use station::{Coordinates, Station};
pub use timetable::{RawStop, RawTimetable};
pub use train::{Departure, TrainRef};

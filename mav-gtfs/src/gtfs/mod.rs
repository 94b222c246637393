//! GTFS feed construction.
//!
//! Raw timetables are canonicalized into trip patterns ([`canonical`]),
//! grouped and turned into the seven feed tables ([`builder`], [`tables`]),
//! then written as CSV ([`writer`]).

pub mod builder;
pub mod canonical;
pub mod tables;
pub mod writer;

pub use builder::{BuiltFeed, FeedBuilder, FeedPeriod, Grouping, TripGroup, group_timetables};
pub use canonical::{
    CanonicalKey, CanonicalStop, CanonicalTimetable, TransformError, canonicalize,
};
pub use tables::{
    AgencyRow, CalendarDateRow, FeedInfoRow, FeedTables, RouteRow, StopRow, StopTimeRow, Table,
    TripRow,
};
pub use writer::{WriteError, write_feed};

//! Raw per-train timetables as reported upstream.

use chrono::{DateTime, Utc};

use super::train::display_key;
use super::{StopId, TrainId};

/// One call of a train at a stop.
///
/// The origin usually has no arrival and the terminus no departure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStop {
    pub id: StopId,
    pub arrival: Option<DateTime<Utc>>,
    pub departure: Option<DateTime<Utc>>,
}

impl RawStop {
    pub fn new(
        id: StopId,
        arrival: Option<DateTime<Utc>>,
        departure: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            arrival,
            departure,
        }
    }

    /// Arrival, borrowing the departure when the arrival is missing.
    pub fn resolved_arrival(&self) -> Option<DateTime<Utc>> {
        self.arrival.or(self.departure)
    }

    /// Departure, borrowing the arrival when the departure is missing.
    pub fn resolved_departure(&self) -> Option<DateTime<Utc>> {
        self.departure.or(self.arrival)
    }
}

/// The full stop-level timetable of one train on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTimetable {
    pub id: TrainId,
    pub number: Option<String>,
    pub stops: Vec<RawStop>,
}

impl RawTimetable {
    pub fn new(id: TrainId, number: Option<String>, stops: Vec<RawStop>) -> Self {
        Self { id, number, stops }
    }

    /// The number if known, else the ID.
    pub fn display_key(&self) -> &str {
        display_key(&self.id, self.number.as_deref())
    }
}

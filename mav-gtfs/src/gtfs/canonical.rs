//! Canonical trip keys.
//!
//! Two timetables that call at the same stops with the same per-stop
//! timings map to the same key regardless of calendar day; each key becomes
//! one trip of the feed with one service date per member timetable.
//!
//! Timings are normalized against each stop's own arrival, so the key
//! captures the stop sequence and the dwell time at every stop, not the
//! running time between stops.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::{RawTimetable, StopId, TrainId};

/// Separates the fields of one stop inside a key.
const FIELD_SEPARATOR: char = '\u{1f}';

/// Separates the display key and the stops inside a key.
const STOP_SEPARATOR: char = '\u{1e}';

/// A timetable that cannot be canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("train {train} has no stops")]
    NoStops { train: TrainId },

    #[error("train {train} has neither arrival nor departure at stop {stop} (position {position})")]
    MissingTimes {
        train: TrainId,
        stop: StopId,
        position: usize,
    },
}

/// Grouping key for trip patterns.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Separators are unprintable; show them as / and #.
        let readable: String = self
            .0
            .chars()
            .map(|c| match c {
                FIELD_SEPARATOR => '/',
                STOP_SEPARATOR => '#',
                c => c,
            })
            .collect();
        write!(f, "CanonicalKey({readable})")
    }
}

/// A stop with resolved absolute times and normalized offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalStop {
    pub stop_id: StopId,
    pub arrival: DateTime<Utc>,
    pub departure: DateTime<Utc>,
    /// Arrival relative to this stop's own arrival (always zero).
    pub relative_arrival: TimeDelta,
    /// Departure relative to this stop's own arrival: the dwell time.
    pub relative_departure: TimeDelta,
}

/// A timetable reduced to its grouping key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalTimetable {
    pub train: TrainId,
    pub display_key: String,
    pub key: CanonicalKey,
    /// Departure from the first stop; names the service date.
    pub first_departure: DateTime<Utc>,
    pub stops: Vec<CanonicalStop>,
}

/// Canonicalize one timetable.
///
/// A stop missing one of arrival/departure borrows the other; a stop
/// missing both, or a timetable without stops, is rejected.
pub fn canonicalize(timetable: &RawTimetable) -> Result<CanonicalTimetable, TransformError> {
    if timetable.stops.is_empty() {
        return Err(TransformError::NoStops {
            train: timetable.id.clone(),
        });
    }

    let stops = timetable
        .stops
        .iter()
        .enumerate()
        .map(|(position, stop)| {
            let (Some(arrival), Some(departure)) =
                (stop.resolved_arrival(), stop.resolved_departure())
            else {
                return Err(TransformError::MissingTimes {
                    train: timetable.id.clone(),
                    stop: stop.id.clone(),
                    position,
                });
            };
            Ok(CanonicalStop {
                stop_id: stop.id.clone(),
                arrival,
                departure,
                relative_arrival: arrival - arrival,
                relative_departure: departure - arrival,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let display_key = timetable.display_key().to_string();
    let key = build_key(&display_key, &stops);
    let first_departure = stops[0].departure;

    Ok(CanonicalTimetable {
        train: timetable.id.clone(),
        display_key,
        key,
        first_departure,
        stops,
    })
}

fn build_key(display_key: &str, stops: &[CanonicalStop]) -> CanonicalKey {
    let mut key = String::from(display_key);
    for stop in stops {
        key.push(STOP_SEPARATOR);
        key.push_str(stop.stop_id.as_str());
        key.push(FIELD_SEPARATOR);
        key.push_str(&stop.relative_arrival.num_milliseconds().to_string());
        key.push(FIELD_SEPARATOR);
        key.push_str(&stop.relative_departure.num_milliseconds().to_string());
    }
    CanonicalKey(key)
}

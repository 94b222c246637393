//! Station types.

use super::StopId;

/// WGS84 position of a station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A station as listed by the upstream source.
///
/// Stations are only ever read: they are fetch inputs for discovery and
/// become rows of the stops table unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StopId,
    pub name: String,
    pub coordinates: Option<Coordinates>,
}

impl Station {
    /// Create a station without coordinates.
    pub fn new(id: StopId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            coordinates: None,
        }
    }

    /// Attach a position.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some(Coordinates {
            latitude,
            longitude,
        });
        self
    }
}

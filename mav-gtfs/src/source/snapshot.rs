//! Snapshot source for running without upstream access.
//!
//! Loads a single JSON document holding stations, departure boards and
//! timetables, and serves it as if it were the live API.

use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{Departure, RawTimetable, Station, TrainId};

use super::TransitSource;
use super::convert::{convert_departures, convert_stations, convert_timetable};
use super::error::SourceError;
use super::types::SnapshotDto;

/// Source that serves data from a JSON snapshot.
///
/// Useful for development, reproducing a past run, and demos.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    snapshot: SnapshotDto,
}

impl SnapshotSource {
    /// Load a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| SourceError::Snapshot {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json(&json)
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let snapshot = serde_json::from_str(json).map_err(|e| SourceError::Json {
            message: e.to_string(),
            body: None,
        })?;
        Ok(Self { snapshot })
    }
}

impl TransitSource for SnapshotSource {
    async fn stations(&self) -> Result<Vec<Station>, SourceError> {
        Ok(convert_stations(&self.snapshot.stations))
    }

    /// Stations or dates missing from the snapshot have empty boards.
    async fn departures(
        &self,
        station: &Station,
        date: NaiveDate,
    ) -> Result<Vec<Departure>, SourceError> {
        let board = self
            .snapshot
            .departures
            .get(station.id.as_str())
            .and_then(|by_date| by_date.get(&date.format("%Y-%m-%d").to_string()));

        Ok(board.map(|b| convert_departures(b)).unwrap_or_default())
    }

    async fn timetable(&self, train: &TrainId) -> Result<Option<RawTimetable>, SourceError> {
        let timetable = self.snapshot.trains.get(train.as_str());
        Ok(timetable.map(convert_timetable).transpose()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopId;

    const SNAPSHOT: &str = r#"{
        "stations": [
            {"id": "A", "name": "Alpha", "coordinates": {"latitude": 47.0, "longitude": 19.0}},
            {"id": "B", "name": "Beta"}
        ],
        "departures": {
            "A": {"2026-10-20": [{"train": {"id": "t1", "number": "100"}}]}
        },
        "trains": {
            "t1": {"id": "t1", "number": "100", "stops": [
                {"id": "A", "departure": "2026-10-20T08:00:00+02:00"},
                {"id": "B", "arrival": "2026-10-20T08:10:00+02:00"}
            ]}
        }
    }"#;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[tokio::test]
    async fn serves_stations() {
        let source = SnapshotSource::from_json(SNAPSHOT).unwrap();
        let stations = source.stations().await.unwrap();
        assert_eq!(stations.len(), 2);
        assert!(stations[0].coordinates.is_some());
    }

    #[tokio::test]
    async fn serves_departures_by_date() {
        let source = SnapshotSource::from_json(SNAPSHOT).unwrap();
        let a = Station::new(StopId::new("A").unwrap(), "Alpha");
        let b = Station::new(StopId::new("B").unwrap(), "Beta");

        let deps = source.departures(&a, date(20)).await.unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].train.display_key(), "100");

        assert!(source.departures(&a, date(21)).await.unwrap().is_empty());
        assert!(source.departures(&b, date(20)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn serves_timetables() {
        let source = SnapshotSource::from_json(SNAPSHOT).unwrap();

        let t1 = source
            .timetable(&TrainId::new("t1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(t1.stops.len(), 2);

        let unknown = source.timetable(&TrainId::new("zz").unwrap()).await.unwrap();
        assert!(unknown.is_none());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        assert!(SnapshotSource::load(&path).is_ok());
        assert!(matches!(
            SnapshotSource::load(dir.path().join("missing.json")),
            Err(SourceError::Snapshot { .. })
        ));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            SnapshotSource::from_json("{"),
            Err(SourceError::Json { .. })
        ));
    }
}

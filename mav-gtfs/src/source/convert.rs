//! Conversion from upstream DTOs to domain types.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::{Departure, InvalidId, RawStop, RawTimetable, Station, StopId, TrainId, TrainRef};

use super::types::{DepartureDto, StationDto, StopDto, TimetableDto};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Unusable identifier
    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    /// Failed to parse a time string
    #[error("invalid time: {0}")]
    InvalidTime(String),
}

/// Convert a station list, skipping entries with unusable IDs.
pub fn convert_stations(stations: &[StationDto]) -> Vec<Station> {
    stations
        .iter()
        .filter_map(|dto| match convert_station(dto) {
            Ok(station) => Some(station),
            Err(e) => {
                warn!(station = %dto.name, error = %e, "skipping station");
                None
            }
        })
        .collect()
}

pub fn convert_station(dto: &StationDto) -> Result<Station, ConversionError> {
    let station = Station::new(StopId::new(dto.id.clone())?, dto.name.clone());
    Ok(match dto.coordinates {
        Some(c) => station.with_coordinates(c.latitude, c.longitude),
        None => station,
    })
}

/// Convert a departure board, skipping entries with unusable train IDs.
pub fn convert_departures(departures: &[DepartureDto]) -> Vec<Departure> {
    departures
        .iter()
        .filter_map(|dto| {
            let id = match TrainId::new(dto.train.id.clone()) {
                Ok(id) => id,
                Err(e) => {
                    warn!(error = %e, "skipping departure");
                    return None;
                }
            };
            Some(Departure {
                train: TrainRef::new(id, dto.train.number.clone()),
            })
        })
        .collect()
}

/// Convert a timetable. Any bad stop rejects the whole timetable.
pub fn convert_timetable(dto: &TimetableDto) -> Result<RawTimetable, ConversionError> {
    let stops = dto
        .stops
        .iter()
        .map(convert_stop)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawTimetable::new(
        TrainId::new(dto.id.clone())?,
        dto.number.clone(),
        stops,
    ))
}

fn convert_stop(dto: &StopDto) -> Result<RawStop, ConversionError> {
    Ok(RawStop::new(
        StopId::new(dto.id.clone())?,
        parse_instant(dto.arrival.as_deref())?,
        parse_instant(dto.departure.as_deref())?,
    ))
}

/// Parse an optional RFC 3339 instant. Empty strings count as absent.
fn parse_instant(s: Option<&str>) -> Result<Option<DateTime<Utc>>, ConversionError> {
    match s {
        None | Some("") => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|_| ConversionError::InvalidTime(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::types::{CoordinatesDto, TrainDto};
    use chrono::TimeZone;

    fn stop_dto(id: &str, arr: Option<&str>, dep: Option<&str>) -> StopDto {
        StopDto {
            id: id.to_string(),
            arrival: arr.map(str::to_string),
            departure: dep.map(str::to_string),
        }
    }

    #[test]
    fn station_with_coordinates() {
        let dto = StationDto {
            id: "005501016".to_string(),
            name: "Budapest-Keleti".to_string(),
            coordinates: Some(CoordinatesDto {
                latitude: 47.5,
                longitude: 19.08,
            }),
        };
        let station = convert_station(&dto).unwrap();
        assert_eq!(station.id.as_str(), "005501016");
        assert_eq!(station.coordinates.unwrap().longitude, 19.08);
    }

    #[test]
    fn invalid_stations_skipped() {
        let stations = vec![
            StationDto {
                id: "A".to_string(),
                name: "Alpha".to_string(),
                coordinates: None,
            },
            StationDto {
                id: String::new(),
                name: "Nowhere".to_string(),
                coordinates: None,
            },
        ];
        let converted = convert_stations(&stations);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].name, "Alpha");
    }

    #[test]
    fn departures_keep_number() {
        let deps = vec![
            DepartureDto {
                train: TrainDto {
                    id: "t1".to_string(),
                    number: Some("100".to_string()),
                },
            },
            DepartureDto {
                train: TrainDto {
                    id: String::new(),
                    number: None,
                },
            },
        ];
        let converted = convert_departures(&deps);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].train.display_key(), "100");
    }

    #[test]
    fn timetable_times_normalized_to_utc() {
        let dto = TimetableDto {
            id: "t1".to_string(),
            number: None,
            stops: vec![
                stop_dto("A", None, Some("2026-10-20T08:00:00+02:00")),
                stop_dto("B", Some("2026-10-20T08:10:00+02:00"), Some("")),
            ],
        };
        let timetable = convert_timetable(&dto).unwrap();

        assert_eq!(timetable.stops[0].arrival, None);
        assert_eq!(
            timetable.stops[0].departure,
            Some(Utc.with_ymd_and_hms(2026, 10, 20, 6, 0, 0).unwrap())
        );
        assert_eq!(timetable.stops[1].departure, None);
    }

    #[test]
    fn bad_time_rejects_timetable() {
        let dto = TimetableDto {
            id: "t1".to_string(),
            number: None,
            stops: vec![stop_dto("A", Some("08:00"), None)],
        };
        assert!(matches!(
            convert_timetable(&dto),
            Err(ConversionError::InvalidTime(s)) if s == "08:00"
        ));
    }
}

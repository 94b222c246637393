//! Upstream JSON DTOs.
//!
//! These types map directly to the JSON served by the upstream proxy and
//! stored in snapshot files. Optional fields are omitted rather than sent
//! as null in many responses, so `Option` plus `#[serde(default)]` is used
//! liberally.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A station from `GET /stations`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationDto {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub coordinates: Option<CoordinatesDto>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct CoordinatesDto {
    pub latitude: f64,
    pub longitude: f64,
}

/// One departure board entry from `GET /stations/{id}/departures`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DepartureDto {
    pub train: TrainDto,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainDto {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub number: Option<String>,
}

/// A full timetable from `GET /trains/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimetableDto {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub number: Option<String>,
    #[serde(default)]
    pub stops: Vec<StopDto>,
}

/// A call at a stop. Times are RFC 3339 strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StopDto {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub arrival: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
}

/// Offline snapshot of everything a run needs.
///
/// `departures` is keyed by station ID, then by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SnapshotDto {
    pub stations: Vec<StationDto>,
    #[serde(default)]
    pub departures: HashMap<String, HashMap<String, Vec<DepartureDto>>>,
    #[serde(default)]
    pub trains: HashMap<String, TimetableDto>,
}

/// Upstream IDs and train numbers show up both as strings and as integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}

//! GTFS table rows.
//!
//! Field names are the GTFS column headers; `None` renders as an empty cell.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyRow {
    pub agency_id: String,
    pub agency_name: String,
    pub agency_url: String,
    pub agency_timezone: String,
    pub agency_lang: String,
    pub agency_phone: String,
    pub agency_fare_url: String,
    pub agency_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopRow {
    pub stop_id: String,
    pub stop_code: Option<String>,
    pub stop_name: String,
    pub stop_desc: Option<String>,
    pub stop_lat: Option<f64>,
    pub stop_lon: Option<f64>,
    pub zone_id: Option<String>,
    pub stop_url: Option<String>,
    pub location_type: u8,
    pub parent_station: Option<String>,
    pub stop_timezone: Option<String>,
    pub wheelchair_boarding: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRow {
    pub route_id: String,
    pub agency_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
    pub route_desc: Option<String>,
    pub route_type: u8,
    pub route_url: Option<String>,
    pub route_color: Option<String>,
    pub route_text_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRow {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    pub trip_headsign: Option<String>,
    pub trip_short_name: Option<String>,
    pub direction_id: Option<u8>,
    pub block_id: Option<String>,
    pub shape_id: Option<String>,
    pub wheelchair_accessible: Option<u8>,
    pub bikes_allowed: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopTimeRow {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: usize,
    pub stop_headsign: Option<String>,
    pub pickup_type: Option<u8>,
    pub drop_off_type: Option<u8>,
    pub shape_dist_traveled: Option<f64>,
    pub timepoint: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDateRow {
    pub service_id: String,
    /// YYYYMMDD
    pub date: String,
    /// 1 = service added on this date.
    pub exception_type: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedInfoRow {
    pub feed_publisher_name: String,
    pub feed_publisher_url: String,
    pub feed_lang: String,
    pub feed_start_date: String,
    pub feed_end_date: String,
    pub feed_version: String,
}

/// A named table; written as `<name>.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    name: &'static str,
    rows: Vec<R>,
}

impl<R> Table<R> {
    pub fn new(name: &'static str, rows: Vec<R>) -> Self {
        Self { name, rows }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn file_name(&self) -> String {
        format!("{}.txt", self.name)
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The seven tables of a feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedTables {
    pub agency: Table<AgencyRow>,
    pub stops: Table<StopRow>,
    pub routes: Table<RouteRow>,
    pub trips: Table<TripRow>,
    pub stop_times: Table<StopTimeRow>,
    pub calendar_dates: Table<CalendarDateRow>,
    pub feed_info: Table<FeedInfoRow>,
}

impl FeedTables {
    /// Row count per table, in file order.
    pub fn row_counts(&self) -> [(&'static str, usize); 7] {
        [
            (self.agency.name(), self.agency.len()),
            (self.stops.name(), self.stops.len()),
            (self.routes.name(), self.routes.len()),
            (self.trips.name(), self.trips.len()),
            (self.stop_times.name(), self.stop_times.len()),
            (self.calendar_dates.name(), self.calendar_dates.len()),
            (self.feed_info.name(), self.feed_info.len()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_file_name() {
        let table: Table<CalendarDateRow> = Table::new("calendar_dates", vec![]);
        assert_eq!(table.file_name(), "calendar_dates.txt");
        assert!(table.is_empty());
    }
}

//! Feed assembly.
//!
//! Timetables are canonicalized and grouped into trip patterns; each pattern
//! becomes one trip with its stop times taken from the first member and one
//! service date per member.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, trace, warn};

use crate::config::FeedConfig;
use crate::domain::{RawTimetable, Station, TrainId, TrainRef, civil_date};

use super::canonical::{CanonicalKey, CanonicalTimetable, canonicalize};
use super::tables::{
    AgencyRow, CalendarDateRow, FeedInfoRow, FeedTables, RouteRow, StopRow, StopTimeRow, Table,
    TripRow,
};

/// GTFS route_type for rail.
const ROUTE_TYPE_RAIL: u8 = 2;

/// exception_type for "service added on this date".
const SERVICE_ADDED: u8 = 1;

/// Timetables sharing one canonical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripGroup {
    pub key: CanonicalKey,
    /// Earliest member; its stops become the trip's stop times.
    pub template: CanonicalTimetable,
    /// First-stop departure of every member, template included.
    pub service_departures: Vec<DateTime<Utc>>,
    /// Member trains, template included.
    pub trains: Vec<TrainId>,
}

/// Result of grouping.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    pub groups: Vec<TripGroup>,
    /// Timetables rejected by canonicalization.
    pub skipped: usize,
}

/// Group timetables by canonical key.
///
/// Timetables are ordered by (first departure, train ID, key) first, so the
/// groups and their order do not depend on the input order.
pub fn group_timetables(timetables: &[RawTimetable]) -> Grouping {
    let mut skipped = 0;
    let mut canonical: Vec<CanonicalTimetable> = timetables
        .iter()
        .filter_map(|t| match canonicalize(t) {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(train = %t.id, error = %e, "skipping timetable");
                skipped += 1;
                None
            }
        })
        .collect();

    canonical.sort_by(|a, b| {
        a.first_departure
            .cmp(&b.first_departure)
            .then_with(|| a.train.cmp(&b.train))
            .then_with(|| a.key.cmp(&b.key))
    });

    let mut index: HashMap<CanonicalKey, usize> = HashMap::new();
    let mut groups: Vec<TripGroup> = Vec::new();

    for timetable in canonical {
        match index.get(&timetable.key) {
            Some(&i) => {
                let group = &mut groups[i];
                group.service_departures.push(timetable.first_departure);
                group.trains.push(timetable.train);
            }
            None => {
                index.insert(timetable.key.clone(), groups.len());
                groups.push(TripGroup {
                    key: timetable.key.clone(),
                    service_departures: vec![timetable.first_departure],
                    trains: vec![timetable.train.clone()],
                    template: timetable,
                });
            }
        }
    }

    debug!(groups = groups.len(), skipped, "grouped timetables");

    Grouping { groups, skipped }
}

/// First and last civil day of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A finished feed.
#[derive(Debug, Clone)]
pub struct BuiltFeed {
    pub tables: FeedTables,
    pub trip_groups: usize,
    pub skipped_timetables: usize,
}

/// Assembles the seven feed tables.
pub struct FeedBuilder<'a> {
    config: &'a FeedConfig,
}

impl<'a> FeedBuilder<'a> {
    pub fn new(config: &'a FeedConfig) -> Self {
        Self { config }
    }

    pub fn build(
        &self,
        period: FeedPeriod,
        stations: &[Station],
        trains: &[TrainRef],
        timetables: &[RawTimetable],
    ) -> BuiltFeed {
        let tz = self.config.timezone;
        let grouping = group_timetables(timetables);

        let mut trips = Vec::with_capacity(grouping.groups.len());
        let mut stop_times = Vec::new();
        let mut calendar_dates = Vec::new();

        for (i, group) in grouping.groups.iter().enumerate() {
            let display_key = &group.template.display_key;
            let service_id = format!("{display_key}-{i}");
            trace!(%service_id, members = group.trains.len(), "trip");

            trips.push(TripRow {
                route_id: display_key.clone(),
                service_id: service_id.clone(),
                trip_id: service_id.clone(),
                trip_headsign: None,
                trip_short_name: None,
                direction_id: None,
                block_id: None,
                shape_id: None,
                wheelchair_accessible: None,
                bikes_allowed: None,
            });

            for (sequence, stop) in group.template.stops.iter().enumerate() {
                stop_times.push(StopTimeRow {
                    trip_id: service_id.clone(),
                    arrival_time: wall_clock(stop.arrival, tz),
                    departure_time: wall_clock(stop.departure, tz),
                    stop_id: stop.stop_id.as_str().to_string(),
                    stop_sequence: sequence,
                    stop_headsign: None,
                    pickup_type: None,
                    drop_off_type: None,
                    shape_dist_traveled: None,
                    timepoint: None,
                });
            }

            for departure in &group.service_departures {
                calendar_dates.push(CalendarDateRow {
                    service_id: service_id.clone(),
                    date: gtfs_date(civil_date(*departure, tz)),
                    exception_type: SERVICE_ADDED,
                });
            }
        }

        let tables = FeedTables {
            agency: Table::new("agency", vec![self.agency_row()]),
            stops: Table::new("stops", stations.iter().map(stop_row).collect()),
            routes: Table::new("routes", self.route_rows(trains, &grouping.groups)),
            trips: Table::new("trips", trips),
            stop_times: Table::new("stop_times", stop_times),
            calendar_dates: Table::new("calendar_dates", calendar_dates),
            feed_info: Table::new("feed_info", vec![self.feed_info_row(period)]),
        };

        info!(
            trips = tables.trips.len(),
            stop_times = tables.stop_times.len(),
            calendar_dates = tables.calendar_dates.len(),
            skipped = grouping.skipped,
            "feed assembled"
        );

        BuiltFeed {
            tables,
            trip_groups: grouping.groups.len(),
            skipped_timetables: grouping.skipped,
        }
    }

    fn agency_row(&self) -> AgencyRow {
        let agency = &self.config.agency;
        AgencyRow {
            agency_id: agency.id.clone(),
            agency_name: agency.name.clone(),
            agency_url: agency.url.clone(),
            agency_timezone: self.config.timezone.name().to_string(),
            agency_lang: agency.lang.clone(),
            agency_phone: agency.phone.clone(),
            agency_fare_url: agency.fare_url.clone(),
            agency_email: agency.email.clone(),
        }
    }

    /// One route per distinct display key: discovered trains first, then any
    /// trip whose timetable reported a number no board showed.
    fn route_rows(&self, trains: &[TrainRef], groups: &[TripGroup]) -> Vec<RouteRow> {
        let mut seen = HashSet::new();
        trains
            .iter()
            .map(TrainRef::display_key)
            .chain(groups.iter().map(|g| g.template.display_key.as_str()))
            .filter(|key| seen.insert(*key))
            .map(|key| RouteRow {
                route_id: key.to_string(),
                agency_id: self.config.agency.id.clone(),
                route_short_name: key.to_string(),
                route_long_name: key.to_string(),
                route_desc: None,
                route_type: ROUTE_TYPE_RAIL,
                route_url: None,
                route_color: None,
                route_text_color: None,
            })
            .collect()
    }

    fn feed_info_row(&self, period: FeedPeriod) -> FeedInfoRow {
        let publisher = &self.config.publisher;
        FeedInfoRow {
            feed_publisher_name: publisher.name.clone(),
            feed_publisher_url: publisher.url.clone(),
            feed_lang: publisher.lang.clone(),
            feed_start_date: gtfs_date(period.start),
            feed_end_date: gtfs_date(period.end),
            feed_version: publisher.version.clone(),
        }
    }
}

fn stop_row(station: &Station) -> StopRow {
    StopRow {
        stop_id: station.id.as_str().to_string(),
        stop_code: None,
        stop_name: station.name.clone(),
        stop_desc: None,
        stop_lat: station.coordinates.map(|c| c.latitude),
        stop_lon: station.coordinates.map(|c| c.longitude),
        zone_id: None,
        stop_url: None,
        location_type: 0,
        parent_station: None,
        stop_timezone: None,
        wheelchair_boarding: None,
    }
}

/// HH:MM:SS in the railway zone.
fn wall_clock(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M:%S").to_string()
}

/// YYYYMMDD
fn gtfs_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawStop, StopId};
    use chrono::TimeZone;
    use chrono_tz::Europe::Budapest;

    fn local(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Budapest
            .with_ymd_and_hms(2026, 10, d, h, m, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn stop(id: &str, arr: Option<DateTime<Utc>>, dep: Option<DateTime<Utc>>) -> RawStop {
        RawStop::new(StopId::new(id).unwrap(), arr, dep)
    }

    fn train_100(d: u32) -> RawTimetable {
        RawTimetable::new(
            TrainId::new(format!("100-{d}")).unwrap(),
            Some("100".to_string()),
            vec![
                stop("A", None, Some(local(d, 8, 0))),
                stop("B", Some(local(d, 8, 10)), None),
            ],
        )
    }

    fn train_200(d: u32) -> RawTimetable {
        RawTimetable::new(
            TrainId::new(format!("200-{d}")).unwrap(),
            Some("200".to_string()),
            vec![
                stop("B", None, Some(local(d, 9, 0))),
                stop("A", Some(local(d, 9, 20)), Some(local(d, 9, 21))),
            ],
        )
    }

    fn period() -> FeedPeriod {
        FeedPeriod {
            start: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(),
        }
    }

    fn stations() -> Vec<Station> {
        vec![
            Station::new(StopId::new("A").unwrap(), "Alpha").with_coordinates(47.5, 19.04),
            Station::new(StopId::new("B").unwrap(), "Beta"),
        ]
    }

    fn build(config: &FeedConfig, timetables: &[RawTimetable]) -> BuiltFeed {
        FeedBuilder::new(config).build(period(), &stations(), &[], timetables)
    }

    #[test]
    fn groups_repeat_runs_into_one_trip() {
        let config = FeedConfig::default();
        let feed = build(&config, &[train_100(20), train_200(20), train_100(21)]);

        assert_eq!(feed.trip_groups, 2);
        let trips: Vec<_> = feed.tables.trips.rows().iter().map(|t| &t.trip_id).collect();
        assert_eq!(trips, vec!["100-0", "200-1"]);

        let dates: Vec<_> = feed
            .tables
            .calendar_dates
            .rows()
            .iter()
            .map(|c| (c.service_id.as_str(), c.date.as_str(), c.exception_type))
            .collect();
        assert_eq!(
            dates,
            vec![
                ("100-0", "20261020", 1),
                ("100-0", "20261021", 1),
                ("200-1", "20261020", 1)
            ]
        );
    }

    #[test]
    fn stop_times_use_local_wall_clock() {
        let config = FeedConfig::default();
        let feed = build(&config, &[train_100(20)]);

        let rows = feed.tables.stop_times.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].stop_id, "A");
        assert_eq!(rows[0].stop_sequence, 0);
        assert_eq!(rows[0].arrival_time, "08:00:00");
        assert_eq!(rows[0].departure_time, "08:00:00");
        assert_eq!(rows[1].stop_id, "B");
        assert_eq!(rows[1].stop_sequence, 1);
        assert_eq!(rows[1].arrival_time, "08:10:00");
        assert_eq!(rows[1].departure_time, "08:10:00");
    }

    #[test]
    fn late_evening_departure_dated_in_railway_zone() {
        // 23:30 local on the 20th is 21:30 UTC; still the 20th.
        let late = RawTimetable::new(
            TrainId::new("night").unwrap(),
            None,
            vec![stop("A", None, Some(local(20, 23, 30)))],
        );
        let feed = build(&FeedConfig::default(), &[late]);
        assert_eq!(feed.tables.calendar_dates.rows()[0].date, "20261020");
    }

    #[test]
    fn broken_timetables_skipped_and_counted() {
        let broken = RawTimetable::new(
            TrainId::new("broken").unwrap(),
            None,
            vec![stop("A", None, None)],
        );
        let empty = RawTimetable::new(TrainId::new("empty").unwrap(), None, vec![]);
        let feed = build(&FeedConfig::default(), &[broken, train_100(20), empty]);

        assert_eq!(feed.skipped_timetables, 2);
        assert_eq!(feed.tables.trips.len(), 1);
    }

    #[test]
    fn fixed_tables() {
        let config = FeedConfig::default();
        let feed = build(&config, &[]);

        let agency = &feed.tables.agency.rows()[0];
        assert_eq!(agency.agency_id, "máv");
        assert_eq!(agency.agency_timezone, "Europe/Budapest");

        let stops = feed.tables.stops.rows();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].stop_lat, Some(47.5));
        assert_eq!(stops[1].stop_lat, None);
        assert_eq!(stops[1].location_type, 0);

        let info = &feed.tables.feed_info.rows()[0];
        assert_eq!(info.feed_start_date, "20261020");
        assert_eq!(info.feed_end_date, "20261021");
        assert_eq!(info.feed_publisher_name, "gtfs.directory");

        assert!(feed.tables.trips.is_empty());
    }

    #[test]
    fn routes_one_per_display_key() {
        let config = FeedConfig::default();
        let trains = vec![
            TrainRef::new(TrainId::new("100-20").unwrap(), Some("100".to_string())),
            TrainRef::new(TrainId::new("100-21").unwrap(), Some("100".to_string())),
            TrainRef::new(TrainId::new("x").unwrap(), None),
        ];
        // 200 only appears in a timetable.
        let feed = FeedBuilder::new(&config).build(
            period(),
            &stations(),
            &trains,
            &[train_100(20), train_200(20)],
        );

        let routes: Vec<_> = feed
            .tables
            .routes
            .rows()
            .iter()
            .map(|r| r.route_id.as_str())
            .collect();
        assert_eq!(routes, vec!["100", "x", "200"]);
        assert!(feed.tables.routes.rows().iter().all(|r| r.route_type == 2));
    }

    #[test]
    fn grouping_ignores_input_order() {
        let forward = group_timetables(&[train_100(20), train_200(20), train_100(21)]);
        let backward = group_timetables(&[train_100(21), train_200(20), train_100(20)]);
        assert_eq!(forward.groups, backward.groups);
        assert_eq!(forward.groups[0].trains[0].as_str(), "100-20");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{RawStop, StopId};
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn timetables() -> Vec<RawTimetable> {
        let base = DateTime::from_timestamp(1_792_483_200, 0).unwrap();
        let mut out = Vec::new();
        for day in 0..3i64 {
            for (n, (number, dwell)) in [("100", 1), ("200", 2), ("100", 5)].iter().enumerate() {
                let start = base + TimeDelta::days(day) + TimeDelta::hours(n as i64);
                out.push(RawTimetable::new(
                    TrainId::new(format!("{number}-{n}-{day}")).unwrap(),
                    Some(number.to_string()),
                    vec![
                        RawStop::new(StopId::new("A").unwrap(), None, Some(start)),
                        RawStop::new(
                            StopId::new("B").unwrap(),
                            Some(start + TimeDelta::minutes(30)),
                            Some(start + TimeDelta::minutes(30 + dwell)),
                        ),
                    ],
                ));
            }
        }
        out
    }

    proptest! {
        /// Any permutation of the input yields identical tables
        #[test]
        fn build_is_order_independent(shuffled in Just(timetables()).prop_shuffle()) {
            let config = FeedConfig::default();
            let period = FeedPeriod {
                start: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                end: NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(),
            };
            let builder = FeedBuilder::new(&config);
            let expected = builder.build(period, &[], &[], &timetables());
            let actual = builder.build(period, &[], &[], &shuffled);

            prop_assert_eq!(actual.trip_groups, 3);
            prop_assert_eq!(actual.tables, expected.tables);
        }
    }
}

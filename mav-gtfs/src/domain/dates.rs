//! Civil-day arithmetic in the railway timezone.
//!
//! A "day" here is a calendar date, not 24 hours: stepping across a DST
//! change yields a 23h or 25h gap between consecutive start-of-day instants.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

/// Error returned when a range starts after it ends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid range: start {start} is after end {end}")]
pub struct InvalidRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// First existing local instant of `date` in `tz`.
///
/// Normally midnight; zones that skip midnight on a DST change start the
/// day at the first hour that exists.
pub fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..24)
        .find_map(|h| {
            tz.from_local_datetime(&(midnight + TimeDelta::hours(h)))
                .earliest()
        })
        // No zone skips a whole day; fall back to reading the local time as UTC.
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// Civil date of an instant in `tz`.
pub fn civil_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Every civil day from `start` through `end` inclusive, as start-of-day
/// instants in `tz`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use mav_gtfs::domain::date_range;
///
/// let start = Utc.with_ymd_and_hms(2026, 10, 24, 12, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2026, 10, 26, 1, 0, 0).unwrap();
/// let days = date_range(start, end, chrono_tz::Europe::Budapest).unwrap();
///
/// assert_eq!(days.len(), 3);
/// assert!(date_range(end, start, chrono_tz::Europe::Budapest).is_err());
/// ```
pub fn date_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tz: Tz,
) -> Result<Vec<DateTime<Tz>>, InvalidRange> {
    if start > end {
        return Err(InvalidRange { start, end });
    }

    let first = civil_date(start, tz);
    let last = civil_date(end, tz);

    let mut days = Vec::new();
    let mut current = Some(first);
    while let Some(date) = current.filter(|d| *d <= last) {
        days.push(start_of_day(date, tz));
        current = date.checked_add_days(Days::new(1));
    }

    Ok(days)
}

/// Number of civil days from `from` to `to` (negative if `to` is earlier).
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>, tz: Tz) -> i64 {
    (civil_date(to, tz) - civil_date(from, tz)).num_days()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono_tz::Europe::Budapest;
    use proptest::prelude::*;

    prop_compose! {
        fn instant()(secs in 1_700_000_000i64..1_900_000_000i64) -> DateTime<Utc> {
            DateTime::from_timestamp(secs, 0).unwrap()
        }
    }

    proptest! {
        /// Length is the civil-day distance plus one; entries are consecutive dates
        #[test]
        fn one_entry_per_civil_day(a in instant(), span in 0i64..(60 * 86_400)) {
            let b = a + TimeDelta::seconds(span);
            let days = date_range(a, b, Budapest).unwrap();

            prop_assert_eq!(days.len() as i64, days_between(a, b, Budapest) + 1);
            prop_assert_eq!(days[0].date_naive(), civil_date(a, Budapest));
            prop_assert_eq!(days[days.len() - 1].date_naive(), civil_date(b, Budapest));
            for pair in days.windows(2) {
                prop_assert_eq!(pair[0].date_naive().succ_opt(), Some(pair[1].date_naive()));
            }
        }

        /// Reversed bounds always fail
        #[test]
        fn reversed_fails(a in instant(), span in 1i64..(60 * 86_400)) {
            let b = a + TimeDelta::seconds(span);
            prop_assert!(date_range(b, a, Budapest).is_err());
        }
    }
}

//! Run configuration for feed generation.

use std::time::Duration;

use chrono_tz::Tz;

/// Default number of upstream requests in flight per fetch phase.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Default per-attempt deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of attempts per task (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry; doubled for each further retry.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Feeds may not end further than this many days ahead of today.
pub const DEFAULT_HORIZON_DAYS: i64 = 25;

/// The agency row of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgencyInfo {
    pub id: String,
    pub name: String,
    pub url: String,
    pub lang: String,
    pub phone: String,
    pub fare_url: String,
    pub email: String,
}

impl Default for AgencyInfo {
    fn default() -> Self {
        Self {
            id: "máv".to_string(),
            name: "Magyar Államvasutak".to_string(),
            url: "https://www.mavcsoport.hu/".to_string(),
            lang: "hu".to_string(),
            phone: "+3613494949".to_string(),
            fare_url: "https://www.mavcsoport.hu/".to_string(),
            email: "informacio@mav-start.hu".to_string(),
        }
    }
}

/// Publisher fields of the feed_info row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherInfo {
    pub name: String,
    pub url: String,
    pub lang: String,
    pub version: String,
}

impl Default for PublisherInfo {
    fn default() -> Self {
        Self {
            name: "gtfs.directory".to_string(),
            url: "https://gtfs.directory".to_string(),
            lang: "en".to_string(),
            version: String::new(),
        }
    }
}

/// Configuration for one feed build.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Maximum upstream requests in flight per phase.
    pub concurrency: usize,

    /// Deadline for a single attempt.
    pub timeout: Duration,

    /// Attempts per task before it is dropped.
    pub max_attempts: u32,

    /// Base delay between attempts.
    pub backoff: Duration,

    /// How far ahead of today the window may end (civil days).
    pub horizon_days: i64,

    /// Railway timezone: civil days, wall-clock times and feed dates.
    pub timezone: Tz,

    pub agency: AgencyInfo,

    pub publisher: PublisherInfo,
}

impl FeedConfig {
    /// Set the concurrency cap.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of attempts per task.
    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the base retry backoff.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_horizon_days(mut self, days: i64) -> Self {
        self.horizon_days = days;
        self
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
            horizon_days: DEFAULT_HORIZON_DAYS,
            timezone: chrono_tz::Europe::Budapest,
            agency: AgencyInfo::default(),
            publisher: PublisherInfo::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = FeedConfig::default();

        assert_eq!(config.concurrency, 16);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.backoff, Duration::from_secs(1));
        assert_eq!(config.horizon_days, 25);
        assert_eq!(config.timezone, chrono_tz::Europe::Budapest);
        assert_eq!(config.agency.id, "máv");
        assert_eq!(config.publisher.name, "gtfs.directory");
    }

    #[test]
    fn builder() {
        let config = FeedConfig::default()
            .with_concurrency(4)
            .with_timeout(Duration::from_millis(50))
            .with_max_attempts(5)
            .with_backoff(Duration::ZERO)
            .with_horizon_days(10)
            .with_timezone(chrono_tz::Europe::Vienna);

        assert_eq!(config.concurrency, 4);
        assert_eq!(config.timeout, Duration::from_millis(50));
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.backoff, Duration::ZERO);
        assert_eq!(config.horizon_days, 10);
        assert_eq!(config.timezone, chrono_tz::Europe::Vienna);
    }
}

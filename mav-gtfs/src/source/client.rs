//! HTTP client for the upstream rail JSON API.
//!
//! Endpoints:
//! - `GET {base}/stations`
//! - `GET {base}/stations/{id}/departures?date=YYYY-MM-DD`
//! - `GET {base}/trains/{id}` (`404` or `null` when the train is unknown)

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::domain::{Departure, RawTimetable, Station, TrainId};

use super::TransitSource;
use super::convert::{convert_departures, convert_stations, convert_timetable};
use super::error::SourceError;
use super::types::{DepartureDto, StationDto, TimetableDto};

/// Configuration for the HTTP source.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Base URL of the upstream API
    pub base_url: String,
    /// Optional API key, sent as `x-apikey`
    pub api_key: Option<String>,
    /// Transport-level request timeout in seconds
    pub timeout_secs: u64,
}

impl SourceConfig {
    /// Create a new config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Upstream API client.
///
/// Concurrency is bounded by the caller; this client issues whatever it is
/// asked to.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// Create a new client with the given configuration.
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| SourceError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert("x-apikey", value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    fn stations_url(&self) -> String {
        format!("{}/stations", self.base_url)
    }

    fn departures_url(&self, station: &Station) -> String {
        format!(
            "{}/stations/{}/departures",
            self.base_url,
            urlencoding::encode(station.id.as_str())
        )
    }

    fn train_url(&self, train: &TrainId) -> String {
        format!(
            "{}/trains/{}",
            self.base_url,
            urlencoding::encode(train.as_str())
        )
    }

    /// GET a JSON document. `Ok(None)` for `404` and `null` bodies.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, SourceError> {
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(SourceError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str::<Option<T>>(&body).map_err(|e| SourceError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl TransitSource for HttpSource {
    async fn stations(&self) -> Result<Vec<Station>, SourceError> {
        let stations: Vec<StationDto> = self
            .get_json(&self.stations_url(), &[])
            .await?
            .unwrap_or_default();
        Ok(convert_stations(&stations))
    }

    async fn departures(
        &self,
        station: &Station,
        date: NaiveDate,
    ) -> Result<Vec<Departure>, SourceError> {
        let query = [("date", date.format("%Y-%m-%d").to_string())];
        let departures: Vec<DepartureDto> = self
            .get_json(&self.departures_url(station), &query)
            .await?
            .unwrap_or_default();
        Ok(convert_departures(&departures))
    }

    async fn timetable(&self, train: &TrainId) -> Result<Option<RawTimetable>, SourceError> {
        let timetable: Option<TimetableDto> = self.get_json(&self.train_url(train), &[]).await?;
        Ok(timetable.as_ref().map(convert_timetable).transpose()?)
    }
}

// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Nudge Household.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use crate::errors::{HaError, HaResult};
use crate::types::{HaHistoryState, HistoryDataPoint};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, trace, warn};

const SUPERVISOR_URL: &str = "http://supervisor/core";
const DEFAULT_BASE_URL: &str = "http://localhost:8123";

/// Home Assistant REST API client
#[derive(Clone)]
pub struct HomeAssistantClient {
    base_url: String,
    token: String,
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl std::fmt::Debug for HomeAssistantClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomeAssistantClient")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish_non_exhaustive()
    }
}

impl HomeAssistantClient {
    /// Create a new HA client with custom configuration
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> HaResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| HaError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.into(),
            client,
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
        })
    }

    /// Create HA client using Supervisor API environment variables
    /// This is the standard method for HA addons
    pub fn from_supervisor() -> HaResult<Self> {
        let token = std::env::var("SUPERVISOR_TOKEN").map_err(|_| {
            HaError::ConfigError(
                "SUPERVISOR_TOKEN environment variable not set. Are you running as an HA addon?"
                    .to_owned(),
            )
        })?;

        info!("Initializing HA client using Supervisor API");
        Self::new(SUPERVISOR_URL, token)
    }

    /// Create HA client for development/testing with custom URL
    pub fn from_env() -> HaResult<Self> {
        let base_url = std::env::var("HA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let token = std::env::var("HA_TOKEN")
            .map_err(|_| HaError::ConfigError("HA_TOKEN environment variable not set".to_owned()))?;

        info!("Initializing HA client for development: {base_url}");
        Self::new(base_url, token)
    }

    /// Create HA client from configuration values.
    ///
    /// Without a configured token the Supervisor token is preferred, then
    /// `HA_TOKEN`.
    pub fn from_config(ha_base_url: Option<String>, ha_token: Option<String>) -> HaResult<Self> {
        if ha_token.is_none() && std::env::var("SUPERVISOR_TOKEN").is_ok() {
            return Self::from_supervisor();
        }

        let base_url = ha_base_url
            .or_else(|| std::env::var("HA_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        let token = ha_token
            .or_else(|| std::env::var("HA_TOKEN").ok())
            .ok_or_else(|| {
                HaError::ConfigError(
                    "HA token not found in config or HA_TOKEN environment variable".to_owned(),
                )
            })?;

        info!("Initializing HA client from configuration: {base_url}");
        Self::new(base_url, token)
    }

    /// Health check - ping HA API
    pub async fn ping(&self) -> HaResult<bool> {
        let url = format!("{}/api/", self.base_url);
        debug!("Performing health check");

        match self.client.get(&url).bearer_auth(&self.token).send().await {
            Ok(response) => {
                let is_ok = response.status().is_success();
                if is_ok {
                    debug!("Health check passed");
                } else {
                    warn!("Health check failed: status {}", response.status());
                }
                Ok(is_ok)
            }
            Err(e) => {
                warn!("Health check failed: {e}");
                Ok(false)
            }
        }
    }

    /// Get Home Assistant configuration (including timezone)
    pub async fn get_config(&self) -> HaResult<Value> {
        let url = format!("{}/api/config", self.base_url);
        debug!("Fetching Home Assistant configuration");

        let response = self
            .retry_request(|| async { self.client.get(&url).bearer_auth(&self.token).send().await })
            .await?;

        match response.status() {
            StatusCode::OK => {
                let config: Value = serde_json::from_str(&response.text().await?)?;
                debug!("✅ Retrieved HA configuration");
                Ok(config)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(HaError::AuthenticationFailed),
            status => Err(HaError::ApiError {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    /// Get Home Assistant timezone
    pub async fn get_timezone(&self) -> HaResult<String> {
        let config = self.get_config().await?;

        config
            .get("time_zone")
            .and_then(Value::as_str)
            .map(|tz| {
                info!("🌍 Home Assistant timezone: {tz}");
                tz.to_owned()
            })
            .ok_or_else(|| HaError::ConfigError("Timezone not found in HA config".to_owned()))
    }

    /// Get the numeric history of a statistic entity
    ///
    /// # Arguments
    /// * `entity_id` - Entity ID to fetch history for (e.g., "sensor.grid_import_energy")
    /// * `start_time` - Start of the time range
    /// * `end_time` - Optional end of the time range (defaults to now)
    ///
    /// # Returns
    /// Data points in time order; non-numeric states (`unavailable`,
    /// `unknown`) are skipped.
    pub async fn get_history(
        &self,
        entity_id: &str,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
    ) -> HaResult<Vec<HistoryDataPoint>> {
        let end = end_time.unwrap_or_else(Utc::now);

        // HA history API expects ISO 8601 timestamps; end_time goes in the query
        let start_str = start_time.to_rfc3339();
        let end_str = end.to_rfc3339();

        let url = format!(
            "{}/api/history/period/{}?filter_entity_id={}&end_time={}&no_attributes",
            self.base_url,
            start_str,
            entity_id,
            urlencoding::encode(&end_str)
        );

        debug!("📊 [HA HISTORY] Fetching history for: {entity_id}");
        debug!("   Time range: {start_str} to {end_str}");
        trace!("   URL: {url}");

        let response = self
            .retry_request(|| async { self.client.get(&url).bearer_auth(&self.token).send().await })
            .await?;

        match response.status() {
            StatusCode::OK => {
                // One inner array per filtered entity
                let history: Vec<Vec<HaHistoryState>> =
                    serde_json::from_str(&response.text().await?)?;

                let Some(entity_history) = history.into_iter().next() else {
                    debug!("⚠️ [HA HISTORY] No history data returned for {entity_id}");
                    return Ok(Vec::new());
                };

                let data_points = parse_history(&entity_history);
                debug!(
                    "✅ [HA HISTORY] Retrieved {} data points for {entity_id}",
                    data_points.len()
                );
                Ok(data_points)
            }
            StatusCode::NOT_FOUND => {
                error!("❌ [HA HISTORY] Entity not found: {entity_id}");
                Err(HaError::EntityNotFound(entity_id.to_owned()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("❌ [HA HISTORY] Authentication failed for: {entity_id}");
                Err(HaError::AuthenticationFailed)
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                error!("❌ [HA HISTORY] Status {status}: {error_text}");
                Err(HaError::ApiError {
                    status: status.as_u16(),
                    message: error_text,
                })
            }
        }
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut>(&self, mut request_fn: F) -> HaResult<reqwest::Response>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay;

        loop {
            attempts += 1;
            match request_fn().await {
                Ok(response) => return Ok(response),
                Err(e) if attempts >= self.max_retries => {
                    error!("Request failed after {attempts} attempts: {e}");
                    return Err(HaError::HttpError(e));
                }
                Err(e) => {
                    warn!(
                        "Request failed (attempt {attempts}/{}): {e}. Retrying in {delay:?}",
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }

    /// Set custom retry configuration
    #[must_use]
    pub fn with_retry_config(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }
}

fn parse_history(states: &[HaHistoryState]) -> Vec<HistoryDataPoint> {
    let mut data_points = Vec::with_capacity(states.len());
    for state in states {
        let Ok(value) = state.state.parse::<f64>() else {
            trace!("Skipping non-numeric state: {}", state.state);
            continue;
        };
        let Ok(timestamp) = DateTime::parse_from_rfc3339(&state.last_updated) else {
            trace!("Could not parse timestamp: {}", state.last_updated);
            continue;
        };
        data_points.push(HistoryDataPoint {
            timestamp: timestamp.with_timezone(&Utc),
            value,
        });
    }
    data_points.sort_by_key(|point| point.timestamp);
    data_points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn history_body() -> String {
        json!([[
            {
                "entity_id": "sensor.grid_in",
                "state": "100.5",
                "last_changed": "2025-03-13T00:00:00+00:00",
                "last_updated": "2025-03-13T00:00:00+00:00"
            },
            {
                "entity_id": "sensor.grid_in",
                "state": "unavailable",
                "last_changed": "2025-03-13T06:00:00+00:00",
                "last_updated": "2025-03-13T06:00:00+00:00"
            },
            {
                "entity_id": "sensor.grid_in",
                "state": "104.0",
                "last_changed": "2025-03-13T12:00:00+00:00",
                "last_updated": "2025-03-13T12:00:00+00:00"
            }
        ]])
        .to_string()
    }

    #[tokio::test]
    async fn test_get_history_parses_numeric_states() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                Matcher::Regex(r"^/api/history/period/2025-03-13T00:00:00".to_owned()),
            )
            .match_header("authorization", "Bearer test_token")
            .match_query(Matcher::UrlEncoded(
                "filter_entity_id".to_owned(),
                "sensor.grid_in".to_owned(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(history_body())
            .create_async()
            .await;

        let client = HomeAssistantClient::new(server.url(), "test_token").unwrap();
        let start = Utc.with_ymd_and_hms(2025, 3, 13, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 13, 18, 0, 0).unwrap();
        let points = client
            .get_history("sensor.grid_in", start, Some(end))
            .await
            .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, 100.5);
        assert_eq!(points[1].value, 104.0);
        assert_eq!(points[1].timestamp, Utc.with_ymd_and_hms(2025, 3, 13, 12, 0, 0).unwrap());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_history_empty_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/api/history/period/".to_owned()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = HomeAssistantClient::new(server.url(), "test_token").unwrap();
        let points = client
            .get_history("sensor.grid_in", Utc::now(), None)
            .await
            .unwrap();

        assert!(points.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_history_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Regex(r"^/api/history/period/".to_owned()))
            .with_status(200)
            .with_body("{\"message\": \"not a history\"}")
            .create_async()
            .await;

        let client = HomeAssistantClient::new(server.url(), "test_token").unwrap();
        let result = client.get_history("sensor.grid_in", Utc::now(), None).await;

        assert!(matches!(result, Err(HaError::JsonError(_))));
    }

    #[tokio::test]
    async fn test_get_history_unauthorized() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(r"^/api/history/period/".to_owned()))
            .with_status(401)
            .create_async()
            .await;

        let client = HomeAssistantClient::new(server.url(), "bad_token").unwrap();
        let result = client.get_history("sensor.grid_in", Utc::now(), None).await;

        assert!(matches!(result, Err(HaError::AuthenticationFailed)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_timezone() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/config")
            .match_header("authorization", "Bearer test_token")
            .with_status(200)
            .with_body(json!({"time_zone": "Europe/Prague", "version": "2025.3.0"}).to_string())
            .create_async()
            .await;

        let client = HomeAssistantClient::new(server.url(), "test_token").unwrap();
        assert_eq!(client.get_timezone().await.unwrap(), "Europe/Prague");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_timezone_missing() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/config")
            .with_status(200)
            .with_body(json!({"version": "2025.3.0"}).to_string())
            .create_async()
            .await;

        let client = HomeAssistantClient::new(server.url(), "test_token").unwrap();
        assert!(matches!(
            client.get_timezone().await,
            Err(HaError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_ping_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/")
            .match_header("authorization", "Bearer test_token")
            .with_status(200)
            .create_async()
            .await;

        let client = HomeAssistantClient::new(server.url(), "test_token").unwrap();
        assert!(client.ping().await.unwrap());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ping_unreachable_is_not_an_error() {
        let client = HomeAssistantClient::new("http://127.0.0.1:9", "token")
            .unwrap()
            .with_retry_config(1, Duration::from_millis(1));
        assert!(!client.ping().await.unwrap());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = HomeAssistantClient::new("http://ha.local:8123/", "token").unwrap();
        assert_eq!(client.base_url, "http://ha.local:8123");
    }
}

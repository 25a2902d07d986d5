use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ComparisonQuery, ComparisonResult, LapRecord};
use crate::errors::LapdeckError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body for the comparison endpoint.
#[derive(Serialize)]
struct CompareRequest<'q> {
    driver1: &'q str,
    driver2: &'q str,
    session_id: &'q str,
}

/// Successful comparison response. The service echoes the driver pair next
/// to the lap rows; only the rows are consumed here, the echo that matters
/// for staleness is the locally tagged query.
#[derive(Deserialize)]
struct CompareResponse {
    comparison: Vec<LapRecord>,
}

#[derive(Deserialize)]
struct SessionsResponse {
    sessions: Vec<String>,
}

/// Client for the telemetry API service. Every call is a single fresh
/// request; nothing is cached or retried here.
pub struct TelemetryApiClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl TelemetryApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("could not build HTTP client");
        Self { base_url, http }
    }

    /// Requests per-lap timing for the two drivers of `query` within its
    /// session. Issues exactly one outbound call.
    pub fn compare(&self, query: &ComparisonQuery) -> Result<ComparisonResult, LapdeckError> {
        let url = format!("{}/api/compare", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&CompareRequest {
                driver1: &query.driver_a,
                driver2: &query.driver_b,
                session_id: &query.session_id,
            })
            .send()
            .map_err(|e| LapdeckError::NetworkError {
                url: url.clone(),
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(LapdeckError::ServiceError {
                status: response.status().as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let payload: CompareResponse = response
            .json()
            .map_err(|e| LapdeckError::MalformedResponse { source: e })?;
        Ok(ComparisonResult::new(query.clone(), payload.comparison))
    }

    /// Lists the session identifiers the service knows about. Used to
    /// populate the session selector.
    pub fn sessions(&self) -> Result<Vec<String>, LapdeckError> {
        let url = format!("{}/api/sessions", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| LapdeckError::NetworkError {
                url: url.clone(),
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(LapdeckError::ServiceError {
                status: response.status().as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let payload: SessionsResponse = response
            .json()
            .map_err(|e| LapdeckError::MalformedResponse { source: e })?;
        Ok(payload.sessions)
    }
}

pub mod client;

use std::sync::{Arc, mpsc::Sender};
use std::thread;

pub use client::TelemetryApiClient;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::LapdeckError;

/// The selection tuple a comparison is computed for. Also used as the tag
/// that pairs a fetch with the selection that triggered it, so a response
/// arriving after the selection moved on can be recognized and dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComparisonQuery {
    pub session_id: String,
    pub driver_a: String,
    pub driver_b: String,
}

/// One row of aligned per-lap timing for the two compared drivers.
///
/// A lap may be present for one driver and absent for the other (retirement,
/// pit lap filtered upstream); rows are kept partial rather than rejected.
/// Wire names follow the comparison service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LapRecord {
    pub lap: u32,
    /// Lap time in seconds for the first selected driver
    #[serde(rename = "driver1Time", skip_serializing_if = "Option::is_none")]
    pub driver_a_time: Option<f64>,
    /// Lap time in seconds for the second selected driver
    #[serde(rename = "driver2Time", skip_serializing_if = "Option::is_none")]
    pub driver_b_time: Option<f64>,
}

/// The full set of lap records returned for one query, ordered by ascending
/// lap number with no duplicate lap numbers.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonResult {
    pub query: ComparisonQuery,
    pub laps: Vec<LapRecord>,
}

impl ComparisonResult {
    /// Builds a result from whatever the service sent back. Records are
    /// sorted by lap number; if the service repeats a lap number the first
    /// record wins.
    pub fn new(query: ComparisonQuery, mut laps: Vec<LapRecord>) -> Self {
        laps.sort_by_key(|record| record.lap);
        let before = laps.len();
        laps.dedup_by_key(|record| record.lap);
        if laps.len() != before {
            warn!(
                "comparison for {}/{} vs {} contained {} duplicate lap numbers",
                query.session_id,
                query.driver_a,
                query.driver_b,
                before - laps.len()
            );
        }
        Self { query, laps }
    }
}

/// Fetches the available session identifiers on a background thread and
/// reports the outcome on `results`. Used at startup and from the session
/// selector's reload action.
pub fn spawn_session_listing(
    client: Arc<TelemetryApiClient>,
    results: Sender<Result<Vec<String>, LapdeckError>>,
) {
    thread::spawn(move || {
        let _ = results.send(client.sessions());
    });
}

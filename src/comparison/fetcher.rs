use std::sync::{
    Arc,
    mpsc::{Receiver, Sender},
};
use std::thread;

use log::debug;

use super::FetchOutcome;
use crate::api::{ComparisonQuery, ComparisonResult, TelemetryApiClient};
use crate::errors::LapdeckError;

/// Source of comparison data. The view-model only ever sees this seam; the
/// production implementation is the HTTP client, tests substitute fakes.
pub trait ComparisonSource: Send + Sync + 'static {
    fn fetch(&self, query: &ComparisonQuery) -> Result<ComparisonResult, LapdeckError>;
}

impl ComparisonSource for TelemetryApiClient {
    fn fetch(&self, query: &ComparisonQuery) -> Result<ComparisonResult, LapdeckError> {
        self.compare(query)
    }
}

/// Serves fetch requests for the comparison view-model until the request
/// channel closes. Each fetch runs on its own thread: there is no
/// cancellation at the transport level, and a hung or slow request must not
/// delay the fetch for a newer selection. Outcomes come back tagged with
/// the query that produced them.
pub fn run_fetch_dispatcher(
    source: Arc<dyn ComparisonSource>,
    requests: Receiver<ComparisonQuery>,
    outcomes: Sender<FetchOutcome>,
) {
    while let Ok(query) = requests.recv() {
        let source = Arc::clone(&source);
        let outcomes = outcomes.clone();
        thread::spawn(move || {
            let result = source.fetch(&query);
            if outcomes.send(FetchOutcome { query, result }).is_err() {
                // view-model is gone, nobody is interested anymore
                debug!("dropping comparison outcome, receiver closed");
            }
        });
    }
}

pub mod fetcher;

use std::sync::mpsc::{Receiver, Sender};

use log::{debug, error, warn};

use crate::api::{ComparisonQuery, ComparisonResult};
use crate::errors::LapdeckError;

pub const DEFAULT_DRIVER_A: &str = "VER";
pub const DEFAULT_DRIVER_B: &str = "HAM";

/// The user's current choice of session and driver pair. No validation
/// happens here: unknown driver codes and equal codes on both sides are
/// passed through and surfaced as a service-side error if the service
/// objects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverSelection {
    pub session_id: Option<String>,
    pub driver_a: String,
    pub driver_b: String,
}

impl Default for DriverSelection {
    fn default() -> Self {
        Self {
            session_id: None,
            driver_a: DEFAULT_DRIVER_A.to_string(),
            driver_b: DEFAULT_DRIVER_B.to_string(),
        }
    }
}

impl DriverSelection {
    /// The query for the current selection, or `None` while no session is
    /// chosen (in which case nothing may be fetched).
    pub fn query(&self) -> Option<ComparisonQuery> {
        self.session_id.as_ref().map(|session_id| ComparisonQuery {
            session_id: session_id.clone(),
            driver_a: self.driver_a.clone(),
            driver_b: self.driver_b.clone(),
        })
    }
}

/// What the comparison view currently has to show.
#[derive(Debug, Default)]
pub enum ComparisonState {
    #[default]
    Idle,
    Loading,
    Ready(ComparisonResult),
    Failed(LapdeckError),
}

/// Completion report for one fetch, tagged with the query it was issued
/// for. The tag decides whether the outcome still applies or is stale.
#[derive(Debug)]
pub struct FetchOutcome {
    pub query: ComparisonQuery,
    pub result: Result<ComparisonResult, LapdeckError>,
}

/// State machine behind the driver comparison view.
///
/// Selection changes push tagged queries to the fetch dispatcher; `poll`
/// drains completed fetches and applies an outcome only if its tag still
/// equals the current selection tuple, so an out-of-order completion can
/// never overwrite the view with data for a superseded selection. The
/// presentation layer reads `state` and calls the setters; it never fetches
/// on its own.
pub struct ComparisonViewModel {
    selection: DriverSelection,
    state: ComparisonState,
    requests: Sender<ComparisonQuery>,
    outcomes: Receiver<FetchOutcome>,
}

impl ComparisonViewModel {
    pub fn new(requests: Sender<ComparisonQuery>, outcomes: Receiver<FetchOutcome>) -> Self {
        Self {
            selection: DriverSelection::default(),
            state: ComparisonState::Idle,
            requests,
            outcomes,
        }
    }

    pub fn selection(&self) -> &DriverSelection {
        &self.selection
    }

    pub fn state(&self) -> &ComparisonState {
        &self.state
    }

    /// Selects a session, or clears it with `None`. Clearing drops back to
    /// `Idle` and abandons whatever fetch may still be pending.
    pub fn set_session(&mut self, session_id: Option<String>) {
        if self.selection.session_id == session_id {
            return;
        }
        self.selection.session_id = session_id;
        match self.selection.session_id {
            Some(_) => self.start_fetch(),
            None => self.state = ComparisonState::Idle,
        }
    }

    pub fn set_driver_a(&mut self, code: impl Into<String>) {
        let code = code.into();
        if self.selection.driver_a == code {
            return;
        }
        self.selection.driver_a = code;
        if self.selection.session_id.is_some() {
            self.start_fetch();
        }
    }

    pub fn set_driver_b(&mut self, code: impl Into<String>) {
        let code = code.into();
        if self.selection.driver_b == code {
            return;
        }
        self.selection.driver_b = code;
        if self.selection.session_id.is_some() {
            self.start_fetch();
        }
    }

    /// Forces a refetch of the current tuple. The setters treat re-selecting
    /// the current value as a no-op, so this is the only way the UI can ask
    /// again after a failure.
    pub fn retry(&mut self) {
        if self.selection.session_id.is_some() {
            self.start_fetch();
        }
    }

    /// Applies any completed fetches. Call once per frame.
    pub fn poll(&mut self) {
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.handle_outcome(outcome);
        }
    }

    fn start_fetch(&mut self) {
        let Some(query) = self.selection.query() else {
            return;
        };
        self.state = ComparisonState::Loading;
        if self.requests.send(query).is_err() {
            error!("comparison fetch dispatcher is gone, cannot request data");
        }
    }

    fn handle_outcome(&mut self, outcome: FetchOutcome) {
        let Some(current) = self.selection.query() else {
            debug!(
                "discarding comparison outcome for {} vs {}, session was cleared",
                outcome.query.driver_a, outcome.query.driver_b
            );
            return;
        };
        if outcome.query != current {
            debug!(
                "discarding stale comparison outcome for {} vs {} in {}",
                outcome.query.driver_a, outcome.query.driver_b, outcome.query.session_id
            );
            return;
        }
        match outcome.result {
            Ok(result) => self.state = ComparisonState::Ready(result),
            Err(e) => {
                warn!("comparison fetch failed: {}", e);
                self.state = ComparisonState::Failed(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Receiver, Sender};

    use proptest::prelude::*;

    use super::*;
    use crate::api::{LapRecord, TelemetryApiClient};

    /// View-model wired to test-held channel ends: issued queries can be
    /// read from `requests`, completions injected through `outcomes`.
    fn test_view_model() -> (
        ComparisonViewModel,
        Receiver<ComparisonQuery>,
        Sender<FetchOutcome>,
    ) {
        let (request_tx, request_rx) = mpsc::channel();
        let (outcome_tx, outcome_rx) = mpsc::channel();
        (
            ComparisonViewModel::new(request_tx, outcome_rx),
            request_rx,
            outcome_tx,
        )
    }

    fn monaco_laps() -> Vec<LapRecord> {
        vec![
            LapRecord {
                lap: 1,
                driver_a_time: Some(74.5),
                driver_b_time: Some(74.6),
            },
            LapRecord {
                lap: 2,
                driver_a_time: Some(74.3),
                driver_b_time: Some(74.9),
            },
        ]
    }

    fn ok_outcome(query: ComparisonQuery, laps: Vec<LapRecord>) -> FetchOutcome {
        FetchOutcome {
            query: query.clone(),
            result: Ok(ComparisonResult::new(query, laps)),
        }
    }

    // reqwest errors cannot be built by hand, so a transport failure is
    // produced by talking to a port nothing listens on
    fn network_failure(query: ComparisonQuery) -> FetchOutcome {
        let err = TelemetryApiClient::new("http://127.0.0.1:9")
            .compare(&query)
            .unwrap_err();
        FetchOutcome {
            query,
            result: Err(err),
        }
    }

    #[test]
    fn test_no_fetch_without_session() {
        let (mut vm, requests, _outcomes) = test_view_model();

        vm.set_driver_a("LEC");
        vm.set_driver_b("PER");

        assert!(requests.try_recv().is_err(), "no session, no fetch");
        assert!(matches!(vm.state(), ComparisonState::Idle));
        assert_eq!(vm.selection().driver_a, "LEC");
    }

    #[test]
    fn test_selecting_session_triggers_exactly_one_fetch() {
        let (mut vm, requests, _outcomes) = test_view_model();

        vm.set_session(Some("monaco_2024".to_string()));

        assert!(matches!(vm.state(), ComparisonState::Loading));
        let issued = requests.try_recv().unwrap();
        assert_eq!(issued.session_id, "monaco_2024");
        assert_eq!(issued.driver_a, DEFAULT_DRIVER_A);
        assert_eq!(issued.driver_b, DEFAULT_DRIVER_B);
        assert!(requests.try_recv().is_err(), "one change, one fetch");
    }

    #[test]
    fn test_reselecting_current_value_is_a_noop() {
        let (mut vm, requests, outcomes) = test_view_model();

        vm.set_session(Some("monaco_2024".to_string()));
        let query = requests.try_recv().unwrap();
        outcomes.send(ok_outcome(query, monaco_laps())).unwrap();
        vm.poll();
        assert!(matches!(vm.state(), ComparisonState::Ready(_)));

        vm.set_session(Some("monaco_2024".to_string()));
        vm.set_driver_a(DEFAULT_DRIVER_A);
        vm.set_driver_b(DEFAULT_DRIVER_B);

        assert!(requests.try_recv().is_err(), "no-op selection must not refetch");
        assert!(matches!(vm.state(), ComparisonState::Ready(_)));
    }

    #[test]
    fn test_successful_fetch_reaches_ready_with_ordered_records() {
        let (mut vm, requests, outcomes) = test_view_model();

        vm.set_session(Some("monaco_2024".to_string()));
        let query = requests.try_recv().unwrap();
        outcomes.send(ok_outcome(query, monaco_laps())).unwrap();
        vm.poll();

        match vm.state() {
            ComparisonState::Ready(result) => {
                assert_eq!(result.laps, monaco_laps());
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn test_outcome_for_superseded_driver_is_discarded() {
        let (mut vm, requests, outcomes) = test_view_model();

        vm.set_session(Some("monaco_2024".to_string()));
        let ham_query = requests.try_recv().unwrap();
        vm.set_driver_b("LEC");
        let lec_query = requests.try_recv().unwrap();

        // the HAM fetch resolves late, after the selection moved to LEC
        outcomes.send(ok_outcome(ham_query, monaco_laps())).unwrap();
        vm.poll();
        assert!(
            matches!(vm.state(), ComparisonState::Loading),
            "stale HAM data must never be shown"
        );

        outcomes.send(ok_outcome(lec_query, monaco_laps())).unwrap();
        vm.poll();
        match vm.state() {
            ComparisonState::Ready(result) => assert_eq!(result.query.driver_b, "LEC"),
            other => panic!("expected Ready for LEC, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_order_completion_keeps_latest_selection() {
        let (mut vm, requests, outcomes) = test_view_model();

        vm.set_session(Some("monaco_2024".to_string()));
        let first = requests.try_recv().unwrap();
        vm.set_driver_a("PER");
        let second = requests.try_recv().unwrap();

        // newer fetch completes first, older one afterwards
        outcomes.send(ok_outcome(second, monaco_laps())).unwrap();
        outcomes.send(ok_outcome(first, vec![])).unwrap();
        vm.poll();

        match vm.state() {
            ComparisonState::Ready(result) => {
                assert_eq!(result.query.driver_a, "PER");
                assert_eq!(result.laps, monaco_laps());
            }
            other => panic!("expected Ready for PER, got {other:?}"),
        }
    }

    #[test]
    fn test_transport_failure_reaches_failed_and_identical_reselect_stays_put() {
        let (mut vm, requests, outcomes) = test_view_model();

        vm.set_session(Some("monaco_2024".to_string()));
        vm.set_driver_b("PER");
        let _superseded = requests.try_recv().unwrap();
        let query = requests.try_recv().unwrap();

        outcomes.send(network_failure(query)).unwrap();
        vm.poll();
        assert!(matches!(
            vm.state(),
            ComparisonState::Failed(LapdeckError::NetworkError { .. })
        ));

        vm.set_driver_b("PER");
        assert!(requests.try_recv().is_err(), "identical tuple must not refetch");
        assert!(matches!(vm.state(), ComparisonState::Failed(_)));
    }

    #[test]
    fn test_retry_refetches_unchanged_tuple() {
        let (mut vm, requests, outcomes) = test_view_model();

        vm.set_session(Some("monaco_2024".to_string()));
        let query = requests.try_recv().unwrap();
        outcomes.send(network_failure(query.clone())).unwrap();
        vm.poll();
        assert!(matches!(vm.state(), ComparisonState::Failed(_)));

        vm.retry();
        assert!(matches!(vm.state(), ComparisonState::Loading));
        assert_eq!(requests.try_recv().unwrap(), query);
    }

    #[test]
    fn test_retry_without_session_does_nothing() {
        let (mut vm, requests, _outcomes) = test_view_model();

        vm.retry();

        assert!(requests.try_recv().is_err());
        assert!(matches!(vm.state(), ComparisonState::Idle));
    }

    #[test]
    fn test_clearing_session_returns_to_idle_and_drops_late_outcome() {
        let (mut vm, requests, outcomes) = test_view_model();

        vm.set_session(Some("monaco_2024".to_string()));
        let query = requests.try_recv().unwrap();
        vm.set_session(None);
        assert!(matches!(vm.state(), ComparisonState::Idle));

        // the fetch for the cleared session resolves afterwards
        outcomes.send(ok_outcome(query, monaco_laps())).unwrap();
        vm.poll();
        assert!(matches!(vm.state(), ComparisonState::Idle));
    }

    #[test]
    fn test_new_selection_after_failure_loads_again() {
        let (mut vm, requests, outcomes) = test_view_model();

        vm.set_session(Some("monaco_2024".to_string()));
        let query = requests.try_recv().unwrap();
        outcomes.send(network_failure(query)).unwrap();
        vm.poll();
        assert!(matches!(vm.state(), ComparisonState::Failed(_)));

        vm.set_driver_b("LEC");
        assert!(matches!(vm.state(), ComparisonState::Loading));
        assert_eq!(requests.try_recv().unwrap().driver_b, "LEC");
    }

    // Property: however the selection moves and in whatever order fetches
    // complete, the settled state only ever reflects the last selection
    // tuple.

    #[derive(Clone, Debug)]
    enum SelectionEvent {
        Session(Option<usize>),
        DriverA(usize),
        DriverB(usize),
    }

    const SESSIONS: [&str; 3] = ["monaco_2024", "silverstone_2024", "monza_2024"];
    const DRIVERS: [&str; 4] = ["VER", "HAM", "LEC", "PER"];

    fn selection_event() -> impl Strategy<Value = SelectionEvent> {
        prop_oneof![
            proptest::option::of(0..SESSIONS.len()).prop_map(SelectionEvent::Session),
            (0..DRIVERS.len()).prop_map(SelectionEvent::DriverA),
            (0..DRIVERS.len()).prop_map(SelectionEvent::DriverB),
        ]
    }

    proptest! {
        #[test]
        fn prop_settled_state_reflects_only_last_selection(
            events in proptest::collection::vec(selection_event(), 1..24),
            reverse_completions in any::<bool>(),
        ) {
            let (mut vm, requests, outcomes) = test_view_model();

            for event in events {
                match event {
                    SelectionEvent::Session(s) => {
                        vm.set_session(s.map(|i| SESSIONS[i].to_string()))
                    }
                    SelectionEvent::DriverA(d) => vm.set_driver_a(DRIVERS[d]),
                    SelectionEvent::DriverB(d) => vm.set_driver_b(DRIVERS[d]),
                }
            }

            let mut issued: Vec<ComparisonQuery> = Vec::new();
            while let Ok(query) = requests.try_recv() {
                issued.push(query);
            }
            if reverse_completions {
                issued.reverse();
            }
            let settled = !issued.is_empty();
            for query in issued {
                outcomes.send(ok_outcome(query, monaco_laps())).unwrap();
            }
            vm.poll();

            match vm.selection().query() {
                None => prop_assert!(matches!(vm.state(), ComparisonState::Idle)),
                Some(current) => {
                    prop_assert!(settled, "a defined session implies at least one fetch");
                    match vm.state() {
                        ComparisonState::Ready(result) => {
                            prop_assert_eq!(&result.query, &current);
                        }
                        other => prop_assert!(false, "expected Ready, got {:?}", other),
                    }
                }
            }
        }
    }
}

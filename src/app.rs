//! Application state machine
//!
//! A single model updated by messages, emitting commands for the driver to
//! run. Fetches carry a monotonic sequence number; a completion whose number
//! no longer matches the model's latest is stale and is discarded, so an old
//! slow refresh can never overwrite a newer selection. Search is a secondary
//! sub-state keyed by the query text, independent of the fetch phase.

use crate::geocode::MIN_QUERY_LEN;
use crate::models::Location;
use crate::pipeline::RiskReport;
use tracing::debug;

/// Main fetch lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No fetch has been issued yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// The latest fetch completed and its report is current
    Displaying,
    /// The latest fetch failed outright
    Error(String),
}

/// Search dropdown sub-state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// What the user has typed so far
    pub query: String,
    /// Candidates for the current query
    pub results: Vec<Location>,
    /// Whether the dropdown is showing
    pub open: bool,
}

/// Everything the application knows at one instant
#[derive(Debug, Clone)]
pub struct AppModel {
    /// Currently selected location
    pub location: Location,
    pub phase: Phase,
    pub search: SearchState,
    /// Latest completed assessment, kept through reloads
    pub report: Option<RiskReport>,
    fetch_seq: u64,
}

/// Inputs that drive the model
#[derive(Debug)]
pub enum Msg {
    /// The search query text changed
    QueryChanged(String),
    /// A geocode lookup finished
    SearchCompleted {
        query: String,
        results: Vec<Location>,
    },
    /// The user committed a search result
    LocationSelected(Location),
    /// The periodic refresh timer fired
    RefreshTick,
    /// An assessment finished
    FetchCompleted { seq: u64, report: Box<RiskReport> },
    /// An assessment failed outright
    FetchFailed { seq: u64, message: String },
}

/// Work the driver must perform after an update
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    None,
    /// Run a geocode lookup for this query
    Search { query: String },
    /// Run a full assessment; report back with the same sequence number
    Fetch { seq: u64, location: Location },
}

impl AppModel {
    /// A fresh model pointing at the default city, before any fetch
    #[must_use]
    pub fn new() -> Self {
        Self {
            location: Location::default_city(),
            phase: Phase::Idle,
            search: SearchState::default(),
            report: None,
            fetch_seq: 0,
        }
    }

    /// Sequence number of the latest issued fetch
    #[must_use]
    pub fn fetch_seq(&self) -> u64 {
        self.fetch_seq
    }

    /// Issue a fetch for the current location, invalidating in-flight ones
    pub fn begin_fetch(&mut self) -> Cmd {
        self.fetch_seq += 1;
        self.phase = Phase::Loading;
        Cmd::Fetch {
            seq: self.fetch_seq,
            location: self.location.clone(),
        }
    }

    /// Apply one message and return the command it implies
    pub fn update(&mut self, msg: Msg) -> Cmd {
        match msg {
            Msg::QueryChanged(query) => {
                self.search.query = query.clone();
                if query.trim().chars().count() < MIN_QUERY_LEN {
                    self.search.results.clear();
                    self.search.open = false;
                    Cmd::None
                } else {
                    Cmd::Search { query }
                }
            }
            Msg::SearchCompleted { query, results } => {
                // Only the lookup for what is currently typed may land
                if query == self.search.query {
                    self.search.open = !results.is_empty();
                    self.search.results = results;
                } else {
                    debug!("Discarding search results for superseded query '{}'", query);
                }
                Cmd::None
            }
            Msg::LocationSelected(location) => {
                self.location = location;
                self.search = SearchState::default();
                self.begin_fetch()
            }
            Msg::RefreshTick => self.begin_fetch(),
            Msg::FetchCompleted { seq, report } => {
                if seq != self.fetch_seq {
                    debug!("Discarding stale fetch result (seq {} != {})", seq, self.fetch_seq);
                    return Cmd::None;
                }
                self.report = Some(*report);
                self.phase = Phase::Displaying;
                Cmd::None
            }
            Msg::FetchFailed { seq, message } => {
                if seq != self.fetch_seq {
                    debug!("Discarding stale fetch failure (seq {})", seq);
                    return Cmd::None;
                }
                self.phase = Phase::Error(message);
                Cmd::None
            }
        }
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}

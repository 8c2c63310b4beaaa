//! Session state: either nothing is loaded yet, or one immutable ledger is.

use thiserror::Error;

use crate::ledger::Ledger;
use crate::summary::{BasicStats, CashflowSummary, GroupSummary};

/// Informational message returned in place of results before any load.
pub const NO_DATA_MESSAGE: &str = "No data loaded. Please load data first.";

/// Raised only when a caller explicitly converts an `Outcome::NoData` into an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No data loaded. Please load data first.")]
pub struct NoDataLoaded;

/// Result of a query against the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    /// Nothing has been loaded yet.
    NoData,
}

impl<T> Outcome<T> {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Outcome::NoData)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ready(v) => Outcome::Ready(f(v)),
            Outcome::NoData => Outcome::NoData,
        }
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Outcome::Ready(v) => Some(v),
            Outcome::NoData => None,
        }
    }

    pub fn into_result(self) -> Result<T, NoDataLoaded> {
        self.ready().ok_or(NoDataLoaded)
    }

    /// The informational message, if there is no data.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Outcome::Ready(_) => None,
            Outcome::NoData => Some(NO_DATA_MESSAGE),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Unloaded,
    Loaded(Ledger),
}

impl SessionState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, SessionState::Loaded(_))
    }

    pub fn ledger(&self) -> Outcome<&Ledger> {
        match self {
            SessionState::Loaded(ledger) => Outcome::Ready(ledger),
            SessionState::Unloaded => Outcome::NoData,
        }
    }

    /// Replace whatever was loaded with a freshly normalized ledger.
    pub fn load(&mut self, ledger: Ledger) {
        *self = SessionState::Loaded(ledger);
    }

    pub fn monthly_summary(&self) -> Outcome<Vec<GroupSummary>> {
        self.ledger().map(Ledger::monthly_summary)
    }

    pub fn category_summary(&self) -> Outcome<Vec<GroupSummary>> {
        self.ledger().map(Ledger::category_summary)
    }

    pub fn basic_stats(&self) -> Outcome<BasicStats> {
        self.ledger().map(Ledger::basic_stats)
    }

    pub fn cashflow(&self) -> Outcome<CashflowSummary> {
        self.ledger().map(Ledger::cashflow)
    }
}

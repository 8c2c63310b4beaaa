//! tally-core: ledger types, aggregation and session state for tally

pub mod ledger;
pub mod session;
pub mod summary;

pub use ledger::{Ledger, PeriodKey, Transaction};
pub use session::{NoDataLoaded, Outcome, SessionState, NO_DATA_MESSAGE};
pub use summary::{BasicStats, CashflowSummary, GroupSummary, NOT_AVAILABLE};

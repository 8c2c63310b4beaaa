//! Plain-text rendering of summaries for the terminal.

use tally_core::{BasicStats, GroupSummary};

/// One `label: value` line per statistic.
pub fn stats_text(stats: &BasicStats) -> String {
    stats
        .entries()
        .into_iter()
        .map(|(label, value)| format!("{label}: {value}\n"))
        .collect()
}

/// Left-aligned key column, right-aligned amount and count.
pub fn group_text(key_header: &str, groups: &[GroupSummary]) -> String {
    let width = groups
        .iter()
        .map(|g| g.key.chars().count())
        .chain(std::iter::once(key_header.len()))
        .max()
        .unwrap_or_default();

    let mut out = format!("{key_header:<width$}  {:>12}  {:>12}\n", "Amount", "Transactions");
    for g in groups {
        out.push_str(&format!(
            "{:<width$}  {:>12.2}  {:>12}\n",
            g.key, g.total_amount, g.transaction_count
        ));
    }
    out
}

//! Chart specifications built from ledger aggregates.
//!
//! A spec is plain data; turning it into pixels is the renderer's job.

use rust_decimal::Decimal;
use tally_core::{GroupSummary, Ledger};

/// Pixel size of the monthly trend chart.
pub const TREND_SIZE: (u32, u32) = (1000, 600);
/// Pixel size of each category pie (or its placeholder).
pub const PIE_SIZE: (u32, u32) = (800, 800);

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// `(period key, amount)` in ascending period order
    pub points: Vec<(String, Decimal)>,
    pub size: (u32, u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    /// `(category, non-negative amount)`, largest first
    pub slices: Vec<(String, Decimal)>,
    pub size: (u32, u32),
}

/// Stand-in chart carrying an explanatory label when there is nothing to plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub title: String,
    pub message: String,
    pub size: (u32, u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Line(LineChart),
    Pie(PieChart),
    Placeholder(Placeholder),
}

impl ChartSpec {
    pub fn size(&self) -> (u32, u32) {
        match self {
            ChartSpec::Line(c) => c.size,
            ChartSpec::Pie(c) => c.size,
            ChartSpec::Placeholder(c) => c.size,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Line(c) => &c.title,
            ChartSpec::Pie(c) => &c.title,
            ChartSpec::Placeholder(c) => &c.title,
        }
    }
}

/// Line chart of summed amount per month.
pub fn monthly_trend(monthly: &[GroupSummary]) -> ChartSpec {
    ChartSpec::Line(LineChart {
        title: "Monthly Balance".to_string(),
        x_label: "Month".to_string(),
        y_label: "Amount".to_string(),
        points: monthly
            .iter()
            .map(|s| (s.key.clone(), s.total_amount))
            .collect(),
        size: TREND_SIZE,
    })
}

fn breakdown(
    groups: Vec<GroupSummary>,
    top_n: usize,
    title: &str,
    empty_title: &str,
    empty_message: &str,
) -> ChartSpec {
    if groups.is_empty() {
        return ChartSpec::Placeholder(Placeholder {
            title: empty_title.to_string(),
            message: empty_message.to_string(),
            size: PIE_SIZE,
        });
    }
    ChartSpec::Pie(PieChart {
        title: title.to_string(),
        slices: groups
            .into_iter()
            .take(top_n)
            .map(|s| (s.key, s.total_amount))
            .collect(),
        size: PIE_SIZE,
    })
}

/// Pie of the `top_n` expense categories by absolute total, or a placeholder.
pub fn expense_breakdown(ledger: &Ledger, top_n: usize) -> ChartSpec {
    breakdown(
        ledger.expense_by_category(),
        top_n,
        "Top Expense Categories",
        "Expenses",
        "No expense data",
    )
}

/// Pie of the `top_n` income categories, or a placeholder.
pub fn income_breakdown(ledger: &Ledger, top_n: usize) -> ChartSpec {
    breakdown(
        ledger.income_by_category(),
        top_n,
        "Top Income Categories",
        "Income",
        "No income data",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tally_core::Transaction;

    fn ledger(rows: &[(u32, Decimal, &str)]) -> Ledger {
        Ledger::new(
            rows.iter()
                .map(|(month, amount, category)| {
                    let date = NaiveDate::from_ymd_opt(2025, *month, 10).unwrap();
                    Transaction::new(date, date, Some(*amount), None).with_category(*category)
                })
                .collect(),
            vec![],
        )
    }

    #[test]
    fn test_monthly_trend_points_follow_summary() {
        let l = ledger(&[(2, dec!(-10), "A"), (1, dec!(-5), "B"), (2, dec!(30), "C")]);
        let ChartSpec::Line(chart) = monthly_trend(&l.monthly_summary()) else {
            panic!("expected a line chart");
        };
        assert_eq!(
            chart.points,
            vec![("2025-01".to_string(), dec!(-5)), ("2025-02".to_string(), dec!(20))]
        );
        assert_eq!(chart.title, "Monthly Balance");
    }

    #[test]
    fn test_expense_pie_takes_top_five_by_magnitude() {
        let l = ledger(&[
            (1, dec!(-1), "A"),
            (1, dec!(-2), "B"),
            (1, dec!(-3), "C"),
            (1, dec!(-4), "D"),
            (1, dec!(-5), "E"),
            (1, dec!(-6), "F"),
            (1, dec!(100), "Stipendio"),
        ]);
        let ChartSpec::Pie(pie) = expense_breakdown(&l, 5) else {
            panic!("expected a pie");
        };
        let labels: Vec<&str> = pie.slices.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(labels, vec!["F", "E", "D", "C", "B"]);
        assert_eq!(pie.slices[0].1, dec!(6));
        assert_eq!(pie.title, "Top Expense Categories");
    }

    #[test]
    fn test_missing_side_gets_placeholder() {
        let l = ledger(&[(3, dec!(-100.00), "Ristoranti e bar")]);
        let spec = income_breakdown(&l, 5);
        assert_eq!(
            spec,
            ChartSpec::Placeholder(Placeholder {
                title: "Income".to_string(),
                message: "No income data".to_string(),
                size: PIE_SIZE,
            })
        );
        assert!(matches!(expense_breakdown(&l, 5), ChartSpec::Pie(_)));
    }

    #[test]
    fn test_empty_ledger_placeholders() {
        let l = Ledger::default();
        assert_eq!(expense_breakdown(&l, 5).title(), "Expenses");
        assert_eq!(income_breakdown(&l, 5).title(), "Income");
    }
}

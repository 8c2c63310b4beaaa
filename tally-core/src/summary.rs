//! Grouped aggregates and scalar statistics over a ledger.
//!
//! Everything here is a pure read of the ledger. Groups are accumulated in a
//! `BTreeMap`, so iteration (and therefore tie-breaking) follows ascending key
//! order.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::ledger::{Ledger, Transaction};

/// Label used when a top category cannot be determined.
pub const NOT_AVAILABLE: &str = "N/A";

/// Sum/count for one group key (a period or a category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub total_amount: Decimal,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    amount: Decimal,
    count: usize,
}

impl Totals {
    fn add(&mut self, amount: Decimal) {
        self.amount += amount;
        self.count += 1;
    }
}

fn group_by<'a, I, F>(txns: I, key: F) -> BTreeMap<String, Totals>
where
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut groups: BTreeMap<String, Totals> = BTreeMap::new();
    for txn in txns {
        groups.entry(key(txn).to_string()).or_default().add(txn.amount());
    }
    groups
}

/// Category groups; rows without a category are left out.
fn group_by_category<'a, I>(txns: I) -> BTreeMap<String, Totals>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    group_by(txns.into_iter().filter(|t| t.has_category()), |t| t.category.as_str())
}

fn into_summaries(groups: BTreeMap<String, Totals>) -> Vec<GroupSummary> {
    groups
        .into_iter()
        .map(|(key, totals)| GroupSummary {
            key,
            total_amount: totals.amount,
            transaction_count: totals.count,
        })
        .collect()
}

/// First key holding the largest value; later equal values do not replace it.
fn first_max<F>(groups: &BTreeMap<String, Totals>, value: F) -> Option<String>
where
    F: Fn(&Totals) -> Decimal,
{
    let mut best: Option<(&String, Decimal)> = None;
    for (key, totals) in groups {
        let v = value(totals);
        match best {
            Some((_, current)) if v <= current => {}
            _ => best = Some((key, v)),
        }
    }
    best.map(|(key, _)| key.clone())
}

fn mean(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

/// Income, expenses and balance, as written to the report's Summary sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CashflowSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

impl CashflowSummary {
    /// Labelled rows in display order.
    pub fn rows(&self) -> [(&'static str, Decimal); 3] {
        [
            ("Total Income", self.total_income),
            ("Total Expenses", self.total_expenses),
            ("Balance", self.balance),
        ]
    }
}

fn serialize_label<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(value.as_deref().unwrap_or(NOT_AVAILABLE))
}

/// Scalar statistics about a loaded ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasicStats {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    /// Mean of negative amounts, zero when there are none
    pub average_expense: Decimal,
    /// Mean of positive amounts, zero when there are none
    pub average_income: Decimal,
    #[serde(serialize_with = "serialize_label")]
    pub top_expense_category: Option<String>,
    #[serde(serialize_with = "serialize_label")]
    pub top_income_category: Option<String>,
    pub total_transactions: usize,
}

impl BasicStats {
    pub fn top_expense_label(&self) -> &str {
        self.top_expense_category.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn top_income_label(&self) -> &str {
        self.top_income_category.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Human-readable `(label, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total Income", self.total_income.to_string()),
            ("Total Expenses", self.total_expenses.to_string()),
            ("Balance", self.balance.to_string()),
            ("Average Expense", self.average_expense.round_dp(2).to_string()),
            ("Average Income", self.average_income.round_dp(2).to_string()),
            ("Top Expense Category", self.top_expense_label().to_string()),
            ("Top Income Category", self.top_income_label().to_string()),
            ("Total Transactions", self.total_transactions.to_string()),
        ]
    }
}

impl Ledger {
    /// Sum and count per period key, ascending by period.
    pub fn monthly_summary(&self) -> Vec<GroupSummary> {
        into_summaries(group_by(self, |t| t.period_key().as_str()))
    }

    /// Sum and count per category, ascending by summed amount.
    ///
    /// The sort is stable, so categories with equal totals stay in ascending
    /// name order. Uncategorized rows are not listed.
    pub fn category_summary(&self) -> Vec<GroupSummary> {
        let mut summaries = into_summaries(group_by_category(self));
        summaries.sort_by(|a, b| a.total_amount.cmp(&b.total_amount));
        summaries
    }

    /// Absolute expense totals per category, largest first.
    pub fn expense_by_category(&self) -> Vec<GroupSummary> {
        let mut summaries: Vec<GroupSummary> = into_summaries(group_by_category(self.expenses()))
            .into_iter()
            .map(|s| GroupSummary {
                total_amount: s.total_amount.abs(),
                ..s
            })
            .collect();
        summaries.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
        summaries
    }

    /// Income totals per category, largest first.
    pub fn income_by_category(&self) -> Vec<GroupSummary> {
        let mut summaries = into_summaries(group_by_category(self.income()));
        summaries.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
        summaries
    }

    pub fn cashflow(&self) -> CashflowSummary {
        let total_income: Decimal = self.income().map(Transaction::amount).sum();
        let total_expenses: Decimal = self.expenses().map(Transaction::amount).sum();
        CashflowSummary {
            total_income,
            total_expenses,
            balance: total_income + total_expenses,
        }
    }

    pub fn basic_stats(&self) -> BasicStats {
        let cashflow = self.cashflow();
        let expense_groups = group_by_category(self.expenses());
        let income_groups = group_by_category(self.income());
        let expense_count = self.expenses().count();
        let income_count = self.income().count();

        BasicStats {
            total_income: cashflow.total_income,
            total_expenses: cashflow.total_expenses,
            balance: cashflow.balance,
            average_expense: mean(cashflow.total_expenses, expense_count),
            average_income: mean(cashflow.total_income, income_count),
            top_expense_category: first_max(&expense_groups, |t| t.amount.abs()),
            top_income_category: first_max(&income_groups, |t| t.amount),
            total_transactions: self.len(),
        }
    }
}

//! Normalized transaction records and the ledger that holds them.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Year-month grouping key, always derived from a posting date ("2025-03").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PeriodKey(String);

impl PeriodKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NaiveDate> for PeriodKey {
    fn from(date: NaiveDate) -> Self {
        PeriodKey(format!("{:04}-{:02}", date.year(), date.month()))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One ledger row after reconciliation.
///
/// The posting date, the reconciled debit/credit pair, the signed amount and
/// the period key are fixed at construction; only the pass-through text fields
/// are public.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    posting_date: NaiveDate,
    pub value_date: NaiveDate,
    debit: Option<Decimal>,
    credit: Option<Decimal>,
    /// Positive = income, negative = expense
    amount: Decimal,
    pub description: String,
    pub category: String,
    pub tag: String,
    /// Values of retained non-core columns, aligned with `Ledger::extra_columns`
    pub extra: Vec<String>,
    period_key: PeriodKey,
}

impl Transaction {
    /// Reconcile a debit/credit pair into one signed amount.
    ///
    /// Debits are expected to already carry a negative sign; absent values
    /// count as zero.
    pub fn new(
        posting_date: NaiveDate,
        value_date: NaiveDate,
        debit: Option<Decimal>,
        credit: Option<Decimal>,
    ) -> Self {
        let amount = credit.unwrap_or_default() + debit.unwrap_or_default();
        Self {
            posting_date,
            value_date,
            debit,
            credit,
            amount,
            description: String::new(),
            category: String::new(),
            tag: String::new(),
            extra: Vec::new(),
            period_key: PeriodKey::from(posting_date),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_extra(mut self, extra: Vec<String>) -> Self {
        self.extra = extra;
        self
    }

    pub fn posting_date(&self) -> NaiveDate {
        self.posting_date
    }

    pub fn debit(&self) -> Option<Decimal> {
        self.debit
    }

    pub fn credit(&self) -> Option<Decimal> {
        self.credit
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn period_key(&self) -> &PeriodKey {
        &self.period_key
    }

    /// False when the category cell was blank.
    pub fn has_category(&self) -> bool {
        !self.category.trim().is_empty()
    }

    /// Returns true if this is an expense (negative amount)
    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Returns true if this is income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// Ordered, immutable collection of transactions in source-row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    extra_columns: Vec<String>,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>, extra_columns: Vec<String>) -> Self {
        Self {
            transactions,
            extra_columns,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Names of the retained non-core source columns.
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn expenses(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions.iter().filter(|t| t.is_expense())
    }

    pub fn income(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions.iter().filter(|t| t.is_income())
    }

    /// Sum of every amount in the ledger.
    pub fn total(&self) -> Decimal {
        self.transactions.iter().map(Transaction::amount).sum()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

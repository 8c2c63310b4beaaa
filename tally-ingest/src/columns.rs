//! Source column names for a bank export.
//!
//! Defaults match the Italian home-banking export:
//! Data contabile,Valuta,Dare,Avere,Divisa,Causale,Descrizione,Categoria,Tag

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub posting_date: String,
    pub value_date: String,
    /// Debit column; values carry their own negative sign
    pub debit: String,
    pub credit: String,
    /// Optional; dropped together with `reason` when both are present
    pub currency: String,
    pub reason: String,
    pub description: String,
    pub category: String,
    pub tag: String,
    /// Field separator of delimited exports (some banks use ';')
    pub delimiter: char,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            posting_date: "Data contabile".to_string(),
            value_date: "Valuta".to_string(),
            debit: "Dare".to_string(),
            credit: "Avere".to_string(),
            currency: "Divisa".to_string(),
            reason: "Causale".to_string(),
            description: "Descrizione".to_string(),
            category: "Categoria".to_string(),
            tag: "Tag".to_string(),
            delimiter: ',',
        }
    }
}

impl ColumnMap {
    pub fn is_date_column(&self, name: &str) -> bool {
        name == self.posting_date || name == self.value_date
    }

    /// Debit or credit.
    pub fn is_amount_column(&self, name: &str) -> bool {
        name == self.debit || name == self.credit
    }

    /// Columns that map onto a `Transaction` field.
    pub fn is_core_column(&self, name: &str) -> bool {
        self.is_date_column(name)
            || self.is_amount_column(name)
            || name == self.description
            || name == self.category
            || name == self.tag
    }
}

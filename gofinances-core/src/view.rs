//! Display rows for the transaction list

use serde::Serialize;

use crate::locale::DisplayContext;
use crate::transaction::{Category, Transaction, TransactionType};

/// A transaction with its amount and date already formatted.
///
/// Built from a borrowed [`Transaction`]; the numeric record is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionView {
    pub id: String,
    pub name: String,
    pub amount: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
    pub date: String,
}

impl TransactionView {
    pub fn render(tx: &Transaction, ctx: &DisplayContext) -> Self {
        Self {
            id: tx.id.clone(),
            name: tx.name.clone(),
            amount: ctx.currency(tx.amount),
            kind: tx.kind.clone(),
            category: tx.category.clone(),
            date: ctx.short_date(tx.date),
        }
    }

    pub fn render_all(records: &[Transaction], ctx: &DisplayContext) -> Vec<Self> {
        records.iter().map(|tx| Self::render(tx, ctx)).collect()
    }
}

//! Dashboard summary: entries, expenses and net total, each with the date of
//! its most recent transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::locale::DisplayContext;
use crate::transaction::{Transaction, TransactionError, TransactionType};

/// One summary bucket. `last_transaction` is `None` when the bucket's
/// partition is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bucket {
    pub amount: Decimal,
    pub last_transaction: Option<DateTime<Utc>>,
}

impl Bucket {
    fn observe(&mut self, date: DateTime<Utc>) {
        self.last_transaction = Some(match self.last_transaction {
            Some(current) => current.max(date),
            None => date,
        });
    }

    fn add(&mut self, record: &Transaction, label: &str) -> Result<(), TransactionError> {
        self.amount = self
            .amount
            .checked_add(record.amount)
            .ok_or_else(|| TransactionError::AmountOverflow(label.to_string()))?;
        self.observe(record.date);
        Ok(())
    }
}

/// Numeric summary of a transaction collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Positive transactions
    pub entries: Bucket,
    /// Negative transactions
    pub expenses: Bucket,
    /// Net amount; its date covers every transaction, recognized type or not
    pub total: Bucket,
}

/// Summarize a collection in a single pass. Order of `records` is irrelevant.
///
/// Records with an unrecognized type count toward neither total but still
/// move the total bucket's last-transaction date. Fails with
/// [`TransactionError::AmountOverflow`] when a sum leaves the `Decimal` range.
pub fn summarize(records: &[Transaction]) -> Result<Summary, TransactionError> {
    let mut summary = Summary::default();

    for record in records {
        summary.total.observe(record.date);
        match record.kind {
            TransactionType::Positive => summary.entries.add(record, "entries")?,
            TransactionType::Negative => summary.expenses.add(record, "expenses")?,
            TransactionType::Other(_) => {}
        }
    }

    summary.total.amount = summary
        .entries
        .amount
        .checked_sub(summary.expenses.amount)
        .ok_or_else(|| TransactionError::AmountOverflow("net total".to_string()))?;
    Ok(summary)
}

impl Summary {
    /// Zero totals, no dates
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn net(&self) -> Decimal {
        self.total.amount
    }

    pub fn render(&self, ctx: &DisplayContext) -> HighlightData {
        let locale = ctx.locale;
        let card = |bucket: &Bucket, prefix: &str| HighlightCard {
            amount: ctx.currency(bucket.amount),
            last_transaction: match bucket.last_transaction {
                Some(date) => format!("{prefix} {}", ctx.day_month(date)),
                None => locale.no_transactions.to_string(),
            },
        };

        HighlightData {
            entries: card(&self.entries, locale.entries_prefix),
            expenses: card(&self.expenses, locale.expenses_prefix),
            total: card(&self.total, locale.period_prefix),
        }
    }
}

/// Rendered summary card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightCard {
    pub amount: String,
    pub last_transaction: String,
}

/// Rendered summary, one card per bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightData {
    pub entries: HighlightCard,
    pub expenses: HighlightCard,
    pub total: HighlightCard,
}

impl HighlightData {
    /// What the dashboard shows before any transaction exists
    pub fn empty(ctx: &DisplayContext) -> Self {
        Summary::empty().render(ctx)
    }
}

//! Dashboard state: the current user's records, rendered and summarized.
//!
//! Every refresh builds a fresh [`Snapshot`] and swaps it in whole. Readers
//! holding the previous `Arc<Snapshot>` keep a consistent view.

use gofinances_core::{
    CategoryTotal, DisplayContext, HighlightData, Summary, Transaction, TransactionError,
    TransactionView, YearMonth, expenses_by_category, summarize,
};
use std::sync::Arc;
use tracing::info;

use crate::repository::{LoadOutcome, RejectedRecord, TransactionRepository};
use crate::store::{RecordStore, StoreError};

/// Immutable result of one load
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub records: Vec<Transaction>,
    pub transactions: Vec<TransactionView>,
    pub summary: Summary,
    pub highlight: HighlightData,
    pub rejected: Vec<RejectedRecord>,
}

impl Snapshot {
    pub fn build(outcome: LoadOutcome, ctx: &DisplayContext) -> Result<Self, TransactionError> {
        let summary = summarize(&outcome.transactions)?;
        Ok(Self {
            transactions: TransactionView::render_all(&outcome.transactions, ctx),
            highlight: summary.render(ctx),
            summary,
            records: outcome.transactions,
            rejected: outcome.rejected,
        })
    }

    /// Zero totals, no-transactions labels, no rows
    pub fn empty(ctx: &DisplayContext) -> Self {
        Self {
            records: Vec::new(),
            transactions: Vec::new(),
            summary: Summary::empty(),
            highlight: HighlightData::empty(ctx),
            rejected: Vec::new(),
        }
    }

    /// Spending by category over this snapshot's records
    pub fn expenses_by_category(
        &self,
        month: Option<YearMonth>,
        ctx: &DisplayContext,
    ) -> Result<Vec<CategoryTotal>, TransactionError> {
        expenses_by_category(&self.records, month, ctx.tz)
    }
}

#[derive(Debug, Clone)]
pub enum DashboardState {
    /// Nothing loaded yet
    Loading,
    Ready(Arc<Snapshot>),
}

pub struct Dashboard<S> {
    repo: TransactionRepository<S>,
    ctx: DisplayContext,
    state: DashboardState,
}

impl<S: RecordStore> Dashboard<S> {
    pub fn new(repo: TransactionRepository<S>, ctx: DisplayContext) -> Self {
        Self {
            repo,
            ctx,
            state: DashboardState::Loading,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, DashboardState::Loading)
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        match &self.state {
            DashboardState::Loading => None,
            DashboardState::Ready(snapshot) => Some(Arc::clone(snapshot)),
        }
    }

    pub fn context(&self) -> &DisplayContext {
        &self.ctx
    }

    pub fn repository(&self) -> &TransactionRepository<S> {
        &self.repo
    }

    /// Reload everything and publish a new snapshot. On error the previous
    /// state is kept.
    pub fn refresh(&mut self) -> Result<Arc<Snapshot>, StoreError> {
        let outcome = self.repo.load()?;
        let snapshot = Snapshot::build(outcome, &self.ctx).map_err(|source| StoreError::Summary {
            key: self.repo.key().to_string(),
            source,
        })?;
        Ok(self.publish(snapshot))
    }

    /// Store a new transaction, then refresh
    pub fn add(&mut self, tx: &Transaction) -> Result<Arc<Snapshot>, StoreError> {
        self.repo.append(tx)?;
        self.refresh()
    }

    /// Delete every record of the user and reset to the empty snapshot
    pub fn clear_all(&mut self) -> Result<Arc<Snapshot>, StoreError> {
        self.repo.clear()?;
        info!(key = %self.repo.key(), "dashboard reset to empty state");
        Ok(self.publish(Snapshot::empty(&self.ctx)))
    }

    fn publish(&mut self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.state = DashboardState::Ready(Arc::clone(&snapshot));
        snapshot
    }
}

//! gofinances-store: record store boundary, per-user repository and dashboard snapshots

pub mod dashboard;
pub mod file_store;
pub mod repository;
pub mod store;

pub use dashboard::{Dashboard, DashboardState, Snapshot};
pub use file_store::FileStore;
pub use repository::{
    KEY_PREFIX, LoadOutcome, MalformedPolicy, RejectedRecord, TransactionRepository, namespace_key,
};
pub use store::{MemoryStore, RecordStore, StoreError};

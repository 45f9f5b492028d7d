//! Per-user transaction collection on top of a [`RecordStore`].
//!
//! Each user's transactions live under one namespace key as a JSON array.
//! Every mutation rewrites the whole array: concurrent writers race and the
//! last one wins, so callers that need more must serialize access themselves.

use chrono_tz::Tz;
use gofinances_core::{Transaction, TransactionError, decode_value};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::store::{RecordStore, StoreError};

pub const KEY_PREFIX: &str = "@gofinances:transactions_user:";

/// Storage key for a user's collection
pub fn namespace_key(user_id: &str) -> String {
    format!("{KEY_PREFIX}{user_id}")
}

/// What to do with a stored record that fails validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Leave it out, log a warning and report it in [`LoadOutcome::rejected`]
    #[default]
    Skip,
    /// Fail the whole load
    Fail,
}

impl FromStr for MalformedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(MalformedPolicy::Skip),
            "fail" => Ok(MalformedPolicy::Fail),
            other => Err(format!("unknown malformed-record policy: {other} (skip|fail)")),
        }
    }
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedPolicy::Skip => f.write_str("skip"),
            MalformedPolicy::Fail => f.write_str("fail"),
        }
    }
}

/// A stored record left out of a load
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Position in the stored array
    pub index: usize,
    pub id: Option<String>,
    pub reason: TransactionError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOutcome {
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<RejectedRecord>,
}

pub struct TransactionRepository<S> {
    store: S,
    key: String,
    tz: Tz,
    policy: MalformedPolicy,
}

impl<S: RecordStore> TransactionRepository<S> {
    /// `tz` is used to read stored dates that carry no offset
    pub fn new(store: S, user_id: &str, tz: Tz) -> Self {
        Self {
            store,
            key: namespace_key(user_id),
            tz,
            policy: MalformedPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Load and validate the whole collection. Nothing stored means empty.
    pub fn load(&self) -> Result<LoadOutcome, StoreError> {
        let values = self.read_raw()?;
        let mut outcome = LoadOutcome::default();

        for (index, value) in values.into_iter().enumerate() {
            let id = value.get("id").and_then(Value::as_str).map(str::to_string);
            match decode_value(value, self.tz) {
                Ok(tx) => outcome.transactions.push(tx),
                Err(reason) => match self.policy {
                    MalformedPolicy::Fail => {
                        return Err(StoreError::Rejected {
                            key: self.key.clone(),
                            index,
                            source: reason,
                        });
                    }
                    MalformedPolicy::Skip => {
                        warn!(key = %self.key, index, id = ?id, %reason, "skipping malformed transaction record");
                        outcome.rejected.push(RejectedRecord { index, id, reason });
                    }
                },
            }
        }

        debug!(
            key = %self.key,
            loaded = outcome.transactions.len(),
            rejected = outcome.rejected.len(),
            "loaded transactions"
        );
        Ok(outcome)
    }

    /// Read-modify-write append. Records that fail validation are kept as
    /// stored; only the new record is added.
    pub fn append(&mut self, tx: &Transaction) -> Result<(), StoreError> {
        let mut values = self.read_raw()?;
        let value = serde_json::to_value(tx.to_stored()).map_err(|source| StoreError::Encode {
            key: self.key.clone(),
            source,
        })?;
        values.push(value);
        self.write_raw(&values)?;

        debug!(key = %self.key, id = %tx.id, total = values.len(), "appended transaction");
        Ok(())
    }

    /// Delete the user's collection. Clearing an empty collection is a no-op.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.delete(&self.key)?;
        info!(key = %self.key, "cleared transactions");
        Ok(())
    }

    fn read_raw(&self) -> Result<Vec<Value>, StoreError> {
        let Some(bytes) = self.store.get(&self.key)? else {
            debug!(key = %self.key, "no stored collection");
            return Ok(Vec::new());
        };
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }

    fn write_raw(&mut self, values: &[Value]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(values).map_err(|source| StoreError::Encode {
            key: self.key.clone(),
            source,
        })?;
        self.store.set(&self.key, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};
    use gofinances_core::{Category, TransactionType};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn tx(id: &str, amount: i64, kind: TransactionType) -> Transaction {
        Transaction::new(
            id,
            id,
            Decimal::new(amount, 0),
            kind,
            Category::new("Compras", "shopping-bag"),
            Utc.with_ymd_and_hms(2023, 4, 10, 12, 0, 0).unwrap(),
        )
    }

    fn repo_with(values: Value) -> TransactionRepository<MemoryStore> {
        let mut store = MemoryStore::new();
        store
            .set(&namespace_key("u1"), &serde_json::to_vec(&values).unwrap())
            .unwrap();
        TransactionRepository::new(store, "u1", Tz::UTC)
    }

    #[test]
    fn test_namespace_key() {
        assert_eq!(namespace_key("42"), "@gofinances:transactions_user:42");
    }

    #[test]
    fn test_missing_collection_is_empty() {
        let repo = TransactionRepository::new(MemoryStore::new(), "u1", Tz::UTC);
        assert_eq!(repo.load().unwrap(), LoadOutcome::default());
    }

    #[test]
    fn test_append_then_load() {
        let mut repo = TransactionRepository::new(MemoryStore::new(), "u1", Tz::UTC);
        let a = tx("a", 100, TransactionType::Positive);
        let b = tx("b", 40, TransactionType::Negative);
        repo.append(&a).unwrap();
        repo.append(&b).unwrap();

        let outcome = repo.load().unwrap();
        assert_eq!(outcome.transactions, vec![a, b]);
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn test_users_are_isolated() {
        let mut alice = TransactionRepository::new(MemoryStore::new(), "alice", Tz::UTC);
        alice.append(&tx("a", 1, TransactionType::Positive)).unwrap();

        let bob = TransactionRepository::new(alice.into_store(), "bob", Tz::UTC);
        assert!(bob.load().unwrap().transactions.is_empty());
        assert_eq!(bob.store().len(), 1);
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let repo = repo_with(json!([
            { "id": "ok", "name": "Salário", "amount": 100, "type": "positive",
              "category": { "name": "Salário", "icon": "dollar-sign" }, "date": "2023-04-10" },
            { "id": "bad-amount", "name": "x", "amount": "NaN?", "type": "negative",
              "category": { "name": "Compras", "icon": "shopping-bag" }, "date": "2023-04-10" },
            { "id": "bad-date", "name": "y", "amount": 5, "type": "negative",
              "category": { "name": "Compras", "icon": "shopping-bag" }, "date": "Invalid Date" },
            "not even an object",
        ]));

        let outcome = repo.load().unwrap();
        assert_eq!(outcome.transactions.len(), 1);
        assert_eq!(outcome.transactions[0].id, "ok");

        let rejected: Vec<_> = outcome.rejected.iter().map(|r| (r.index, r.id.clone())).collect();
        assert_eq!(
            rejected,
            vec![
                (1, Some("bad-amount".to_string())),
                (2, Some("bad-date".to_string())),
                (3, None),
            ]
        );
        assert!(matches!(outcome.rejected[1].reason, TransactionError::MalformedDate(_)));
    }

    #[test]
    fn test_strict_policy_fails_load() {
        let repo = repo_with(json!([
            { "id": "bad", "name": "x", "amount": "abc", "type": "negative",
              "category": { "name": "Compras", "icon": "shopping-bag" }, "date": "2023-04-10" },
        ]))
        .with_policy(MalformedPolicy::Fail);

        let err = repo.load().unwrap_err();
        assert!(matches!(err, StoreError::Rejected { index: 0, .. }));
    }

    #[test]
    fn test_append_keeps_malformed_records() {
        let mut repo = repo_with(json!([{ "id": "legacy", "amount": "??" }]));
        repo.append(&tx("new", 3, TransactionType::Positive)).unwrap();

        let raw: Vec<Value> =
            serde_json::from_slice(&repo.store().get(repo.key()).unwrap().unwrap()).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0], json!({ "id": "legacy", "amount": "??" }));
        assert_eq!(raw[1]["id"], json!("new"));
    }

    #[test]
    fn test_non_array_blob_is_corrupt() {
        let repo = repo_with(json!({ "oops": true }));
        assert!(matches!(repo.load(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut repo = TransactionRepository::new(MemoryStore::new(), "u1", Tz::UTC);
        repo.append(&tx("a", 1, TransactionType::Positive)).unwrap();
        repo.append(&tx("b", 2, TransactionType::Negative)).unwrap();

        repo.clear().unwrap();
        repo.clear().unwrap();
        assert!(repo.load().unwrap().transactions.is_empty());
        assert!(repo.store().is_empty());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("skip".parse::<MalformedPolicy>().unwrap(), MalformedPolicy::Skip);
        assert_eq!("FAIL".parse::<MalformedPolicy>().unwrap(), MalformedPolicy::Fail);
        assert!("ignore".parse::<MalformedPolicy>().is_err());
        assert_eq!(MalformedPolicy::Fail.to_string(), "fail");
    }
}

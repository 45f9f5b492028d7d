//! Transaction records and their stored (wire) form

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::timestamp::{parse_timestamp, to_stored_string};

/// Why a stored record could not become a [`Transaction`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransactionError {
    #[error("record does not have the transaction shape: {0}")]
    Shape(String),

    #[error("amount '{0}' is not a number")]
    MalformedAmount(String),

    #[error("amount {0} is negative (direction belongs in `type`)")]
    NegativeAmount(Decimal),

    #[error("date '{0}' is not a recognizable timestamp")]
    MalformedDate(String),

    #[error("sum of {0} overflows the amount range")]
    AmountOverflow(String),
}

/// Direction of the cash flow. The amount itself is always a magnitude.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    /// Income ("entry")
    Positive,
    /// Outflow ("expense")
    Negative,
    /// A stored value we don't recognize. Counted in no total.
    Other(String),
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Positive => "positive",
            TransactionType::Negative => "negative",
            TransactionType::Other(s) => s,
        }
    }
}

impl From<String> for TransactionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "positive" => TransactionType::Positive,
            "negative" => TransactionType::Negative,
            _ => TransactionType::Other(s),
        }
    }
}

impl From<TransactionType> for String {
    fn from(t: TransactionType) -> Self {
        match t {
            TransactionType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Free-text category: display name plus icon name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub icon: String,
}

impl Category {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
        }
    }
}

/// A validated transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub name: String,
    /// Non-negative magnitude
    pub amount: Decimal,
    pub kind: TransactionType,
    pub category: Category,
    pub date: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        amount: Decimal,
        kind: TransactionType,
        category: Category,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
            kind,
            category,
            date,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Negative
    }

    /// Validate a stored record. Naive dates are read in `tz`.
    pub fn from_stored(record: StoredTransaction, tz: Tz) -> Result<Self, TransactionError> {
        let amount = record.amount.to_decimal()?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(TransactionError::NegativeAmount(amount));
        }
        let date = parse_timestamp(&record.date, tz)?;

        Ok(Self {
            id: record.id,
            name: record.name,
            amount,
            kind: record.kind,
            category: record.category,
            date,
        })
    }

    pub fn to_stored(&self) -> StoredTransaction {
        StoredTransaction {
            id: self.id.clone(),
            name: self.name.clone(),
            amount: StoredAmount::Text(self.amount.normalize().to_string()),
            kind: self.kind.clone(),
            category: self.category.clone(),
            date: to_stored_string(self.date),
        }
    }
}

/// Decode one element of a stored collection
pub fn decode_value(value: serde_json::Value, tz: Tz) -> Result<Transaction, TransactionError> {
    let record: StoredTransaction =
        serde_json::from_value(value).map_err(|e| TransactionError::Shape(e.to_string()))?;
    Transaction::from_stored(record, tz)
}

/// Wire form of a transaction, as kept in the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTransaction {
    pub id: String,
    #[serde(alias = "title")]
    pub name: String,
    pub amount: StoredAmount,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
    pub date: String,
}

/// Amounts were historically written both as JSON numbers and as form text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredAmount {
    Number(serde_json::Number),
    Text(String),
}

impl StoredAmount {
    pub fn to_decimal(&self) -> Result<Decimal, TransactionError> {
        let raw = match self {
            StoredAmount::Number(n) => n.to_string(),
            StoredAmount::Text(s) => s.trim().to_string(),
        };
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|_| TransactionError::MalformedAmount(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(amount: serde_json::Value, date: &str) -> serde_json::Value {
        json!({
            "id": "tx-1",
            "name": "Salário",
            "amount": amount,
            "type": "positive",
            "category": { "name": "Salário", "icon": "dollar-sign" },
            "date": date,
        })
    }

    #[test]
    fn test_decode_number_and_text_amounts() {
        let a = decode_value(sample(json!(100), "2023-04-10T12:00:00.000Z"), Tz::UTC).unwrap();
        let b = decode_value(sample(json!("100.50"), "2023-04-10T12:00:00.000Z"), Tz::UTC).unwrap();
        let c = decode_value(sample(json!(40.25), "2023-04-10T12:00:00.000Z"), Tz::UTC).unwrap();
        assert_eq!(a.amount, Decimal::new(100, 0));
        assert_eq!(b.amount, Decimal::new(10050, 2));
        assert_eq!(c.amount, Decimal::new(4025, 2));
        assert_eq!(a.kind, TransactionType::Positive);
        assert!(!a.is_expense());
    }

    #[test]
    fn test_title_alias_is_accepted() {
        let mut value = sample(json!(1), "2023-04-10");
        let obj = value.as_object_mut().unwrap();
        let name = obj.remove("name").unwrap();
        obj.insert("title".into(), name);

        let tx = decode_value(value, Tz::UTC).unwrap();
        assert_eq!(tx.name, "Salário");
    }

    #[test]
    fn test_unknown_type_is_kept() {
        let mut value = sample(json!(5), "2023-04-10");
        value["type"] = json!("transfer");
        let tx = decode_value(value, Tz::UTC).unwrap();
        assert_eq!(tx.kind, TransactionType::Other("transfer".into()));
        assert_eq!(tx.to_stored().kind.as_str(), "transfer");
    }

    #[test]
    fn test_malformed_records_are_rejected() {
        let err = decode_value(sample(json!("abc"), "2023-04-10"), Tz::UTC).unwrap_err();
        assert_eq!(err, TransactionError::MalformedAmount("abc".into()));

        let err = decode_value(sample(json!(-3), "2023-04-10"), Tz::UTC).unwrap_err();
        assert_eq!(err, TransactionError::NegativeAmount(Decimal::new(-3, 0)));

        let err = decode_value(sample(json!(3), "Invalid Date"), Tz::UTC).unwrap_err();
        assert_eq!(err, TransactionError::MalformedDate("Invalid Date".into()));

        let err = decode_value(json!({ "id": "x" }), Tz::UTC).unwrap_err();
        assert!(matches!(err, TransactionError::Shape(_)));
    }

    #[test]
    fn test_to_stored_writes_text_amount_and_utc_date() {
        let tx = decode_value(sample(json!(12.5), "2023-04-10"), Tz::America__Sao_Paulo).unwrap();
        let stored = serde_json::to_value(tx.to_stored()).unwrap();
        assert_eq!(stored["amount"], json!("12.5"));
        assert_eq!(stored["date"], json!("2023-04-10T03:00:00.000Z"));
        assert_eq!(stored["type"], json!("positive"));
        assert_eq!(stored["category"]["icon"], json!("dollar-sign"));
    }
}

//! Validation of the "new transaction" form

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::categories::find_category;
use crate::transaction::{Transaction, TransactionType};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegisterError {
    #[error("name is required")]
    NameRequired,

    #[error("amount '{0}' is not a number")]
    AmountNotNumeric(String),

    #[error("amount must be greater than zero (got {0})")]
    AmountNotPositive(Decimal),

    #[error("transaction type '{0}' is not one of positive/negative (up/down)")]
    UnknownType(String),

    #[error("category is required")]
    CategoryRequired,

    #[error("unknown category '{0}'")]
    UnknownCategory(String),
}

/// Raw form input, exactly as typed
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub name: String,
    pub amount: String,
    pub kind: String,
    pub category_key: String,
}

impl NewTransaction {
    /// Validate the form and stamp the record with a fresh id and `now`
    pub fn validate(&self, now: DateTime<Utc>) -> Result<Transaction, RegisterError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RegisterError::NameRequired);
        }

        let amount = parse_form_amount(&self.amount)?;
        if amount <= Decimal::ZERO {
            return Err(RegisterError::AmountNotPositive(amount));
        }

        let kind = match self.kind.trim().to_ascii_lowercase().as_str() {
            "positive" | "up" => TransactionType::Positive,
            "negative" | "down" => TransactionType::Negative,
            _ => return Err(RegisterError::UnknownType(self.kind.clone())),
        };

        let key = self.category_key.trim();
        if key.is_empty() {
            return Err(RegisterError::CategoryRequired);
        }
        let category = find_category(key)
            .ok_or_else(|| RegisterError::UnknownCategory(key.to_string()))?
            .to_category();

        Ok(Transaction::new(
            Uuid::new_v4().to_string(),
            name,
            amount,
            kind,
            category,
            now,
        ))
    }
}

/// Accepts "1234.56", "1234,56" and "1.234,56"
fn parse_form_amount(raw: &str) -> Result<Decimal, RegisterError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    Decimal::from_str(&normalized).map_err(|_| RegisterError::AmountNotNumeric(raw.to_string()))
}

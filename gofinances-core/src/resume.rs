//! Spending by category: expense totals per category with their share of all
//! expenses, optionally limited to one calendar month.

use chrono::Datelike;
use chrono_tz::Tz;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::locale::DisplayContext;
use crate::transaction::{Category, Transaction, TransactionError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a month as YYYY-MM, got '{0}'")]
pub struct YearMonthError(String);

/// A calendar month, parsed from "YYYY-MM"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || YearMonthError(s.to_string());
        let (y, m) = s.trim().split_once('-').ok_or_else(err)?;
        let year: i32 = y.parse().map_err(|_| err())?;
        let month: u32 = m.parse().map_err(|_| err())?;
        if !(1..=12).contains(&month) {
            return Err(err());
        }
        Ok(Self { year, month })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
    /// Share of the filtered expense total, 0..=100, two decimals
    pub percent: Decimal,
}

/// Group expenses by category, largest first.
///
/// `month` is matched against each record's local date in `tz`.
pub fn expenses_by_category(
    records: &[Transaction],
    month: Option<YearMonth>,
    tz: Tz,
) -> Result<Vec<CategoryTotal>, TransactionError> {
    let mut groups: HashMap<&Category, Decimal> = HashMap::new();

    for tx in records.iter().filter(|tx| tx.is_expense()) {
        if let Some(ym) = month {
            let local = tx.date.with_timezone(&tz);
            if local.year() != ym.year || local.month() != ym.month {
                continue;
            }
        }
        let sum = groups.entry(&tx.category).or_default();
        *sum = sum
            .checked_add(tx.amount)
            .ok_or_else(|| TransactionError::AmountOverflow(tx.category.name.clone()))?;
    }

    let grand_total = groups
        .values()
        .try_fold(Decimal::ZERO, |acc, total| acc.checked_add(*total))
        .ok_or_else(|| TransactionError::AmountOverflow("expenses".to_string()))?;

    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, total)| {
            let percent = if grand_total.is_zero() {
                Decimal::ZERO
            } else {
                (total / grand_total * Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            };
            CategoryTotal {
                category: category.clone(),
                total,
                percent,
            }
        })
        .collect();

    totals.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.name.cmp(&b.category.name))
    });
    Ok(totals)
}

/// Rendered breakdown row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotalView {
    pub name: String,
    pub icon: String,
    pub total: String,
    pub percent: String,
}

impl CategoryTotalView {
    pub fn render(row: &CategoryTotal, ctx: &DisplayContext) -> Self {
        let percent = row
            .percent
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Self {
            name: row.category.name.clone(),
            icon: row.category.icon.clone(),
            total: ctx.currency(row.total),
            percent: format!("{}%", percent.normalize()),
        }
    }
}

//! JSON snapshots of bills, budgets and spend used to preview a reminder pass.

use std::{fs, path::Path};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use remind_core::memory::{StaticBillSource, StaticBudgetSource};
use remind_domain::{Bill, Budget, MonthYear};

use crate::errors::AppError;

/// Month-to-date spend for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendEntry {
    pub category_id: Uuid,
    pub month: u32,
    pub year: i32,
    pub amount: f64,
}

/// Everything a reminder pass reads from the backend, captured in one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub bills: Vec<Bill>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub spend: Vec<SpendEntry>,
}

impl Snapshot {
    /// Bill source that treats `today` as the reference date for due-soon and overdue filtering.
    pub fn bill_source(&self, today: NaiveDate) -> StaticBillSource {
        StaticBillSource::new(self.bills.clone(), today)
    }

    pub fn budget_source(&self) -> StaticBudgetSource {
        self.spend
            .iter()
            .fold(StaticBudgetSource::new(self.budgets.clone()), |source, entry| {
                source.with_spend(
                    entry.category_id,
                    MonthYear::new(entry.month, entry.year),
                    entry.amount,
                )
            })
    }
}

/// Loads a snapshot document from disk.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, AppError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

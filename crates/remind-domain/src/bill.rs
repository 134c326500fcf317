//! Domain types representing bills supplied by the backend.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Lead time applied when a bill does not carry its own reminder offset.
pub const DEFAULT_REMINDER_DAYS_BEFORE: u32 = 3;

/// A payable bill as seen by the reminder scheduler. Read-only snapshot data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default = "Bill::default_reminder_days_before")]
    pub reminder_days_before: u32,
}

impl Bill {
    pub fn new(name: impl Into<String>, due_date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount: None,
            due_date,
            reminder_days_before: DEFAULT_REMINDER_DAYS_BEFORE,
        }
    }

    pub fn default_reminder_days_before() -> u32 {
        DEFAULT_REMINDER_DAYS_BEFORE
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_reminder_days_before(mut self, days: u32) -> Self {
        self.reminder_days_before = days;
        self
    }

    /// Date on which the advance reminder should fire, if the bill has a due date.
    pub fn advance_reminder_date(&self) -> Option<NaiveDate> {
        self.due_date.and_then(|due| {
            due.checked_sub_signed(Duration::days(i64::from(self.reminder_days_before)))
        })
    }

    /// `false` when an amount is present but negative or not finite.
    pub fn has_valid_amount(&self) -> bool {
        self.amount
            .map_or(true, |amount| amount.is_finite() && amount >= 0.0)
    }

    /// Returns `true` when the bill carries enough data to schedule reminders.
    pub fn is_schedulable(&self) -> bool {
        self.due_date.is_some()
    }
}

impl NamedEntity for Bill {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Bill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.due_date {
            Some(due) => write!(f, "{} (due {})", self.name, due),
            None => write!(f, "{} (no due date)", self.name),
        }
    }
}

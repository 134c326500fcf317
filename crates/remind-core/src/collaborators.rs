//! Contracts for the external services the scheduler talks to.
//!
//! Every method is a suspension point. Implementations own their own timeout and
//! retry policy; the scheduler only awaits and interprets the outcome.

use async_trait::async_trait;
use uuid::Uuid;

use remind_domain::{
    Bill, Budget, ImmediateAlert, MonthYear, PendingReminder, ReminderEvent, ScheduleId,
};

use crate::ReminderError;

/// At-least-once, fire-and-forget notification delivery keyed by schedule identifiers.
///
/// The sink holds no tenant distinction: `cancel_all` clears every entry it knows.
/// Multi-user hosts must partition sinks per user upstream.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// One-time handler setup (presentation options, channels). Called through
    /// [`ReminderScheduler::initialize`](crate::ReminderScheduler::initialize).
    async fn configure(&self) -> Result<(), ReminderError> {
        Ok(())
    }

    /// Asks the platform for notification capability. `Ok(false)` means the user declined.
    async fn request_permission(&self) -> Result<bool, ReminderError>;

    async fn schedule(&self, event: &ReminderEvent) -> Result<ScheduleId, ReminderError>;

    async fn cancel(&self, id: &ScheduleId) -> Result<(), ReminderError>;

    async fn cancel_all(&self) -> Result<(), ReminderError>;

    async fn send_immediate(&self, alert: &ImmediateAlert) -> Result<(), ReminderError>;

    async fn pending(&self) -> Result<Vec<PendingReminder>, ReminderError>;
}

/// Snapshot access to the user's bills. Ordering of returned lists is unspecified.
#[async_trait]
pub trait BillSource: Send + Sync {
    /// Bills due within `horizon_days` of today, inclusive.
    async fn due_soon(&self, horizon_days: u32) -> Result<Vec<Bill>, ReminderError>;

    /// Bills whose due date has already passed.
    async fn overdue(&self) -> Result<Vec<Bill>, ReminderError>;
}

/// Budget limits and month-to-date spend per category.
#[async_trait]
pub trait BudgetSource: Send + Sync {
    async fn budgets(&self) -> Result<Vec<Budget>, ReminderError>;

    /// Cumulative spend for `category_id` within `period`.
    async fn spend_for_category(
        &self,
        category_id: Uuid,
        period: MonthYear,
    ) -> Result<f64, ReminderError>;
}

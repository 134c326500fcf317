//! Application-facing entry points for turning reminders on and off.

use std::sync::Arc;

use tracing::{info, warn};

use remind_domain::{Bill, Budget, Locale};

use crate::{BillSource, BudgetSource, Clock, ReminderError, ReminderScheduler};

/// Outcome of one `enable_reminders` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderPassReport {
    pub bills_processed: usize,
    pub overdue_bills: usize,
    pub budget_alerts: usize,
}

/// Wires the scheduler to its data sources and a clock.
pub struct ReminderService {
    scheduler: ReminderScheduler,
    bills: Arc<dyn BillSource>,
    budgets: Arc<dyn BudgetSource>,
    clock: Arc<dyn Clock>,
}

impl ReminderService {
    pub fn new(
        scheduler: ReminderScheduler,
        bills: Arc<dyn BillSource>,
        budgets: Arc<dyn BudgetSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            scheduler,
            bills,
            budgets,
            clock,
        }
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    /// Requests permission, then runs a full reminder pass, the overdue summary and
    /// one budget check.
    ///
    /// Only `PermissionDenied` (or a failed permission request) is returned as an
    /// error; every later failure degrades the report instead.
    pub async fn enable_reminders(
        &self,
        user_id: &str,
        locale: Locale,
    ) -> Result<ReminderPassReport, ReminderError> {
        if let Err(err) = self.scheduler.initialize().await {
            warn!(user_id, error = %err, "notification handler setup failed");
        }
        if let Err(err) = self.scheduler.request_permission().await {
            warn!(user_id, error = %err, "reminders not enabled");
            return Err(err);
        }

        let now = self.clock.now();
        let horizon = self.scheduler.planner().settings().due_soon_horizon_days;

        let due_soon = self.fetch_bills("due-soon", self.bills.due_soon(horizon).await);
        let bills_processed = self.scheduler.reschedule_all(&due_soon, now, locale).await;

        let overdue = self.fetch_bills("overdue", self.bills.overdue().await);
        let overdue_bills = self.scheduler.check_overdue_bills(&overdue, now, locale).await;

        let budgets = self.fetch_budgets(self.budgets.budgets().await);
        let budget_alerts = self
            .scheduler
            .check_budget_overspend(&budgets, self.budgets.as_ref(), now, locale)
            .await;

        let report = ReminderPassReport {
            bills_processed,
            overdue_bills,
            budget_alerts,
        };
        info!(
            user_id,
            %locale,
            bills_processed,
            overdue_bills,
            budget_alerts,
            "reminders enabled"
        );
        Ok(report)
    }

    /// Removes every scheduled reminder. Returns `false` if the sink refused.
    pub async fn disable_reminders(&self) -> bool {
        let cleared = self.scheduler.cancel_all().await;
        if cleared {
            info!("reminders disabled");
        }
        cleared
    }

    fn fetch_bills(&self, label: &str, result: Result<Vec<Bill>, ReminderError>) -> Vec<Bill> {
        result.unwrap_or_else(|err| {
            warn!(source = label, error = %err, "bill source unavailable; treating as empty");
            Vec::new()
        })
    }

    fn fetch_budgets(&self, result: Result<Vec<Budget>, ReminderError>) -> Vec<Budget> {
        result.unwrap_or_else(|err| {
            warn!(error = %err, "budget source unavailable; treating as empty");
            Vec::new()
        })
    }
}

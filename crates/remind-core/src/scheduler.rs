//! Applies planned reminders to a notification sink.
//!
//! Every collaborator failure is caught at the smallest scope (one event, one
//! budget), logged, and treated as zero effect so a single bad record cannot
//! suppress the rest of a batch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use remind_domain::{
    Bill, Budget, ImmediateAlert, Locale, MonthYear, PendingReminder, ReminderEvent,
};

use crate::{BudgetSource, NotificationSink, ReminderError, ReminderPlanner};

/// Computes reminders and keeps the sink's schedule in line with the latest bill snapshot.
///
/// Passes on one scheduler are serialized: a second `reschedule_all` or
/// `schedule_bill` waits for the running one to finish before it cancels anything.
pub struct ReminderScheduler {
    planner: ReminderPlanner,
    sink: Arc<dyn NotificationSink>,
    pass_guard: Mutex<()>,
    configured: OnceCell<()>,
}

impl ReminderScheduler {
    pub fn new(planner: ReminderPlanner, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            planner,
            sink,
            pass_guard: Mutex::new(()),
            configured: OnceCell::new(),
        }
    }

    pub fn planner(&self) -> &ReminderPlanner {
        &self.planner
    }

    /// Configures the sink's notification handler. Idempotent: after the first
    /// success later calls return immediately; a failed attempt may be retried.
    pub async fn initialize(&self) -> Result<(), ReminderError> {
        self.configured
            .get_or_try_init(|| async {
                self.sink.configure().await?;
                info!("notification handler configured");
                Ok::<(), ReminderError>(())
            })
            .await
            .map(|_| ())
    }

    /// Asks the sink for notification capability.
    pub async fn request_permission(&self) -> Result<(), ReminderError> {
        match self.sink.request_permission().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ReminderError::PermissionDenied),
            Err(err) => {
                warn!(error = %err, "permission request failed");
                Err(err)
            }
        }
    }

    /// Clears the whole schedule, then schedules fresh reminders for every bill.
    ///
    /// Returns the number of bills processed, which is not the number of events
    /// created. When the clear itself fails nothing is scheduled and `0` is returned.
    pub async fn reschedule_all(
        &self,
        bills: &[Bill],
        now: DateTime<Utc>,
        locale: Locale,
    ) -> usize {
        let _pass = self.pass_guard.lock().await;

        if let Err(err) = self.sink.cancel_all().await {
            warn!(error = %err, "cancel-all failed; reminder pass aborted");
            return 0;
        }

        let mut scheduled = 0usize;
        let mut failed = 0usize;
        for bill in bills {
            if !bill.is_schedulable() {
                debug!(bill_id = %bill.id, "bill has no due date; nothing to schedule");
                continue;
            }
            for event in self.planner.plan(bill, now, locale) {
                if self.submit(&event).await {
                    scheduled += 1;
                } else {
                    failed += 1;
                }
            }
        }

        info!(
            bills = bills.len(),
            scheduled, failed, "reminder pass complete"
        );
        bills.len()
    }

    /// Replaces the reminders of one bill without touching any other entry.
    ///
    /// Returns the number of events scheduled for the bill.
    pub async fn schedule_bill(&self, bill: &Bill, now: DateTime<Utc>, locale: Locale) -> usize {
        let _pass = self.pass_guard.lock().await;

        match self.sink.pending().await {
            Ok(pending) => {
                for entry in pending.iter().filter(|entry| entry.bill_id() == Some(bill.id)) {
                    if let Err(err) = self.sink.cancel(&entry.schedule_id).await {
                        warn!(
                            bill_id = %bill.id,
                            schedule_id = %entry.schedule_id,
                            error = %err,
                            "failed to cancel previous reminder"
                        );
                    }
                }
            }
            Err(err) => {
                warn!(bill_id = %bill.id, error = %err, "could not list pending reminders");
            }
        }

        let mut scheduled = 0;
        for event in self.planner.plan(bill, now, locale) {
            if self.submit(&event).await {
                scheduled += 1;
            }
        }
        scheduled
    }

    /// Sends one immediate alert per budget whose month-to-date usage meets the
    /// threshold. There is no dedup across calls. Returns the number of alerts delivered.
    pub async fn check_budget_overspend(
        &self,
        budgets: &[Budget],
        spend_lookup: &dyn BudgetSource,
        now: DateTime<Utc>,
        locale: Locale,
    ) -> usize {
        let period = MonthYear::containing(self.planner.local_date(now));
        let mut delivered = 0;

        for budget in budgets {
            if !budget.has_valid_limit() {
                let err = ReminderError::InvalidBillData(format!(
                    "budget `{}` has non-positive limit {}",
                    budget.category_name, budget.limit_amount
                ));
                warn!(category_id = %budget.category_id, error = %err, "budget skipped");
                continue;
            }

            let spend = match spend_lookup.spend_for_category(budget.category_id, period).await {
                Ok(spend) => spend,
                Err(err) => {
                    warn!(
                        category_id = %budget.category_id,
                        %period,
                        error = %err,
                        "spend lookup failed; budget skipped"
                    );
                    continue;
                }
            };

            if let Some(alert) = self.planner.overspend_alert(budget, spend, locale) {
                if self.deliver(&alert).await {
                    delivered += 1;
                }
            }
        }

        delivered
    }

    /// Sends one summary alert for the overdue snapshot. Returns the overdue count
    /// whether or not an alert went out.
    pub async fn check_overdue_bills(
        &self,
        bills: &[Bill],
        _now: DateTime<Utc>,
        locale: Locale,
    ) -> usize {
        if let Some(alert) = self.planner.overdue_summary(bills, locale) {
            self.deliver(&alert).await;
        }
        bills.len()
    }

    /// Reminders still waiting in the sink. Empty when the sink cannot be reached.
    pub async fn pending_reminders(&self) -> Vec<PendingReminder> {
        self.sink.pending().await.unwrap_or_else(|err| {
            warn!(error = %err, "could not list pending reminders");
            Vec::new()
        })
    }

    /// Clears the whole schedule. Returns `false` when the sink rejected the request.
    pub async fn cancel_all(&self) -> bool {
        let _pass = self.pass_guard.lock().await;
        match self.sink.cancel_all().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "cancel-all failed");
                false
            }
        }
    }

    async fn submit(&self, event: &ReminderEvent) -> bool {
        match self.sink.schedule(event).await {
            Ok(schedule_id) => {
                debug!(
                    bill_id = %event.bill_id,
                    kind = %event.kind,
                    fires_at = %event.fires_at,
                    %schedule_id,
                    "reminder scheduled"
                );
                true
            }
            Err(err) => {
                warn!(
                    bill_id = %event.bill_id,
                    kind = %event.kind,
                    error = %err,
                    "failed to schedule reminder"
                );
                false
            }
        }
    }

    async fn deliver(&self, alert: &ImmediateAlert) -> bool {
        match self.sink.send_immediate(alert).await {
            Ok(()) => true,
            Err(err) => {
                warn!(kind = %alert.kind, error = %err, "failed to send alert");
                false
            }
        }
    }
}

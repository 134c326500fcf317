//! In-process collaborators for previews, the CLI and tests.
//!
//! Each type can be told to fail specific calls so degraded paths are reachable.

use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use remind_domain::{
    Bill, Budget, ImmediateAlert, MonthYear, PendingReminder, ReminderEvent, ScheduleId,
};

use crate::{BillSource, BudgetSource, NotificationSink, ReminderError};

/// One recorded call against [`InMemoryNotificationSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Configure,
    RequestPermission,
    Schedule { bill_id: Uuid },
    Cancel(ScheduleId),
    CancelAll,
    SendImmediate,
    Pending,
}

#[derive(Debug, Default)]
struct SinkState {
    next_id: u64,
    scheduled: Vec<PendingReminder>,
    delivered: Vec<ImmediateAlert>,
    calls: Vec<SinkCall>,
}

/// Notification sink that keeps its schedule in memory.
#[derive(Debug)]
pub struct InMemoryNotificationSink {
    state: Mutex<SinkState>,
    permission_granted: bool,
    fail_cancel_all: bool,
    fail_immediate: bool,
    failing_bills: HashSet<Uuid>,
}

impl Default for InMemoryNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SinkState::default()),
            permission_granted: true,
            fail_cancel_all: false,
            fail_immediate: false,
            failing_bills: HashSet::new(),
        }
    }

    pub fn deny_permission(mut self) -> Self {
        self.permission_granted = false;
        self
    }

    pub fn fail_cancel_all(mut self) -> Self {
        self.fail_cancel_all = true;
        self
    }

    pub fn fail_immediate(mut self) -> Self {
        self.fail_immediate = true;
        self
    }

    /// Rejects every schedule request for `bill_id`.
    pub fn fail_schedule_for(mut self, bill_id: Uuid) -> Self {
        self.failing_bills.insert(bill_id);
        self
    }

    /// Entries currently scheduled, in creation order.
    pub fn scheduled(&self) -> Vec<PendingReminder> {
        self.lock().scheduled.clone()
    }

    /// Immediate alerts delivered so far.
    pub fn delivered(&self) -> Vec<ImmediateAlert> {
        self.lock().delivered.clone()
    }

    /// Every call received, in order.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn configure(&self) -> Result<(), ReminderError> {
        self.lock().calls.push(SinkCall::Configure);
        Ok(())
    }

    async fn request_permission(&self) -> Result<bool, ReminderError> {
        self.lock().calls.push(SinkCall::RequestPermission);
        Ok(self.permission_granted)
    }

    async fn schedule(&self, event: &ReminderEvent) -> Result<ScheduleId, ReminderError> {
        let mut state = self.lock();
        state.calls.push(SinkCall::Schedule {
            bill_id: event.bill_id,
        });
        if self.failing_bills.contains(&event.bill_id) {
            return Err(ReminderError::unavailable(format!(
                "schedule rejected for bill {}",
                event.bill_id
            )));
        }
        state.next_id += 1;
        let schedule_id = ScheduleId::new(format!("reminder-{}", state.next_id));
        state.scheduled.push(PendingReminder {
            schedule_id: schedule_id.clone(),
            fires_at: event.fires_at,
            title: event.title.clone(),
            body: event.body.clone(),
            metadata: event.metadata(),
        });
        Ok(schedule_id)
    }

    async fn cancel(&self, id: &ScheduleId) -> Result<(), ReminderError> {
        let mut state = self.lock();
        state.calls.push(SinkCall::Cancel(id.clone()));
        state.scheduled.retain(|entry| &entry.schedule_id != id);
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), ReminderError> {
        let mut state = self.lock();
        state.calls.push(SinkCall::CancelAll);
        if self.fail_cancel_all {
            return Err(ReminderError::unavailable("cancel-all rejected"));
        }
        state.scheduled.clear();
        Ok(())
    }

    async fn send_immediate(&self, alert: &ImmediateAlert) -> Result<(), ReminderError> {
        let mut state = self.lock();
        state.calls.push(SinkCall::SendImmediate);
        if self.fail_immediate {
            return Err(ReminderError::unavailable("immediate delivery rejected"));
        }
        state.delivered.push(alert.clone());
        Ok(())
    }

    async fn pending(&self) -> Result<Vec<PendingReminder>, ReminderError> {
        let mut state = self.lock();
        state.calls.push(SinkCall::Pending);
        let mut pending = state.scheduled.clone();
        pending.sort_by_key(|entry| entry.fires_at);
        Ok(pending)
    }
}

/// Bill source backed by a fixed list, evaluated against a reference date.
#[derive(Debug, Clone)]
pub struct StaticBillSource {
    bills: Vec<Bill>,
    today: NaiveDate,
    unavailable: bool,
}

impl StaticBillSource {
    pub fn new(bills: Vec<Bill>, today: NaiveDate) -> Self {
        Self {
            bills,
            today,
            unavailable: false,
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn check(&self) -> Result<(), ReminderError> {
        if self.unavailable {
            Err(ReminderError::unavailable("bill source offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BillSource for StaticBillSource {
    async fn due_soon(&self, horizon_days: u32) -> Result<Vec<Bill>, ReminderError> {
        self.check()?;
        let until = self
            .today
            .checked_add_signed(Duration::days(i64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);
        Ok(self
            .bills
            .iter()
            .filter(|bill| {
                bill.due_date
                    .is_some_and(|due| due >= self.today && due <= until)
            })
            .cloned()
            .collect())
    }

    async fn overdue(&self) -> Result<Vec<Bill>, ReminderError> {
        self.check()?;
        Ok(self
            .bills
            .iter()
            .filter(|bill| bill.due_date.is_some_and(|due| due < self.today))
            .cloned()
            .collect())
    }
}

/// Budget source backed by fixed budgets and spend figures.
#[derive(Debug, Clone, Default)]
pub struct StaticBudgetSource {
    budgets: Vec<Budget>,
    spend: HashMap<(Uuid, MonthYear), f64>,
    failing_categories: HashSet<Uuid>,
}

impl StaticBudgetSource {
    pub fn new(budgets: Vec<Budget>) -> Self {
        Self {
            budgets,
            ..Self::default()
        }
    }

    pub fn with_spend(mut self, category_id: Uuid, period: MonthYear, amount: f64) -> Self {
        self.spend.insert((category_id, period), amount);
        self
    }

    /// Makes spend lookups for `category_id` fail.
    pub fn fail_lookup_for(mut self, category_id: Uuid) -> Self {
        self.failing_categories.insert(category_id);
        self
    }
}

#[async_trait]
impl BudgetSource for StaticBudgetSource {
    async fn budgets(&self) -> Result<Vec<Budget>, ReminderError> {
        Ok(self.budgets.clone())
    }

    async fn spend_for_category(
        &self,
        category_id: Uuid,
        period: MonthYear,
    ) -> Result<f64, ReminderError> {
        if self.failing_categories.contains(&category_id) {
            return Err(ReminderError::unavailable(format!(
                "spend lookup failed for {category_id}"
            )));
        }
        Ok(self
            .spend
            .get(&(category_id, period))
            .copied()
            .unwrap_or(0.0))
    }
}

//! Pure reminder and alert computation. No collaborator calls happen here.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::{debug, warn};

use remind_domain::{
    AlertKind, Bill, Budget, ImmediateAlert, Locale, NamedEntity, ReminderEvent, ReminderKind,
    META_CATEGORY_ID,
};

use crate::{
    messages::{format_amount, MessageCatalog, MessageKind},
    ReminderError, ReminderSettings,
};

/// Turns bill and budget snapshots into reminder events and alerts.
#[derive(Debug, Clone)]
pub struct ReminderPlanner {
    settings: ReminderSettings,
    catalog: MessageCatalog,
}

impl ReminderPlanner {
    pub fn new(settings: ReminderSettings, catalog: MessageCatalog) -> Self {
        Self { settings, catalog }
    }

    pub fn settings(&self) -> &ReminderSettings {
        &self.settings
    }

    /// Reminder fired `reminder_days_before` days ahead of the due date at the
    /// advance time of day. `None` when the bill has no due date or the fire time
    /// is not strictly after `now`.
    pub fn advance_reminder(
        &self,
        bill: &Bill,
        now: DateTime<Utc>,
        locale: Locale,
    ) -> Option<ReminderEvent> {
        let date = bill.advance_reminder_date()?;
        let fires_at = self.future_fire_time(date, self.settings.advance_reminder_time, now)?;
        let days = bill.reminder_days_before.to_string();
        self.build_event(bill, ReminderKind::AdvanceReminder, fires_at, locale, Some(days))
    }

    /// Reminder fired on the due date itself at the due-today time of day.
    ///
    /// Only produced on the due date (local to the configured offset) while the
    /// fire time is still ahead; earlier passes rely on the advance reminder.
    pub fn due_today_reminder(
        &self,
        bill: &Bill,
        now: DateTime<Utc>,
        locale: Locale,
    ) -> Option<ReminderEvent> {
        let date = bill.due_date?;
        if date != self.local_date(now) {
            return None;
        }
        let fires_at = self.future_fire_time(date, self.settings.due_today_time, now)?;
        self.build_event(bill, ReminderKind::DueToday, fires_at, locale, None)
    }

    /// Both reminders for one bill, advance first.
    pub fn plan(&self, bill: &Bill, now: DateTime<Utc>, locale: Locale) -> Vec<ReminderEvent> {
        [
            self.advance_reminder(bill, now, locale),
            self.due_today_reminder(bill, now, locale),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Local date of `now` in the configured offset.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.settings.utc_offset).date_naive()
    }

    /// Alert for a budget whose rounded usage meets the threshold. Budgets with a
    /// non-positive limit never alert.
    pub fn overspend_alert(
        &self,
        budget: &Budget,
        spend: f64,
        locale: Locale,
    ) -> Option<ImmediateAlert> {
        let percent = budget.percent_used(spend)?;
        if percent < self.settings.overspend_threshold_percent {
            return None;
        }
        let (title, body) = self.render(
            MessageKind::BudgetOverspend,
            locale,
            &[
                ("category", budget.name().to_string()),
                ("percent", percent.to_string()),
            ],
        )?;
        Some(
            ImmediateAlert::new(AlertKind::BudgetOverspend, title, body)
                .with_metadata(META_CATEGORY_ID, budget.category_id.to_string()),
        )
    }

    /// One summary alert naming the first few overdue bills in input order.
    pub fn overdue_summary(&self, bills: &[Bill], locale: Locale) -> Option<ImmediateAlert> {
        if bills.is_empty() {
            return None;
        }
        let limit = self.settings.overdue_preview_limit;
        let mut names = bills
            .iter()
            .take(limit)
            .map(|bill| bill.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if bills.len() > limit {
            names.push_str("...");
        }
        let (title, body) = self.render(
            MessageKind::OverdueSummary,
            locale,
            &[("count", bills.len().to_string()), ("names", names)],
        )?;
        Some(ImmediateAlert::new(AlertKind::OverdueSummary, title, body))
    }

    fn future_fire_time(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        now: DateTime<Utc>,
    ) -> Option<DateTime<FixedOffset>> {
        let offset = self.settings.utc_offset;
        let fires_at = offset.from_local_datetime(&date.and_time(time)).single()?;
        if fires_at <= now.with_timezone(&offset) {
            debug!(%fires_at, "fire time already elapsed; skipping");
            return None;
        }
        Some(fires_at)
    }

    fn build_event(
        &self,
        bill: &Bill,
        kind: ReminderKind,
        fires_at: DateTime<FixedOffset>,
        locale: Locale,
        days: Option<String>,
    ) -> Option<ReminderEvent> {
        let mut values = vec![("name", bill.name.clone())];
        if let Some(days) = days {
            values.push(("days", days));
        }
        match bill.amount {
            Some(amount) if bill.has_valid_amount() => {
                values.push(("amount", format_amount(amount)));
            }
            Some(amount) => {
                let err =
                    ReminderError::InvalidBillData(format!("amount {amount} is not payable"));
                warn!(bill_id = %bill.id, error = %err, "amount omitted from reminder");
            }
            None => {}
        }
        let (title, body) = self.render(kind.into(), locale, &values)?;
        Some(ReminderEvent {
            kind,
            bill_id: bill.id,
            fires_at,
            title,
            body,
        })
    }

    fn render(
        &self,
        kind: MessageKind,
        locale: Locale,
        values: &[(&str, String)],
    ) -> Option<(String, String)> {
        let rendered = self.catalog.render(kind, locale, values);
        if rendered.is_none() {
            warn!(?kind, %locale, "no message template; notification dropped");
        }
        rendered
    }
}

impl Default for ReminderPlanner {
    fn default() -> Self {
        Self::new(ReminderSettings::default(), MessageCatalog::builtin())
    }
}

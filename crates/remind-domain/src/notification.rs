//! Notification payloads exchanged with the delivery sink.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata key carrying the notification kind tag.
pub const META_KIND: &str = "kind";
/// Metadata key carrying the originating bill identifier.
pub const META_BILL_ID: &str = "bill_id";
/// Metadata key carrying the budget category identifier.
pub const META_CATEGORY_ID: &str = "category_id";

/// String metadata attached to every notification for later correlation.
pub type NotificationMetadata = BTreeMap<String, String>;

/// Kinds of scheduled (future) bill reminders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    AdvanceReminder,
    DueToday,
}

impl ReminderKind {
    pub fn tag(self) -> &'static str {
        match self {
            ReminderKind::AdvanceReminder => "advance_reminder",
            ReminderKind::DueToday => "due_today",
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Kinds of immediate (undelayed) alerts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    BudgetOverspend,
    OverdueSummary,
}

impl AlertKind {
    pub fn tag(self) -> &'static str {
        match self {
            AlertKind::BudgetOverspend => "budget_overspend",
            AlertKind::OverdueSummary => "overdue_summary",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Opaque handle issued by the notification sink when a reminder is scheduled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleId(pub String);

impl ScheduleId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A computed future reminder for one bill, ready to hand to the sink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReminderEvent {
    pub kind: ReminderKind,
    pub bill_id: Uuid,
    pub fires_at: DateTime<FixedOffset>,
    pub title: String,
    pub body: String,
}

impl ReminderEvent {
    /// Correlation metadata stored alongside the scheduled notification.
    pub fn metadata(&self) -> NotificationMetadata {
        let mut metadata = NotificationMetadata::new();
        metadata.insert(META_KIND.into(), self.kind.tag().into());
        metadata.insert(META_BILL_ID.into(), self.bill_id.to_string());
        metadata
    }
}

/// An alert delivered immediately rather than scheduled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImmediateAlert {
    pub kind: AlertKind,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub metadata: NotificationMetadata,
}

impl ImmediateAlert {
    pub fn new(kind: AlertKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        let mut metadata = NotificationMetadata::new();
        metadata.insert(META_KIND.into(), kind.tag().into());
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            metadata,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A notification still waiting in the sink's schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingReminder {
    pub schedule_id: ScheduleId,
    pub fires_at: DateTime<FixedOffset>,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub metadata: NotificationMetadata,
}

impl PendingReminder {
    /// Bill this entry was scheduled for, when the metadata carries one.
    pub fn bill_id(&self) -> Option<Uuid> {
        self.metadata
            .get(META_BILL_ID)
            .and_then(|raw| Uuid::parse_str(raw).ok())
    }

    pub fn kind(&self) -> Option<ReminderKind> {
        match self.metadata.get(META_KIND).map(String::as_str) {
            Some("advance_reminder") => Some(ReminderKind::AdvanceReminder),
            Some("due_today") => Some(ReminderKind::DueToday),
            _ => None,
        }
    }
}

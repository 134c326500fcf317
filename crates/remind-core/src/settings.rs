use chrono::{FixedOffset, NaiveTime, Offset, Utc};

pub const DEFAULT_OVERSPEND_THRESHOLD_PERCENT: i64 = 90;
pub const DEFAULT_DUE_SOON_HORIZON_DAYS: u32 = 7;
pub const DEFAULT_OVERDUE_PREVIEW_LIMIT: usize = 3;

/// Tunables for reminder computation. All times are wall-clock times in `utc_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSettings {
    pub utc_offset: FixedOffset,
    pub advance_reminder_time: NaiveTime,
    pub due_today_time: NaiveTime,
    pub overspend_threshold_percent: i64,
    pub due_soon_horizon_days: u32,
    pub overdue_preview_limit: usize,
}

impl ReminderSettings {
    pub fn default_advance_reminder_time() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn default_due_today_time() -> NaiveTime {
        NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            utc_offset: Utc.fix(),
            advance_reminder_time: Self::default_advance_reminder_time(),
            due_today_time: Self::default_due_today_time(),
            overspend_threshold_percent: DEFAULT_OVERSPEND_THRESHOLD_PERCENT,
            due_soon_horizon_days: DEFAULT_DUE_SOON_HORIZON_DAYS,
            overdue_preview_limit: DEFAULT_OVERDUE_PREVIEW_LIMIT,
        }
    }
}

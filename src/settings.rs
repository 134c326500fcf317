//! Bridges persisted configuration to the scheduler's runtime settings.

use remind_config::{Config, ConfigError};
use remind_core::ReminderSettings;

/// Builds validated scheduler settings from a stored config.
pub fn reminder_settings(config: &Config) -> Result<ReminderSettings, ConfigError> {
    config.validate()?;
    Ok(ReminderSettings {
        utc_offset: config.utc_offset()?,
        advance_reminder_time: config.advance_time()?,
        due_today_time: config.due_today()?,
        overspend_threshold_percent: config.overspend_threshold_percent,
        due_soon_horizon_days: config.due_soon_horizon_days,
        overdue_preview_limit: config.overdue_preview_limit,
    })
}

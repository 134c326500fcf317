use std::path::PathBuf;

use chrono::{FixedOffset, NaiveTime};
use remind_domain::Locale;
use serde::{de::Deserializer, Deserialize, Serialize};

use crate::ConfigError;

/// Environment variable that overrides the configuration base directory.
pub const HOME_ENV: &str = "BILL_REMINDERS_HOME";

const TIME_FORMAT: &str = "%H:%M";

/// Upper bound for `due_soon_horizon_days`.
pub const MAX_DUE_SOON_HORIZON_DAYS: u32 = 366;

/// Stores user-configurable reminder preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default, deserialize_with = "lenient_locale")]
    pub locale: Locale,
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "Config::default_advance_reminder_time")]
    pub advance_reminder_time: String,
    #[serde(default = "Config::default_due_today_time")]
    pub due_today_time: String,
    #[serde(default = "Config::default_overspend_threshold_percent")]
    pub overspend_threshold_percent: i64,
    #[serde(default = "Config::default_due_soon_horizon_days")]
    pub due_soon_horizon_days: u32,
    #[serde(default = "Config::default_overdue_preview_limit")]
    pub overdue_preview_limit: usize,
    #[serde(default = "Config::default_reminders_enabled")]
    pub reminders_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            utc_offset_minutes: 0,
            advance_reminder_time: Self::default_advance_reminder_time(),
            due_today_time: Self::default_due_today_time(),
            overspend_threshold_percent: Self::default_overspend_threshold_percent(),
            due_soon_horizon_days: Self::default_due_soon_horizon_days(),
            overdue_preview_limit: Self::default_overdue_preview_limit(),
            reminders_enabled: Self::default_reminders_enabled(),
        }
    }
}

impl Config {
    pub fn default_advance_reminder_time() -> String {
        "09:00".into()
    }

    pub fn default_due_today_time() -> String {
        "08:00".into()
    }

    pub fn default_overspend_threshold_percent() -> i64 {
        90
    }

    pub fn default_due_soon_horizon_days() -> u32 {
        7
    }

    pub fn default_overdue_preview_limit() -> usize {
        3
    }

    pub fn default_reminders_enabled() -> bool {
        true
    }

    /// Base directory for configuration files: `$BILL_REMINDERS_HOME` when set,
    /// otherwise the platform config directory.
    pub fn resolve_base_dir() -> PathBuf {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
            return PathBuf::from(home);
        }

        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("bill-reminders")
    }

    pub fn advance_time(&self) -> Result<NaiveTime, ConfigError> {
        parse_time("advance_reminder_time", &self.advance_reminder_time)
    }

    pub fn due_today(&self) -> Result<NaiveTime, ConfigError> {
        parse_time("due_today_time", &self.due_today_time)
    }

    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).ok_or_else(|| {
            ConfigError::Invalid {
                field: "utc_offset_minutes",
                reason: format!("{} is outside +/-24h", self.utc_offset_minutes),
            }
        })
    }

    /// Checks every field that cannot be expressed by its type alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.advance_time()?;
        self.due_today()?;
        self.utc_offset()?;
        if self.overspend_threshold_percent <= 0 {
            return Err(ConfigError::Invalid {
                field: "overspend_threshold_percent",
                reason: "must be positive".into(),
            });
        }
        if self.due_soon_horizon_days > MAX_DUE_SOON_HORIZON_DAYS {
            return Err(ConfigError::Invalid {
                field: "due_soon_horizon_days",
                reason: format!(
                    "{} exceeds {MAX_DUE_SOON_HORIZON_DAYS} days",
                    self.due_soon_horizon_days
                ),
            });
        }
        if self.overdue_preview_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "overdue_preview_limit",
                reason: "must name at least one bill".into(),
            });
        }
        Ok(())
    }
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|err| ConfigError::Invalid {
        field,
        reason: format!("`{value}` is not HH:MM ({err})"),
    })
}

fn lenient_locale<'de, D>(deserializer: D) -> Result<Locale, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|tag| tag.parse().ok())
        .unwrap_or_default())
}

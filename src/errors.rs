use thiserror::Error;

use remind_config::ConfigError;
use remind_core::ReminderError;

/// Failures surfaced at the application boundary (CLI, snapshot loading).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Reminder error: {0}")]
    Reminder(#[from] ReminderError),
    #[error("Usage: {0}")]
    Usage(String),
}

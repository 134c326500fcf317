//! remind-core
//!
//! Reminder scheduling logic for bills and budgets.
//! Depends on remind-domain. No terminal I/O and no concrete delivery mechanism:
//! notification sinks and data sources are reached through async traits.

pub mod collaborators;
pub mod error;
pub mod memory;
pub mod messages;
pub mod planner;
pub mod scheduler;
pub mod service;
pub mod settings;
pub mod time;

#[cfg(test)]
mod tests;

pub use collaborators::*;
pub use error::ReminderError;
pub use messages::{MessageCatalog, MessageKind, MessageTemplate};
pub use planner::ReminderPlanner;
pub use scheduler::ReminderScheduler;
pub use service::{ReminderPassReport, ReminderService};
pub use settings::ReminderSettings;
pub use time::{Clock, FixedClock};

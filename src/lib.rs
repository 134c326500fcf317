#![doc(test(attr(deny(warnings))))]

//! Bill Reminders wires the reminder scheduling core to configuration, a system
//! clock and JSON snapshots, and ships a small CLI for previewing a reminder pass.

pub mod cli;
pub mod clock;
pub mod errors;
pub mod settings;
pub mod snapshot;
pub mod utils;

pub use remind_config as config;
pub use remind_core as reminders;
pub use remind_domain as domain;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log. Safe to call repeatedly.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Bill Reminders tracing initialized.");
    });
}

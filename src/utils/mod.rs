pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Info-level defaults for every workspace crate.
const DEFAULT_DIRECTIVES: [&str; 3] = [
    "bill_reminders=info",
    "remind_core=info",
    "remind_config=info",
];

/// Initializes the global tracing subscriber, writing to stderr so CLI output stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = default_directives()
            .into_iter()
            .fold(EnvFilter::from_default_env(), EnvFilter::add_directive);

        // A subscriber may already be installed by an embedding application.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

fn default_directives() -> Vec<Directive> {
    DEFAULT_DIRECTIVES
        .iter()
        .filter_map(|raw| raw.parse().ok())
        .collect()
}

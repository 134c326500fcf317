pub mod commands;
pub mod output;

use std::sync::Arc;

use remind_config::{Config, ConfigManager};
use remind_core::{
    memory::InMemoryNotificationSink, Clock, FixedClock, MessageCatalog, ReminderError,
    ReminderPlanner, ReminderScheduler, ReminderService,
};
use remind_domain::PendingReminder;

use crate::{clock::SystemClock, errors::AppError, settings::reminder_settings, snapshot, utils};

pub use commands::{Command, PlanArgs, USAGE};

/// Runs the CLI against the given arguments (excluding the program name).
pub async fn run_cli<I, S>(args: I) -> Result<(), AppError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    output::set_plain(std::env::var_os("NO_COLOR").is_some());
    match Command::parse(args)? {
        Command::Plan(args) => plan(args).await,
        Command::Config => show_config(),
        Command::Version => {
            println!("{}", utils::build_info::current());
            Ok(())
        }
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
    }
}

async fn plan(args: PlanArgs) -> Result<(), AppError> {
    let config = ConfigManager::from_env()?.load()?;
    let settings = reminder_settings(&config)?;
    let locale = args.locale.unwrap_or(config.locale);
    let snapshot = snapshot::load_snapshot(&args.snapshot)?;

    let clock: Arc<dyn Clock> = match args.now {
        Some(now) => Arc::new(FixedClock(now)),
        None => Arc::new(SystemClock),
    };
    let planner = ReminderPlanner::new(settings, MessageCatalog::builtin());
    let today = planner.local_date(clock.now());

    let sink = Arc::new(InMemoryNotificationSink::new());
    let service = ReminderService::new(
        ReminderScheduler::new(planner, sink.clone()),
        Arc::new(snapshot.bill_source(today)),
        Arc::new(snapshot.budget_source()),
        clock,
    );

    if !config.reminders_enabled {
        service.disable_reminders().await;
        output::warning("Reminders are disabled in the configuration; nothing scheduled.");
        return Ok(());
    }

    let report = match service.enable_reminders(&args.user_id, locale).await {
        Ok(report) => report,
        Err(ReminderError::PermissionDenied) => {
            output::warning("Notification permission was not granted.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    output::section("Scheduled reminders");
    let pending = service.scheduler().pending_reminders().await;
    if pending.is_empty() {
        output::info("No upcoming reminders.");
    }
    for entry in &pending {
        print_pending(entry);
    }

    output::section("Immediate alerts");
    let alerts = sink.delivered();
    if alerts.is_empty() {
        output::info("No alerts.");
    }
    for alert in &alerts {
        output::warning(format!("{}: {}", alert.title, alert.body));
    }

    output::success(format!(
        "{} bill(s) processed, {} overdue, {} budget alert(s).",
        report.bills_processed, report.overdue_bills, report.budget_alerts
    ));
    Ok(())
}

fn print_pending(entry: &PendingReminder) {
    output::info(format!(
        "{}  {}: {}",
        entry.fires_at.format("%Y-%m-%d %H:%M %:z"),
        entry.title,
        entry.body
    ));
}

fn show_config() -> Result<(), AppError> {
    let manager = ConfigManager::from_env()?;
    let config: Config = manager.load()?;
    output::section("Configuration");
    output::info(format!("path: {}", manager.config_path().display()));
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

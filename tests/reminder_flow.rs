mod common;

use std::sync::Arc;

use bill_reminders::{
    config::Config,
    reminders::{
        memory::{InMemoryNotificationSink, SinkCall},
        FixedClock, MessageCatalog, MessageKind, MessageTemplate, ReminderPlanner,
        ReminderScheduler, ReminderService,
    },
    settings::reminder_settings,
    snapshot::{Snapshot, SpendEntry},
};
use bill_reminders::domain::{AlertKind, Bill, Budget, Locale, ReminderKind};
use chrono::{Datelike, TimeZone, Utc};
use common::{date, reference_now, reference_today};

fn household_snapshot() -> (Snapshot, Budget) {
    let groceries = Budget::new("Groceries", 400.0);
    let snapshot = Snapshot {
        bills: vec![
            Bill::new("Internet", Some(date(2025, 4, 15))).with_amount(59.99),
            Bill::new("Insurance", Some(date(2025, 4, 10))),
            Bill::new("Mortgage", Some(date(2025, 5, 30))),
            Bill::new("Parking", Some(date(2025, 4, 2))),
            Bill::new("Donation", None),
        ],
        budgets: vec![groceries.clone(), Budget::new("Fuel", 150.0)],
        spend: vec![SpendEntry {
            category_id: groceries.category_id,
            month: reference_today().month(),
            year: reference_today().year(),
            amount: 380.0,
        }],
    };
    (snapshot, groceries)
}

fn service_for(snapshot: &Snapshot, sink: Arc<InMemoryNotificationSink>) -> ReminderService {
    let settings = reminder_settings(&Config::default()).expect("default settings");
    ReminderService::new(
        ReminderScheduler::new(ReminderPlanner::new(settings, MessageCatalog::builtin()), sink),
        Arc::new(snapshot.bill_source(reference_today())),
        Arc::new(snapshot.budget_source()),
        Arc::new(FixedClock(reference_now())),
    )
}

#[tokio::test]
async fn snapshot_pass_schedules_alerts_and_reports() {
    let (snapshot, groceries) = household_snapshot();
    let sink = Arc::new(InMemoryNotificationSink::new());
    let service = service_for(&snapshot, sink.clone());

    let report = service
        .enable_reminders("household", Locale::English)
        .await
        .expect("reminders enabled");

    // Internet and Insurance fall inside the 7-day horizon.
    assert_eq!(report.bills_processed, 2);
    assert_eq!(report.overdue_bills, 1);
    assert_eq!(report.budget_alerts, 1);

    let pending = service.scheduler().pending_reminders().await;
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].kind(), Some(ReminderKind::DueToday));
    assert_eq!(
        pending[0].fires_at,
        Utc.with_ymd_and_hms(2025, 4, 10, 8, 0, 0).unwrap()
    );
    assert_eq!(pending[1].kind(), Some(ReminderKind::AdvanceReminder));
    assert_eq!(pending[1].body, "Internet (59.99) is due in 3 day(s).");

    let alerts = sink.delivered();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].kind, AlertKind::OverdueSummary);
    assert_eq!(alerts[0].body, "1 overdue bill(s): Parking");
    assert_eq!(alerts[1].kind, AlertKind::BudgetOverspend);
    assert_eq!(
        alerts[1].metadata.get("category_id"),
        Some(&groceries.category_id.to_string())
    );
}

#[tokio::test]
async fn enabling_twice_keeps_schedule_stable() {
    let (snapshot, _) = household_snapshot();
    let sink = Arc::new(InMemoryNotificationSink::new());
    let service = service_for(&snapshot, sink.clone());

    service.enable_reminders("household", Locale::Korean).await.expect("first");
    let first = sink.scheduled().len();
    service.enable_reminders("household", Locale::Korean).await.expect("second");
    let second = sink.scheduled().len();

    assert_eq!(first, second);
    let configures = sink
        .calls()
        .into_iter()
        .filter(|call| *call == SinkCall::Configure)
        .count();
    assert_eq!(configures, 1);
    let titles: Vec<String> = sink.scheduled().into_iter().map(|entry| entry.title).collect();
    assert_eq!(titles, vec!["결제 예정: Internet", "오늘 결제일: Insurance"]);
}

#[tokio::test]
async fn caller_supplied_catalog_overrides_text() {
    let catalog = MessageCatalog::builtin().with_template(
        MessageKind::AdvanceReminder,
        Locale::English,
        MessageTemplate::new("Heads up", "{name} in {days}d"),
    );
    let sink = Arc::new(InMemoryNotificationSink::new());
    let scheduler = ReminderScheduler::new(
        ReminderPlanner::new(Default::default(), catalog),
        sink.clone(),
    );

    let bill = Bill::new("Water", Some(date(2025, 4, 20))).with_reminder_days_before(5);
    scheduler
        .reschedule_all(&[bill], reference_now(), Locale::English)
        .await;

    let scheduled = sink.scheduled();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].title, "Heads up");
    assert_eq!(scheduled[0].body, "Water in 5d");
}

#[tokio::test]
async fn concurrent_passes_do_not_interleave() {
    let bills: Vec<Bill> = (1..=5)
        .map(|n| Bill::new(format!("Bill {n}"), Some(date(2025, 4, 20 + n))))
        .collect();
    let sink = Arc::new(InMemoryNotificationSink::new());
    let scheduler = ReminderScheduler::new(ReminderPlanner::default(), sink.clone());

    let (a, b) = tokio::join!(
        scheduler.reschedule_all(&bills, reference_now(), Locale::English),
        scheduler.reschedule_all(&bills, reference_now(), Locale::English),
    );

    assert_eq!((a, b), (5, 5));
    assert_eq!(sink.scheduled().len(), 5);
    let calls = sink.calls();
    let clears: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, call)| **call == SinkCall::CancelAll)
        .map(|(idx, _)| idx)
        .collect();
    assert_eq!(clears, vec![0, 6]);
}

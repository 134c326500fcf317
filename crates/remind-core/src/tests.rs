use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::{
    memory::{InMemoryNotificationSink, SinkCall, StaticBillSource, StaticBudgetSource},
    BillSource, FixedClock, ReminderError, ReminderPlanner, ReminderScheduler, ReminderService,
};
use remind_domain::{Bill, Budget, Locale, MonthYear, ReminderKind};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap()
}

fn today() -> NaiveDate {
    now().date_naive()
}

fn scheduler_with(sink: Arc<InMemoryNotificationSink>) -> ReminderScheduler {
    ReminderScheduler::new(ReminderPlanner::default(), sink)
}

#[tokio::test]
async fn internet_bill_gets_single_advance_reminder() {
    let sink = Arc::new(InMemoryNotificationSink::new());
    let scheduler = scheduler_with(sink.clone());
    let bill = Bill::new("Internet", Some(today() + Duration::days(5)));

    let processed = scheduler
        .reschedule_all(&[bill.clone()], now(), Locale::English)
        .await;

    assert_eq!(processed, 1);
    let pending = scheduler.pending_reminders().await;
    let advance: Vec<_> = pending
        .iter()
        .filter(|entry| entry.kind() == Some(ReminderKind::AdvanceReminder))
        .collect();
    assert_eq!(advance.len(), 1);
    assert_eq!(
        advance[0].fires_at,
        Utc.with_ymd_and_hms(2025, 4, 12, 9, 0, 0).unwrap()
    );
    assert_eq!(advance[0].bill_id(), Some(bill.id));
    assert!(pending
        .iter()
        .all(|entry| entry.kind() != Some(ReminderKind::DueToday)));
}

#[tokio::test]
async fn cancel_all_precedes_every_schedule_call() {
    for bills in [
        Vec::new(),
        vec![
            Bill::new("Rent", Some(today() + Duration::days(10))),
            Bill::new("Gas", Some(today() + Duration::days(20))),
        ],
    ] {
        let sink = Arc::new(InMemoryNotificationSink::new());
        let scheduler = scheduler_with(sink.clone());

        scheduler.reschedule_all(&bills, now(), Locale::English).await;

        let calls = sink.calls();
        assert_eq!(calls.first(), Some(&SinkCall::CancelAll));
        assert_eq!(
            calls.iter().filter(|call| **call == SinkCall::CancelAll).count(),
            1
        );
        let schedules = calls
            .iter()
            .filter(|call| matches!(call, SinkCall::Schedule { .. }))
            .count();
        assert_eq!(schedules, bills.len());
    }
}

#[tokio::test]
async fn repeated_pass_yields_same_schedule() {
    let sink = Arc::new(InMemoryNotificationSink::new());
    let scheduler = scheduler_with(sink.clone());
    let early = Utc.with_ymd_and_hms(2025, 4, 10, 6, 0, 0).unwrap();
    let bills = vec![
        Bill::new("Water", Some(today() + Duration::days(8))),
        Bill::new("Insurance", Some(today())),
        Bill::new("Unknown", None),
    ];

    let first = scheduler.reschedule_all(&bills, early, Locale::English).await;
    let first_count = sink.scheduled().len();
    let second = scheduler.reschedule_all(&bills, early, Locale::English).await;
    let second_count = sink.scheduled().len();

    assert_eq!(first, 3);
    assert_eq!(first, second);
    assert_eq!(first_count, second_count);
    // Water: advance only. Insurance: due today before 08:00, advance long elapsed.
    assert_eq!(second_count, 2);
}

#[tokio::test]
async fn one_failing_bill_does_not_abort_the_pass() {
    let broken = Bill::new("Broken", Some(today() + Duration::days(9)));
    let healthy = Bill::new("Healthy", Some(today() + Duration::days(9)));
    let sink = Arc::new(InMemoryNotificationSink::new().fail_schedule_for(broken.id));
    let scheduler = scheduler_with(sink.clone());

    let processed = scheduler
        .reschedule_all(&[broken, healthy.clone()], now(), Locale::English)
        .await;

    assert_eq!(processed, 2);
    let scheduled = sink.scheduled();
    assert_eq!(scheduled.len(), 1);
    assert!(scheduled.iter().all(|entry| entry.bill_id() == Some(healthy.id)));
}

#[tokio::test]
async fn failed_clear_aborts_pass_with_zero() {
    let sink = Arc::new(InMemoryNotificationSink::new().fail_cancel_all());
    let scheduler = scheduler_with(sink.clone());
    let bill = Bill::new("Rent", Some(today() + Duration::days(10)));

    let processed = scheduler.reschedule_all(&[bill], now(), Locale::English).await;

    assert_eq!(processed, 0);
    assert!(sink.scheduled().is_empty());
}

#[tokio::test]
async fn schedule_bill_replaces_only_that_bills_entries() {
    let sink = Arc::new(InMemoryNotificationSink::new());
    let scheduler = scheduler_with(sink.clone());
    let mut edited = Bill::new("Phone", Some(today() + Duration::days(10)));
    let other = Bill::new("Cable", Some(today() + Duration::days(12)));
    scheduler
        .reschedule_all(&[edited.clone(), other.clone()], now(), Locale::English)
        .await;
    assert_eq!(sink.scheduled().len(), 2);

    edited.due_date = Some(today() + Duration::days(20));
    let created = scheduler.schedule_bill(&edited, now(), Locale::English).await;

    assert_eq!(created, 1);
    let scheduled = sink.scheduled();
    assert_eq!(scheduled.len(), 2);
    assert_eq!(
        scheduled
            .iter()
            .filter(|entry| entry.bill_id() == Some(other.id))
            .count(),
        1
    );
    let replaced = scheduled
        .iter()
        .find(|entry| entry.bill_id() == Some(edited.id))
        .expect("edited bill rescheduled");
    assert_eq!(
        replaced.fires_at,
        Utc.with_ymd_and_hms(2025, 4, 27, 9, 0, 0).unwrap()
    );
    assert!(sink
        .calls()
        .iter()
        .any(|call| matches!(call, SinkCall::Cancel(_))));
}

#[tokio::test]
async fn budget_check_alerts_on_every_call_and_skips_bad_limits() {
    let sink = Arc::new(InMemoryNotificationSink::new());
    let scheduler = scheduler_with(sink.clone());
    let period = MonthYear::containing(today());
    let over = Budget::new("Dining", 200.0);
    let under = Budget::new("Transport", 100.0);
    let invalid = Budget::new("Broken", 0.0);
    let offline = Budget::new("Offline", 50.0);
    let source = StaticBudgetSource::new(vec![])
        .with_spend(over.category_id, period, 179.0)
        .with_spend(under.category_id, period, 89.4)
        .with_spend(invalid.category_id, period, 10.0)
        .fail_lookup_for(offline.category_id);
    let budgets = vec![over, under, invalid, offline];

    let first = scheduler
        .check_budget_overspend(&budgets, &source, now(), Locale::English)
        .await;
    let second = scheduler
        .check_budget_overspend(&budgets, &source, now(), Locale::English)
        .await;

    assert_eq!(first, 1);
    assert_eq!(second, 1);
    let delivered = sink.delivered();
    assert_eq!(delivered.len(), 2);
    assert_eq!(delivered[0].title, "Budget alert: Dining");
}

#[tokio::test]
async fn overdue_check_returns_count_even_without_alert() {
    let sink = Arc::new(InMemoryNotificationSink::new());
    let scheduler = scheduler_with(sink.clone());

    assert_eq!(scheduler.check_overdue_bills(&[], now(), Locale::English).await, 0);
    assert!(sink.delivered().is_empty());

    let overdue: Vec<Bill> = ["A", "B", "C", "D"]
        .into_iter()
        .map(|name| Bill::new(name, Some(today() - Duration::days(1))))
        .collect();
    assert_eq!(
        scheduler.check_overdue_bills(&overdue, now(), Locale::English).await,
        4
    );
    let delivered = sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert!(delivered[0].body.contains("A, B, C..."));
}

#[tokio::test]
async fn overdue_count_survives_delivery_failure() {
    let sink = Arc::new(InMemoryNotificationSink::new().fail_immediate());
    let scheduler = scheduler_with(sink.clone());
    let overdue = vec![Bill::new("Late", Some(today() - Duration::days(3)))];

    assert_eq!(
        scheduler.check_overdue_bills(&overdue, now(), Locale::Korean).await,
        1
    );
    assert!(sink.delivered().is_empty());
}

#[tokio::test]
async fn initialize_configures_sink_once() {
    let sink = Arc::new(InMemoryNotificationSink::new());
    let scheduler = scheduler_with(sink.clone());

    scheduler.initialize().await.expect("first init");
    scheduler.initialize().await.expect("second init");

    let configures = sink
        .calls()
        .iter()
        .filter(|call| **call == SinkCall::Configure)
        .count();
    assert_eq!(configures, 1);
}

fn service(sink: Arc<InMemoryNotificationSink>, bills: StaticBillSource) -> ReminderService {
    ReminderService::new(
        scheduler_with(sink),
        Arc::new(bills),
        Arc::new(StaticBudgetSource::default()),
        Arc::new(FixedClock(now())),
    )
}

#[tokio::test]
async fn enable_reminders_runs_full_pass() {
    let sink = Arc::new(InMemoryNotificationSink::new());
    let bills = StaticBillSource::new(
        vec![
            Bill::new("Soon", Some(today() + Duration::days(6))),
            Bill::new("Later", Some(today() + Duration::days(40))),
            Bill::new("Late", Some(today() - Duration::days(2))),
        ],
        today(),
    );
    let service = service(sink.clone(), bills);

    let report = service
        .enable_reminders("user-1", Locale::English)
        .await
        .expect("enabled");

    assert_eq!(report.bills_processed, 1);
    assert_eq!(report.overdue_bills, 1);
    assert_eq!(report.budget_alerts, 0);
    assert_eq!(sink.scheduled().len(), 1);
    assert_eq!(sink.delivered().len(), 1);

    assert!(service.disable_reminders().await);
    assert!(sink.scheduled().is_empty());
}

#[tokio::test]
async fn denied_permission_schedules_nothing() {
    let sink = Arc::new(InMemoryNotificationSink::new().deny_permission());
    let bills = StaticBillSource::new(
        vec![Bill::new("Soon", Some(today() + Duration::days(6)))],
        today(),
    );
    let service = service(sink.clone(), bills);

    let result = service.enable_reminders("user-1", Locale::English).await;

    assert_eq!(result, Err(ReminderError::PermissionDenied));
    assert!(sink.scheduled().is_empty());
    assert!(!sink.calls().contains(&SinkCall::CancelAll));
}

#[tokio::test]
async fn unavailable_bill_source_degrades_to_empty_pass() {
    let sink = Arc::new(InMemoryNotificationSink::new());
    let bills = StaticBillSource::new(vec![], today()).unavailable();
    let service = service(sink.clone(), bills);

    let report = service
        .enable_reminders("user-1", Locale::Korean)
        .await
        .expect("degraded success");

    assert_eq!(report.bills_processed, 0);
    assert_eq!(report.overdue_bills, 0);
    assert_eq!(sink.calls().iter().filter(|c| **c == SinkCall::CancelAll).count(), 1);
}

#[tokio::test]
async fn huge_horizon_includes_far_future_bills_without_overflow() {
    let source = StaticBillSource::new(
        vec![
            Bill::new("Lease", Some(today() + Duration::days(4000))),
            Bill::new("Parking", Some(today() - Duration::days(1))),
        ],
        today(),
    );

    let due = source.due_soon(u32::MAX).await.expect("bills");

    assert_eq!(due.len(), 1);
    assert_eq!(due[0].name, "Lease");
}

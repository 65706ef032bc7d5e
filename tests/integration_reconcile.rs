use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use deadline_sync::content::annotations::MANUAL_NOTES_LABEL;
use deadline_sync::{
    CalendarBackend, CalendarEvent, Cell, InMemoryCalendar, MemorySheet, Reconciler, RichText,
    SyncConfig, TextRun,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 20)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn aws_cert_row() -> Vec<Cell> {
    vec![
        Cell::text("AWS Cert"),
        Cell::text("Certificate"),
        Cell::text("2024-03-01"),
        Cell::text("alice"),
        Cell::text(""),
        Cell::text("no"),
        Cell::text("yes"),
        Cell::text(""),
        Cell::text("high"),
        Cell::text(""),
    ]
}

fn lease_row() -> Vec<Cell> {
    vec![
        Cell::text("Office Lease"),
        Cell::text("Contract"),
        Cell::text("06/30/2024"),
        Cell::text("bob"),
        Cell::Empty,
        Cell::text("Yes"),
        Cell::text("no"),
        Cell::Rich(RichText::from_runs(vec![
            TextRun::plain("Call "),
            TextRun::linked("landlord", "https://example.com/landlord"),
        ])),
        Cell::text("medium"),
        Cell::text("https://example.com/lease.pdf"),
    ]
}

async fn calendar_id(calendar: &InMemoryCalendar) -> String {
    calendar.calendars_by_name("SRE Deadlines").await.unwrap().remove(0)
}

#[tokio::test]
async fn test_auto_renewing_certificate_end_to_end() {
    let sheet = MemorySheet::new(vec![aws_cert_row()]);
    let calendar = InMemoryCalendar::new();
    let config = SyncConfig::default();

    let report = Reconciler::new(&config, &sheet, &calendar).sync(now()).await.unwrap();

    assert_eq!(report.events_created, 1);
    assert_eq!(sheet.statuses(), vec!["Monitoring"]);

    let events = calendar.events();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.title, "Certificate: AWS Cert EXPIRES (Auto-Renewing)");
    assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(event.reminders, vec![7 * 1440, 1440]);

    let description = event.description_text();
    assert!(description.starts_with("Item: AWS Cert"));
    assert!(description.contains("Status: Monitoring"));
    assert!(description.contains("Expiry/Due Date: Fri Mar 01 2024"));
    assert!(!description.contains("MANUAL ACTION REQUIRED"));
}

#[tokio::test]
async fn test_second_run_on_unchanged_input_is_a_no_op() {
    let sheet = MemorySheet::new(vec![aws_cert_row(), lease_row()]);
    let calendar = InMemoryCalendar::new();
    let config = SyncConfig::default();
    let reconciler = Reconciler::new(&config, &sheet, &calendar);

    reconciler.sync(now()).await.unwrap();
    calendar.reset_counts();

    let report = reconciler.sync(now()).await.unwrap();

    assert_eq!(report.events_unchanged, 2);
    assert!(!report.changed_calendar());
    let counts = calendar.counts();
    assert_eq!(counts.created, 0);
    assert_eq!(counts.updated, 0);
    assert_eq!(counts.deleted, 0);
    assert_eq!(counts.reminders_added, 0);
}

#[tokio::test]
async fn test_manual_notes_survive_status_change() {
    let sheet = MemorySheet::new(vec![lease_row()]);
    let calendar = InMemoryCalendar::new();
    let config = SyncConfig::default();
    let reconciler = Reconciler::new(&config, &sheet, &calendar);
    reconciler.sync(now()).await.unwrap();

    let event = calendar.events().remove(0);
    let annotated = format!("{}\n\nRemember to call John", event.description_text());
    calendar.set_description(&event.id, &annotated).await.unwrap();

    // Three months later the lease is inside its action window.
    let later = now() + Duration::days(120);
    let report = reconciler.sync(later).await.unwrap();
    assert_eq!(report.events_updated, 1);

    let updated = calendar.events().remove(0);
    let text = updated.description_text();
    assert!(text.contains("Status: Action Required"));
    assert!(text.ends_with(&format!("{}\nRemember to call John", MANUAL_NOTES_LABEL)));
    assert_eq!(text.matches(MANUAL_NOTES_LABEL).count(), 1);

    // Running again keeps the description stable.
    calendar.reset_counts();
    reconciler.sync(later).await.unwrap();
    assert_eq!(calendar.counts().updated, 0);
}

#[tokio::test]
async fn test_links_and_warning_in_description() {
    let sheet = MemorySheet::new(vec![lease_row()]);
    let calendar = InMemoryCalendar::new();
    let config = SyncConfig::default();
    Reconciler::new(&config, &sheet, &calendar).sync(now()).await.unwrap();

    let event = calendar.events().remove(0);
    assert_eq!(event.title, "Contract: Office Lease EXPIRES (MANUAL ACTION REQUIRED)");
    assert_eq!(event.reminders, vec![30 * 1440, 14 * 1440, 3 * 1440]);

    let text = event.description_text();
    assert!(text.starts_with("🔗 LINKS & RESOURCES:\nhttps://example.com/lease.pdf"));
    assert!(text.contains("Renewal/Action Notes: Call landlord: https://example.com/landlord"));
    assert!(text.ends_with("⚠️  MANUAL ACTION REQUIRED - This will not auto-renew!"));
}

#[tokio::test]
async fn test_removed_row_event_is_deleted_as_orphan() {
    let sheet = MemorySheet::new(vec![aws_cert_row(), lease_row()]);
    let calendar = InMemoryCalendar::new();
    let config = SyncConfig::default();
    let reconciler = Reconciler::new(&config, &sheet, &calendar);
    reconciler.sync(now()).await.unwrap();

    sheet.remove_row(1);
    let report = reconciler.sync(now()).await.unwrap();

    assert_eq!(report.orphans_deleted, 1);
    let titles: Vec<_> = calendar.events().into_iter().map(|e| e.title).collect();
    assert_eq!(titles, vec!["Certificate: AWS Cert EXPIRES (Auto-Renewing)"]);
}

#[tokio::test]
async fn test_flag_change_keeps_identity_of_event() {
    let sheet = MemorySheet::new(vec![aws_cert_row()]);
    let calendar = InMemoryCalendar::new();
    let config = SyncConfig::default();
    let reconciler = Reconciler::new(&config, &sheet, &calendar);
    reconciler.sync(now()).await.unwrap();
    let original_id = calendar.events()[0].id.clone();

    // The title tag changes, but normalized identity does not.
    let mut row = aws_cert_row();
    row[6] = Cell::text("no");
    sheet.set_row(0, row);
    let report = reconciler.sync(now()).await.unwrap();

    assert_eq!(report.events_created, 0);
    assert_eq!(report.orphans_deleted, 0);
    let events = calendar.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, original_id);
    assert!(events[0].description_text().contains("Auto Renews: no"));
}

#[tokio::test]
async fn test_duplicates_collapse_to_most_recent_before_matching() {
    let sheet = MemorySheet::new(vec![aws_cert_row()]);
    let calendar = InMemoryCalendar::new();
    let config = SyncConfig::default();
    let cal_id = Reconciler::new(&config, &sheet, &calendar).calendar_id().await.unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    for (id, secs) in [("t1", 1_000), ("t2", 2_000), ("t3", 3_000)] {
        calendar.insert_event(CalendarEvent {
            id: id.to_string(),
            calendar_id: cal_id.clone(),
            title: "Certificate: AWS Cert EXPIRES (Auto-Renewing)".to_string(),
            date,
            description: None,
            reminders: Vec::new(),
            created_at: Some(Utc.timestamp_opt(secs, 0).unwrap()),
        });
    }

    let report = Reconciler::new(&config, &sheet, &calendar).sync(now()).await.unwrap();

    assert_eq!(report.duplicates_removed, 2);
    assert_eq!(report.events_created, 0);
    assert_eq!(report.events_updated, 1);
    let events = calendar.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "t3");
    assert_eq!(calendar_id(&calendar).await, cal_id);
}

#[tokio::test]
async fn test_failed_row_does_not_stop_the_pass() {
    let sheet = MemorySheet::new(vec![aws_cert_row(), lease_row()]);
    let calendar = InMemoryCalendar::new();
    calendar.fail_on_title("AWS Cert");
    let config = SyncConfig::default();

    let report = Reconciler::new(&config, &sheet, &calendar).sync(now()).await.unwrap();

    assert_eq!(report.failures, 1);
    assert_eq!(report.events_created, 1);
    assert!(calendar
        .event_by_title("Contract: Office Lease EXPIRES (MANUAL ACTION REQUIRED)")
        .is_some());
}

//! Integration tests for the text → task → ranking → slot pipeline.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use taskpilot_core::error::Result;
use taskpilot_core::{
    Engine, ExtractorConfig, SchedulerConfig, Task, TaskExtractor, UserPreferences,
};

fn now() -> DateTime<Utc> {
    // Wednesday
    Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap()
}

fn promote(extractor: &TaskExtractor, text: &str, id: &str) -> Result<Task> {
    let draft = extractor.parse_task_at(text, now())?;
    let task = Task::from_draft(draft, "user-1", now()).with_id(id);
    task.validate()?;
    Ok(task)
}

#[tokio::test]
async fn test_extract_promote_and_rank() {
    let extractor = TaskExtractor::with_defaults(ExtractorConfig::default()).unwrap();

    let rent = promote(&extractor, "Pay rent on 2026-10-20", "rent").unwrap();
    let taxes = promote(&extractor, "Submit taxes next week, urgent", "taxes").unwrap();
    let trip = promote(&extractor, "Plan vacation", "trip").unwrap();

    assert_eq!(
        rent.due_date.date_naive(),
        NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
    );
    assert_eq!(taxes.due_date, now() + Duration::weeks(1));
    assert_eq!(taxes.priority, 1);
    assert_eq!(trip.due_date, now() + Duration::days(1));
    assert_eq!(trip.title, "Plan vacation");

    let ranked = Engine::new()
        .prioritize(vec![trip, rent, taxes], &UserPreferences::new())
        .await;

    let ids: Vec<_> = ranked.iter().filter_map(|t| t.id.as_deref()).collect();
    assert_eq!(ids, vec!["taxes", "rent", "trip"]);
    assert!(ranked.iter().all(|t| t.priority > 2));
}

#[tokio::test]
async fn test_suggest_slot_around_extracted_commitments() {
    let extractor = TaskExtractor::with_defaults(ExtractorConfig::default()).unwrap();

    let standup = promote(&extractor, "Standup today", "standup").unwrap();
    let review = Task::new("Design review", now() + Duration::minutes(45), "user-1")
        .with_id("review")
        .with_duration(60);
    let focus = promote(&extractor, "Write the migration plan", "focus").unwrap();

    // standup 9:00-9:30, review 9:45-10:45; the 15 minute gap is too short
    let slot = Engine::new()
        .suggest_time_slot_at(&focus, &[standup, review], now())
        .await;
    assert_eq!(slot, Some(now() + Duration::minutes(105)));
}

#[tokio::test]
async fn test_scheduler_config_controls_gap_size() {
    let config = SchedulerConfig {
        horizon_hours: 2,
        min_gap_minutes: 90,
    };
    let busy = Task::new("Lunch", now() + Duration::minutes(60), "user-1").with_duration(30);
    let task = Task::new("Quick call", now(), "user-1").with_duration(15);

    // 9:00-10:00 is only 60 minutes and 10:30-11:00 only 30
    let slot = Engine::from_config(&config)
        .suggest_time_slot_at(&task, &[busy], now())
        .await;
    assert_eq!(slot, None);
}

#[tokio::test]
async fn test_ranking_drafts_directly() {
    let extractor = TaskExtractor::with_defaults(ExtractorConfig::default()).unwrap();
    let drafts = vec![
        extractor.parse_task_at("stretch", now()).unwrap(),
        extractor.parse_task_at("renew passport tomorrow", now()).unwrap(),
    ];

    let ranked = Engine::new()
        .prioritize_at(drafts, &UserPreferences::new(), now())
        .await;
    assert_eq!(ranked[0].title, "renew passport");
    assert_eq!(ranked[1].title, "stretch");
}

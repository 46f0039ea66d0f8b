use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use focusdeck::components::calendar::models::{
    Category, EventDraft, Frequency, RecurrenceRule,
};
use focusdeck::components::calendar::CalendarHandle;
use focusdeck::components::goals::models::{Goal, GoalStatus, Priority};
use focusdeck::components::goals::resolve::FALLBACK_COLOR;
use focusdeck::components::storage::StorageActorHandle;
use focusdeck::config::{Config, DEFAULT_REMINDER_TICK_SECS};
use std::collections::HashMap;
use std::path::PathBuf;

/// Smoke test to verify that a config can be constructed
#[tokio::test]
async fn test_config_shape() {
    let mut components = HashMap::new();
    components.insert("calendar".to_string(), true);

    let config = Config {
        data_dir: PathBuf::from("/tmp/focusdeck-smoke"),
        reminder_tick_secs: DEFAULT_REMINDER_TICK_SECS,
        components,
    };

    assert_eq!(config.reminder_tick_secs, 60);
    assert!(config.is_component_enabled("calendar"));
    assert!(!config.is_component_enabled("notes"));
}

fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
}

fn weekly_draft() -> EventDraft {
    EventDraft {
        title: "Team sync".to_string(),
        description: None,
        start: at(2024, 1, 1, 9),
        end: at(2024, 1, 1, 10),
        category: Category::Meeting,
        color: None,
        goal_id: None,
        is_recurring: true,
        recurrence: Some(RecurrenceRule {
            frequency: Frequency::Weekly,
            interval: 1,
            end_date: Some(Local.with_ymd_and_hms(2024, 1, 22, 23, 59, 59).unwrap()),
        }),
        reminder: None,
    }
}

/// The weekly series expands to Jan 1, 8, 15 and 22, each 09:00-10:00
#[tokio::test]
async fn test_weekly_series_through_the_query_path() {
    let calendar = CalendarHandle::new(StorageActorHandle::empty());
    calendar.create_event(weekly_draft()).await.unwrap();

    let occurrences = calendar
        .events_in_range(at(2024, 1, 1, 0), at(2024, 2, 1, 0), None, &[])
        .await
        .unwrap();

    assert_eq!(occurrences.len(), 4);
    let days: Vec<u32> = occurrences.iter().map(|o| o.start.day()).collect();
    assert_eq!(days, vec![1, 8, 15, 22]);
    for occurrence in &occurrences {
        assert_eq!(occurrence.start.hour(), 9);
        assert_eq!(occurrence.end.hour(), 10);
    }
}

/// Deleting the series removes every occurrence from later queries
#[tokio::test]
async fn test_series_delete_removes_occurrences() {
    let calendar = CalendarHandle::new(StorageActorHandle::empty());
    let event = calendar.create_event(weekly_draft()).await.unwrap();

    let before = calendar
        .events_in_range(at(2024, 1, 1, 0), at(2024, 2, 1, 0), None, &[])
        .await
        .unwrap();
    assert_eq!(before.len(), 4);

    assert!(calendar.delete_event(&event.id).await.unwrap());

    let after = calendar
        .events_in_range(at(2024, 1, 1, 0), at(2024, 2, 1, 0), None, &[])
        .await
        .unwrap();
    assert!(after.is_empty());
}

/// Category filtering and goal-link color resolution on the query path
#[tokio::test]
async fn test_query_filters_and_colors() {
    let calendar = CalendarHandle::new(StorageActorHandle::empty());

    let mut task = weekly_draft();
    task.title = "Write report".to_string();
    task.category = Category::Task;
    task.is_recurring = false;
    task.recurrence = None;
    task.goal_id = Some("goal-1".to_string());
    calendar.create_event(task).await.unwrap();

    let mut meeting = weekly_draft();
    meeting.is_recurring = false;
    meeting.recurrence = None;
    calendar.create_event(meeting).await.unwrap();

    let now = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let goals = vec![Goal {
        id: "goal-1".to_string(),
        title: "Ship the project".to_string(),
        description: None,
        deadline: None,
        status: GoalStatus::InProgress,
        priority: Priority::High,
        progress: 40,
        color: Some("#123456".to_string()),
        created_at: now,
        updated_at: now,
    }];

    let tasks = calendar
        .events_in_range(
            at(2024, 1, 1, 0),
            at(2024, 1, 2, 0),
            Some(Category::Task),
            &goals,
        )
        .await
        .unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].category, Category::Task);
    assert_eq!(tasks[0].display_color.as_deref(), Some("#123456"));

    // The meeting has no explicit color and no goal link
    let everything = calendar
        .events_in_range(at(2024, 1, 1, 0), at(2024, 1, 2, 0), None, &goals)
        .await
        .unwrap();
    assert_eq!(everything.len(), 2);
    let meeting_occurrence = everything
        .iter()
        .find(|o| o.category == Category::Meeting)
        .unwrap();
    assert_eq!(meeting_occurrence.display_color.as_deref(), Some(FALLBACK_COLOR));
}

/// Monthly series anchored on Jan 31 clamps to short months
#[tokio::test]
async fn test_monthly_clamp_through_the_query_path() {
    let calendar = CalendarHandle::new(StorageActorHandle::empty());

    let mut monthly = weekly_draft();
    monthly.title = "Pay rent".to_string();
    monthly.start = at(2024, 1, 31, 10);
    monthly.end = at(2024, 1, 31, 11);
    monthly.recurrence = Some(RecurrenceRule {
        frequency: Frequency::Monthly,
        interval: 1,
        end_date: Some(at(2024, 4, 30, 23)),
    });
    calendar.create_event(monthly).await.unwrap();

    let occurrences = calendar
        .events_in_range(at(2024, 1, 1, 0), at(2024, 5, 1, 0), None, &[])
        .await
        .unwrap();

    let dates: Vec<(u32, u32)> = occurrences
        .iter()
        .map(|o| (o.start.month(), o.start.day()))
        .collect();
    assert_eq!(dates, vec![(1, 31), (2, 29), (3, 31), (4, 30)]);
}

use chrono::{Duration, Local};
use focusdeck::components::calendar::models::{Category, EventDraft};
use focusdeck::components::calendar::CalendarHandle;
use focusdeck::components::storage::{keys, StorageActor, StorageActorHandle};
use serde_json::json;
use std::path::PathBuf;

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("focusdeck-test-{}", uuid::Uuid::new_v4()))
}

fn spawn_storage(dir: PathBuf) -> StorageActorHandle {
    let (mut actor, handle) = StorageActor::new(dir);
    tokio::spawn(async move {
        actor.run().await;
    });
    handle
}

fn draft(title: &str) -> EventDraft {
    let start = Local::now() + Duration::days(1);
    EventDraft {
        title: title.to_string(),
        description: None,
        start,
        end: start + Duration::hours(2),
        category: Category::Task,
        color: None,
        goal_id: None,
        is_recurring: false,
        recurrence: None,
        reminder: None,
    }
}

#[tokio::test]
async fn events_survive_a_store_restart() {
    let dir = temp_dir();

    {
        let storage = spawn_storage(dir.clone());
        let calendar = CalendarHandle::new(storage.clone());
        calendar.create_event(draft("Persisted event")).await.unwrap();
        calendar.shutdown().await.unwrap();
        storage.shutdown().await.unwrap();
    }

    // A fresh actor pair over the same directory sees the record
    let storage = spawn_storage(dir.clone());
    let calendar = CalendarHandle::new(storage);
    let events = calendar.list_events().await.unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Persisted event");

    let _ = tokio::fs::remove_dir_all(dir).await;
}

#[tokio::test]
async fn corrupt_records_are_dropped_on_load() {
    let dir = temp_dir();

    // Seed the store with one valid record and two broken ones
    let storage = spawn_storage(dir.clone());
    {
        let calendar = CalendarHandle::new(storage.clone());
        calendar.create_event(draft("Good record")).await.unwrap();
        calendar.shutdown().await.unwrap();
    }

    let mut records = match storage.get(keys::CALENDAR_EVENTS).await.unwrap().unwrap() {
        serde_json::Value::Array(records) => records,
        other => panic!("expected array, got {}", other),
    };

    // An inverted time range fails validation; a bare object fails decoding
    let mut inverted = records[0].clone();
    inverted["id"] = json!("inverted");
    let swap = inverted["start"].clone();
    inverted["start"] = inverted["end"].clone();
    inverted["end"] = swap;
    records.push(inverted);
    records.push(json!({"id": "not-an-event"}));

    storage
        .set(keys::CALENDAR_EVENTS, serde_json::Value::Array(records))
        .await
        .unwrap();

    // Reload: only the valid record survives
    let calendar = CalendarHandle::new(storage);
    let events = calendar.list_events().await.unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Good record");

    let _ = tokio::fs::remove_dir_all(dir).await;
}

#[tokio::test]
async fn unparseable_store_file_starts_empty() {
    let dir = temp_dir();
    tokio::fs::create_dir_all(&dir).await.unwrap();
    tokio::fs::write(dir.join("calendar_events.json"), "][ definitely not json")
        .await
        .unwrap();

    let storage = spawn_storage(dir.clone());
    let calendar = CalendarHandle::new(storage);

    // The corrupt file is ignored and the store keeps working
    let events = calendar.list_events().await.unwrap();
    assert!(events.is_empty());

    let created = calendar.create_event(draft("After corruption")).await.unwrap();
    assert_eq!(
        calendar.get_event(&created.id).await.unwrap().unwrap().title,
        "After corruption"
    );

    let _ = tokio::fs::remove_dir_all(dir).await;
}

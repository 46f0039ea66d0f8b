use super::actor::EventStoreActorHandle;
use super::models::{Event, Occurrence};
use super::notifications::{format_reminder, Notifier};
use super::recurrence::{expand, DEFAULT_HORIZON_DAYS};
use crate::components::storage::{keys, StorageActorHandle};
use crate::config::Config;
use crate::utils::scheduler::{spawn_ticker, TickerHandle};
use chrono::{DateTime, Duration, Local};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

lazy_static! {
    static ref SCHEDULER_INSTANCES: AtomicU32 = AtomicU32::new(0);
}

/// Per-occurrence fired state owned by the reminder scheduler
///
/// Keyed by occurrence id, so several occurrences of one series can be
/// independently pending or fired. Persisted best-effort so a restart does
/// not re-fire reminders that already went out.
pub struct FiredReminders {
    map: HashMap<String, DateTime<Local>>,
}

impl FiredReminders {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Load previously fired reminders from storage
    pub async fn load(storage: &StorageActorHandle) -> Self {
        let map = match storage.get(keys::REMINDER_STATE).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Dropping unreadable reminder state: {}", e);
                    HashMap::new()
                }
            },
            Ok(None) => HashMap::new(),
            Err(e) => {
                warn!("Failed to load reminder state: {}", e);
                HashMap::new()
            }
        };

        Self { map }
    }

    /// Record that the reminder for `occurrence_id` fired at `fired_at`
    pub fn record(&mut self, occurrence_id: String, fired_at: DateTime<Local>) {
        self.map.insert(occurrence_id, fired_at);
    }

    /// Drop entries older than the recurrence horizon; true when any were dropped
    pub fn prune(&mut self, now: DateTime<Local>) -> bool {
        let cutoff = now - Duration::days(DEFAULT_HORIZON_DAYS + 1);
        let before = self.map.len();
        self.map.retain(|_, fired_at| *fired_at > cutoff);
        self.map.len() < before
    }

    /// Persist the fired map; failures are logged, never surfaced
    pub async fn persist(&self, storage: &StorageActorHandle) {
        let value = match serde_json::to_value(&self.map) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to serialize reminder state: {}", e);
                return;
            }
        };

        if let Err(e) = storage.set(keys::REMINDER_STATE, value).await {
            error!("Failed to persist reminder state: {}", e);
        }
    }
}

impl Default for FiredReminders {
    fn default() -> Self {
        Self::new()
    }
}

/// Occurrences whose reminder trigger window contains `now` and has not fired
///
/// The trigger window is `[start - minutes_before, start)`: a sweep landing
/// before the window leaves the reminder pending, one landing at or after the
/// occurrence start skips it for good (a missed window is never retried).
pub fn due_occurrences(
    events: &[Event],
    now: DateTime<Local>,
    fired: &FiredReminders,
) -> Vec<Occurrence> {
    let mut due = Vec::new();

    for event in events {
        let reminder = match &event.reminder {
            Some(reminder) if reminder.enabled => reminder,
            _ => continue,
        };

        let occurrences = match expand(event, None) {
            Ok(occurrences) => occurrences,
            Err(e) => {
                warn!("Skipping reminders for event {}: {}", event.id, e);
                continue;
            }
        };

        for occurrence in occurrences {
            if now >= occurrence.start {
                continue;
            }
            let trigger_at = occurrence.start - Duration::minutes(reminder.minutes_before);
            if now < trigger_at {
                continue;
            }
            if fired.map.contains_key(&occurrence.id) {
                continue;
            }
            due.push(occurrence);
        }
    }

    due
}

/// One sweep: deliver every due reminder exactly once and record it as fired
pub async fn sweep(
    events: &EventStoreActorHandle,
    storage: &StorageActorHandle,
    notifier: &dyn Notifier,
    fired: &Mutex<FiredReminders>,
) {
    let now = Local::now();

    let event_list = match events.list().await {
        Ok(event_list) => event_list,
        Err(e) => {
            error!("Reminder sweep failed to list events: {}", e);
            return;
        }
    };

    let mut fired = fired.lock().await;
    let due = due_occurrences(&event_list, now, &fired);

    let mut dirty = false;
    for occurrence in due {
        let (title, body) = format_reminder(&occurrence);
        if let Err(e) = notifier.deliver(&title, &body).await {
            // Delivery is fire-and-forget: a failed attempt still counts as
            // the one request, it is not retried on the next tick
            error!("Failed to deliver reminder for {}: {}", occurrence.id, e);
        }
        fired.record(occurrence.id, now);
        dirty = true;
    }

    if fired.prune(now) {
        dirty = true;
    }

    if dirty {
        fired.persist(storage).await;
    }
}

/// Start the periodic reminder sweep
pub async fn start_reminder_scheduler(
    config: Arc<RwLock<Config>>,
    events: EventStoreActorHandle,
    storage: StorageActorHandle,
    notifier: Arc<dyn Notifier>,
) -> TickerHandle {
    // Instance counter guards against double registration
    let instance_count = SCHEDULER_INSTANCES.fetch_add(1, Ordering::SeqCst) + 1;
    if instance_count > 1 {
        warn!(
            "Multiple reminder schedulers detected! Instance count: {}",
            instance_count
        );
    }

    let tick_secs = {
        let config_read = config.read().await;
        config_read.reminder_tick_secs
    };
    info!("Starting reminder scheduler (sweep every {}s)", tick_secs);

    let fired = Arc::new(Mutex::new(FiredReminders::load(&storage).await));

    spawn_ticker(
        "reminder-sweep",
        std::time::Duration::from_secs(tick_secs),
        move || {
            let events = events.clone();
            let storage = storage.clone();
            let notifier = Arc::clone(&notifier);
            let fired = Arc::clone(&fired);
            async move {
                sweep(&events, &storage, notifier.as_ref(), &fired).await;
            }
        },
    )
}

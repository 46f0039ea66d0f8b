use super::models::{Event, EventDraft, EventPatch};
use crate::components::storage::{keys, StorageActorHandle};
use crate::error::{not_found_error, storage_error, AppResult};
use chrono::Local;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// The event store actor that owns the canonical event list
///
/// All reads and mutations go through the actor mailbox, so read-modify-write
/// sequences on a record are serialized with respect to each other.
pub struct EventStoreActor {
    events: Vec<Event>,
    storage: StorageActorHandle,
    command_rx: mpsc::Receiver<EventStoreCommand>,
}

/// Commands that can be sent to the event store actor
pub enum EventStoreCommand {
    Create(Box<EventDraft>, mpsc::Sender<AppResult<Event>>),
    Update(String, Box<EventPatch>, mpsc::Sender<AppResult<Event>>),
    Delete(String, mpsc::Sender<AppResult<bool>>),
    Get(String, mpsc::Sender<AppResult<Option<Event>>>),
    List(mpsc::Sender<AppResult<Vec<Event>>>),
    Shutdown,
}

/// Handle for communicating with the event store actor
#[derive(Clone)]
pub struct EventStoreActorHandle {
    command_tx: mpsc::Sender<EventStoreCommand>,
}

impl EventStoreActorHandle {
    /// Create a new event from a draft
    pub async fn create(&self, draft: EventDraft) -> AppResult<Event> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::Create(Box::new(draft), response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Merge a partial update into an existing event
    pub async fn update(&self, id: &str, patch: EventPatch) -> AppResult<Event> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::Update(
                id.to_string(),
                Box::new(patch),
                response_tx,
            ))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Delete a whole series; false when the id is unknown
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::Delete(id.to_string(), response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Look up a single event by id
    pub async fn get(&self, id: &str) -> AppResult<Option<Event>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::Get(id.to_string(), response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// All stored event definitions
    pub async fn list(&self) -> AppResult<Vec<Event>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(EventStoreCommand::List(response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(EventStoreCommand::Shutdown).await;
        Ok(())
    }
}

impl EventStoreActor {
    /// Create a new actor and return its handle
    pub fn new(storage: StorageActorHandle) -> (Self, EventStoreActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            events: Vec::new(),
            storage,
            command_rx,
        };

        let handle = EventStoreActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Event store actor started");
        self.load().await;

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                EventStoreCommand::Create(draft, response_tx) => {
                    let result = self.create(*draft).await;
                    let _ = response_tx.send(result).await;
                }
                EventStoreCommand::Update(id, patch, response_tx) => {
                    let result = self.update(&id, *patch).await;
                    let _ = response_tx.send(result).await;
                }
                EventStoreCommand::Delete(id, response_tx) => {
                    let result = self.delete(&id).await;
                    let _ = response_tx.send(result).await;
                }
                EventStoreCommand::Get(id, response_tx) => {
                    let event = self.events.iter().find(|e| e.id == id).cloned();
                    let _ = response_tx.send(Ok(event)).await;
                }
                EventStoreCommand::List(response_tx) => {
                    let _ = response_tx.send(Ok(self.events.clone())).await;
                }
                EventStoreCommand::Shutdown => {
                    info!("Event store actor shutting down");
                    break;
                }
            }
        }

        info!("Event store actor shut down");
    }

    /// Load persisted events, dropping records that fail validation
    ///
    /// Corrupt persisted state must never take the store down: bad records
    /// are logged and skipped, the valid subset is kept.
    async fn load(&mut self) {
        let value = match self.storage.get(keys::CALENDAR_EVENTS).await {
            Ok(Some(value)) => value,
            Ok(None) => return,
            Err(e) => {
                warn!("Failed to load events from storage: {}", e);
                return;
            }
        };

        let records = match value {
            serde_json::Value::Array(records) => records,
            other => {
                warn!("Unexpected shape for persisted events, dropping: {}", other);
                return;
            }
        };

        let total = records.len();
        for record in records {
            let mut event: Event = match serde_json::from_value(record) {
                Ok(event) => event,
                Err(e) => {
                    warn!("Dropping undecodable event record: {}", e);
                    continue;
                }
            };
            event.normalize();
            if let Err(e) = event.validate() {
                warn!("Dropping invalid event record {}: {}", event.id, e);
                continue;
            }
            self.events.push(event);
        }

        info!("Loaded {} of {} persisted events", self.events.len(), total);
    }

    /// Persist the full event list; failures are logged, never surfaced
    async fn persist(&self) {
        let value = match serde_json::to_value(&self.events) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to serialize events: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set(keys::CALENDAR_EVENTS, value).await {
            error!("Failed to persist events: {}", e);
        }
    }

    async fn create(&mut self, draft: EventDraft) -> AppResult<Event> {
        let now = Local::now();
        let mut event = Event {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            start: draft.start,
            end: draft.end,
            category: draft.category,
            color: draft.color,
            goal_id: draft.goal_id,
            is_recurring: draft.is_recurring,
            recurrence: draft.recurrence,
            reminder: draft.reminder,
            created_at: now,
            updated_at: now,
        };

        event.normalize();
        event.validate()?;

        self.events.push(event.clone());
        self.persist().await;

        Ok(event)
    }

    async fn update(&mut self, id: &str, patch: EventPatch) -> AppResult<Event> {
        let position = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| not_found_error(&format!("No event with id {}", id)))?;

        // Build and validate the merged record before replacing the stored one
        let mut merged = self.events[position].clone();
        if let Some(title) = patch.title {
            merged.title = title;
        }
        if let Some(description) = patch.description {
            merged.description = Some(description);
        }
        if let Some(start) = patch.start {
            merged.start = start;
        }
        if let Some(end) = patch.end {
            merged.end = end;
        }
        if let Some(category) = patch.category {
            merged.category = category;
        }
        if let Some(color) = patch.color {
            merged.color = Some(color);
        }
        if let Some(goal_id) = patch.goal_id {
            merged.goal_id = Some(goal_id);
        }
        if let Some(is_recurring) = patch.is_recurring {
            merged.is_recurring = is_recurring;
        }
        if let Some(recurrence) = patch.recurrence {
            merged.recurrence = Some(recurrence);
        }
        if let Some(reminder) = patch.reminder {
            merged.reminder = Some(reminder);
        }
        merged.updated_at = Local::now();

        merged.normalize();
        merged.validate()?;

        self.events[position] = merged.clone();
        self.persist().await;

        Ok(merged)
    }

    async fn delete(&mut self, id: &str) -> AppResult<bool> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);

        // Double-delete is a common UI race; absence is not an error
        let removed = self.events.len() < before;
        if removed {
            self.persist().await;
        }

        Ok(removed)
    }
}

use super::actor::{EventStoreActor, EventStoreActorHandle};
use super::models::{Category, Event, EventDraft, EventPatch, Occurrence};
use super::query::query_range;
use crate::components::goals::models::Goal;
use crate::components::goals::resolve::resolve_occurrence_color;
use crate::components::storage::StorageActorHandle;
use crate::error::AppResult;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the calendar's event store
#[derive(Clone)]
pub struct CalendarHandle {
    actor_handle: EventStoreActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl CalendarHandle {
    /// Create a new CalendarHandle and spawn the event store actor
    pub fn new(storage: StorageActorHandle) -> Self {
        // Create the actor and get its handle
        let (mut actor, handle) = EventStoreActor::new(storage);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// The raw event store handle, for the reminder scheduler
    pub fn store(&self) -> EventStoreActorHandle {
        self.actor_handle.clone()
    }

    /// Create a new event
    pub async fn create_event(&self, draft: EventDraft) -> AppResult<Event> {
        self.actor_handle.create(draft).await
    }

    /// Merge a partial update into an existing event
    pub async fn update_event(&self, id: &str, patch: EventPatch) -> AppResult<Event> {
        self.actor_handle.update(id, patch).await
    }

    /// Delete a whole series; false when the id is unknown
    pub async fn delete_event(&self, id: &str) -> AppResult<bool> {
        self.actor_handle.delete(id).await
    }

    /// Look up a single event by id
    pub async fn get_event(&self, id: &str) -> AppResult<Option<Event>> {
        self.actor_handle.get(id).await
    }

    /// All stored event definitions
    pub async fn list_events(&self) -> AppResult<Vec<Event>> {
        self.actor_handle.list().await
    }

    /// Occurrences intersecting the range, with display colors resolved
    ///
    /// Expands every stored event, applies the range/category filter and
    /// fills in each occurrence's styling color through its goal link.
    pub async fn events_in_range(
        &self,
        range_start: DateTime<Local>,
        range_end: DateTime<Local>,
        category: Option<Category>,
        goals: &[Goal],
    ) -> AppResult<Vec<Occurrence>> {
        let events = self.actor_handle.list().await?;
        let mut occurrences = query_range(&events, range_start, range_end, category)?;

        for occurrence in &mut occurrences {
            occurrence.display_color = Some(resolve_occurrence_color(occurrence, goals));
        }

        Ok(occurrences)
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        self.actor_handle.shutdown().await
    }
}

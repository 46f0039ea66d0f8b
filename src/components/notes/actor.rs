use super::models::{Note, NoteDraft, NotePatch};
use crate::components::storage::{keys, StorageActorHandle};
use crate::error::{not_found_error, storage_error, AppResult};
use chrono::Local;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// The note store actor that owns the canonical note list
pub struct NoteStoreActor {
    notes: Vec<Note>,
    storage: StorageActorHandle,
    command_rx: mpsc::Receiver<NoteStoreCommand>,
}

/// Commands that can be sent to the note store actor
pub enum NoteStoreCommand {
    Create(Box<NoteDraft>, mpsc::Sender<AppResult<Note>>),
    Update(String, Box<NotePatch>, mpsc::Sender<AppResult<Note>>),
    Delete(String, mpsc::Sender<AppResult<bool>>),
    Get(String, mpsc::Sender<AppResult<Option<Note>>>),
    List(mpsc::Sender<AppResult<Vec<Note>>>),
    Shutdown,
}

/// Handle for communicating with the note store actor
#[derive(Clone)]
pub struct NoteStoreActorHandle {
    command_tx: mpsc::Sender<NoteStoreCommand>,
}

impl NoteStoreActorHandle {
    /// Create a new note from a draft
    pub async fn create(&self, draft: NoteDraft) -> AppResult<Note> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(NoteStoreCommand::Create(Box::new(draft), response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Merge a partial update into an existing note
    pub async fn update(&self, id: &str, patch: NotePatch) -> AppResult<Note> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(NoteStoreCommand::Update(
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

    /// Delete a note; false when the id is unknown
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(NoteStoreCommand::Delete(id.to_string(), response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Look up a single note by id
    pub async fn get(&self, id: &str) -> AppResult<Option<Note>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(NoteStoreCommand::Get(id.to_string(), response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// All stored notes
    pub async fn list(&self) -> AppResult<Vec<Note>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(NoteStoreCommand::List(response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(NoteStoreCommand::Shutdown).await;
        Ok(())
    }
}

impl NoteStoreActor {
    /// Create a new actor and return its handle
    pub fn new(storage: StorageActorHandle) -> (Self, NoteStoreActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            notes: Vec::new(),
            storage,
            command_rx,
        };

        let handle = NoteStoreActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Note store actor started");
        self.load().await;

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                NoteStoreCommand::Create(draft, response_tx) => {
                    let result = self.create(*draft).await;
                    let _ = response_tx.send(result).await;
                }
                NoteStoreCommand::Update(id, patch, response_tx) => {
                    let result = self.update(&id, *patch).await;
                    let _ = response_tx.send(result).await;
                }
                NoteStoreCommand::Delete(id, response_tx) => {
                    let result = self.delete(&id).await;
                    let _ = response_tx.send(result).await;
                }
                NoteStoreCommand::Get(id, response_tx) => {
                    let note = self.notes.iter().find(|n| n.id == id).cloned();
                    let _ = response_tx.send(Ok(note)).await;
                }
                NoteStoreCommand::List(response_tx) => {
                    let _ = response_tx.send(Ok(self.notes.clone())).await;
                }
                NoteStoreCommand::Shutdown => {
                    info!("Note store actor shutting down");
                    break;
                }
            }
        }

        info!("Note store actor shut down");
    }

    /// Load persisted notes, dropping records that fail validation
    async fn load(&mut self) {
        let value = match self.storage.get(keys::NOTES).await {
            Ok(Some(value)) => value,
            Ok(None) => return,
            Err(e) => {
                warn!("Failed to load notes from storage: {}", e);
                return;
            }
        };

        let records = match value {
            serde_json::Value::Array(records) => records,
            other => {
                warn!("Unexpected shape for persisted notes, dropping: {}", other);
                return;
            }
        };

        for record in records {
            let note: Note = match serde_json::from_value(record) {
                Ok(note) => note,
                Err(e) => {
                    warn!("Dropping undecodable note record: {}", e);
                    continue;
                }
            };
            if let Err(e) = note.validate() {
                warn!("Dropping invalid note record {}: {}", note.id, e);
                continue;
            }
            self.notes.push(note);
        }

        info!("Loaded {} persisted notes", self.notes.len());
    }

    /// Persist the full note list; failures are logged, never surfaced
    async fn persist(&self) {
        let value = match serde_json::to_value(&self.notes) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to serialize notes: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set(keys::NOTES, value).await {
            error!("Failed to persist notes: {}", e);
        }
    }

    async fn create(&mut self, draft: NoteDraft) -> AppResult<Note> {
        let now = Local::now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            content: draft.content,
            pinned: draft.pinned,
            created_at: now,
            updated_at: now,
        };

        note.validate()?;

        self.notes.push(note.clone());
        self.persist().await;

        Ok(note)
    }

    async fn update(&mut self, id: &str, patch: NotePatch) -> AppResult<Note> {
        let position = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| not_found_error(&format!("No note with id {}", id)))?;

        let mut merged = self.notes[position].clone();
        if let Some(title) = patch.title {
            merged.title = title;
        }
        if let Some(content) = patch.content {
            merged.content = content;
        }
        if let Some(pinned) = patch.pinned {
            merged.pinned = pinned;
        }
        merged.updated_at = Local::now();

        merged.validate()?;

        self.notes[position] = merged.clone();
        self.persist().await;

        Ok(merged)
    }

    async fn delete(&mut self, id: &str) -> AppResult<bool> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);

        let removed = self.notes.len() < before;
        if removed {
            self.persist().await;
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_store() -> NoteStoreActorHandle {
        let (mut actor, handle) = NoteStoreActor::new(StorageActorHandle::empty());
        tokio::spawn(async move { actor.run().await });
        handle
    }

    #[tokio::test]
    async fn create_update_delete_note() {
        let store = spawn_store();

        let note = store
            .create(NoteDraft {
                title: "Ideas".to_string(),
                content: "".to_string(),
                pinned: false,
            })
            .await
            .unwrap();

        let updated = store
            .update(
                &note.id,
                NotePatch {
                    pinned: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.pinned);
        assert_eq!(updated.title, "Ideas");

        assert!(store.delete(&note.id).await.unwrap());
        assert!(store.get(&note.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let store = spawn_store();
        let result = store
            .create(NoteDraft {
                title: "  ".to_string(),
                content: "body".to_string(),
                pinned: false,
            })
            .await;
        assert!(result.is_err());
    }
}

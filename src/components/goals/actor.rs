use super::models::{Goal, GoalDraft, GoalPatch};
use crate::components::storage::{keys, StorageActorHandle};
use crate::error::{not_found_error, storage_error, AppResult};
use chrono::Local;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// The goal store actor that owns the canonical goal list
pub struct GoalStoreActor {
    goals: Vec<Goal>,
    storage: StorageActorHandle,
    command_rx: mpsc::Receiver<GoalStoreCommand>,
}

/// Commands that can be sent to the goal store actor
pub enum GoalStoreCommand {
    Create(Box<GoalDraft>, mpsc::Sender<AppResult<Goal>>),
    Update(String, Box<GoalPatch>, mpsc::Sender<AppResult<Goal>>),
    Delete(String, mpsc::Sender<AppResult<bool>>),
    Get(String, mpsc::Sender<AppResult<Option<Goal>>>),
    List(mpsc::Sender<AppResult<Vec<Goal>>>),
    Shutdown,
}

/// Handle for communicating with the goal store actor
#[derive(Clone)]
pub struct GoalStoreActorHandle {
    command_tx: mpsc::Sender<GoalStoreCommand>,
}

impl GoalStoreActorHandle {
    /// Create a new goal from a draft
    pub async fn create(&self, draft: GoalDraft) -> AppResult<Goal> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoalStoreCommand::Create(Box::new(draft), response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Merge a partial update into an existing goal
    pub async fn update(&self, id: &str, patch: GoalPatch) -> AppResult<Goal> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoalStoreCommand::Update(
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

    /// Delete a goal; false when the id is unknown
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoalStoreCommand::Delete(id.to_string(), response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Look up a single goal by id
    pub async fn get(&self, id: &str) -> AppResult<Option<Goal>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoalStoreCommand::Get(id.to_string(), response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// All stored goals
    pub async fn list(&self) -> AppResult<Vec<Goal>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(GoalStoreCommand::List(response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(GoalStoreCommand::Shutdown).await;
        Ok(())
    }
}

impl GoalStoreActor {
    /// Create a new actor and return its handle
    pub fn new(storage: StorageActorHandle) -> (Self, GoalStoreActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            goals: Vec::new(),
            storage,
            command_rx,
        };

        let handle = GoalStoreActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Goal store actor started");
        self.load().await;

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                GoalStoreCommand::Create(draft, response_tx) => {
                    let result = self.create(*draft).await;
                    let _ = response_tx.send(result).await;
                }
                GoalStoreCommand::Update(id, patch, response_tx) => {
                    let result = self.update(&id, *patch).await;
                    let _ = response_tx.send(result).await;
                }
                GoalStoreCommand::Delete(id, response_tx) => {
                    let result = self.delete(&id).await;
                    let _ = response_tx.send(result).await;
                }
                GoalStoreCommand::Get(id, response_tx) => {
                    let goal = self.goals.iter().find(|g| g.id == id).cloned();
                    let _ = response_tx.send(Ok(goal)).await;
                }
                GoalStoreCommand::List(response_tx) => {
                    let _ = response_tx.send(Ok(self.goals.clone())).await;
                }
                GoalStoreCommand::Shutdown => {
                    info!("Goal store actor shutting down");
                    break;
                }
            }
        }

        info!("Goal store actor shut down");
    }

    /// Load persisted goals, dropping records that fail validation
    async fn load(&mut self) {
        let value = match self.storage.get(keys::GOALS).await {
            Ok(Some(value)) => value,
            Ok(None) => return,
            Err(e) => {
                warn!("Failed to load goals from storage: {}", e);
                return;
            }
        };

        let records = match value {
            serde_json::Value::Array(records) => records,
            other => {
                warn!("Unexpected shape for persisted goals, dropping: {}", other);
                return;
            }
        };

        for record in records {
            let mut goal: Goal = match serde_json::from_value(record) {
                Ok(goal) => goal,
                Err(e) => {
                    warn!("Dropping undecodable goal record: {}", e);
                    continue;
                }
            };
            goal.normalize();
            if let Err(e) = goal.validate() {
                warn!("Dropping invalid goal record {}: {}", goal.id, e);
                continue;
            }
            self.goals.push(goal);
        }

        info!("Loaded {} persisted goals", self.goals.len());
    }

    /// Persist the full goal list; failures are logged, never surfaced
    async fn persist(&self) {
        let value = match serde_json::to_value(&self.goals) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to serialize goals: {}", e);
                return;
            }
        };

        if let Err(e) = self.storage.set(keys::GOALS, value).await {
            error!("Failed to persist goals: {}", e);
        }
    }

    async fn create(&mut self, draft: GoalDraft) -> AppResult<Goal> {
        let now = Local::now();
        let mut goal = Goal {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            deadline: draft.deadline,
            status: draft.status,
            priority: draft.priority,
            progress: draft.progress,
            color: draft.color,
            created_at: now,
            updated_at: now,
        };

        goal.normalize();
        goal.validate()?;

        self.goals.push(goal.clone());
        self.persist().await;

        Ok(goal)
    }

    async fn update(&mut self, id: &str, patch: GoalPatch) -> AppResult<Goal> {
        let position = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| not_found_error(&format!("No goal with id {}", id)))?;

        let mut merged = self.goals[position].clone();
        if let Some(title) = patch.title {
            merged.title = title;
        }
        if let Some(description) = patch.description {
            merged.description = Some(description);
        }
        if let Some(deadline) = patch.deadline {
            merged.deadline = Some(deadline);
        }
        if let Some(status) = patch.status {
            merged.status = status;
        }
        if let Some(priority) = patch.priority {
            merged.priority = priority;
        }
        if let Some(progress) = patch.progress {
            merged.progress = progress;
        }
        if let Some(color) = patch.color {
            merged.color = Some(color);
        }
        merged.updated_at = Local::now();

        merged.normalize();
        merged.validate()?;

        self.goals[position] = merged.clone();
        self.persist().await;

        Ok(merged)
    }

    async fn delete(&mut self, id: &str) -> AppResult<bool> {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);

        let removed = self.goals.len() < before;
        if removed {
            self.persist().await;
        }

        Ok(removed)
    }
}

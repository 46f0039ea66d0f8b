use crate::error::{storage_error, AppResult};
use serde_json::Value;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{info, warn};

// Store key constants
pub mod keys {
    pub const CALENDAR_EVENTS: &str = "calendar_events";
    pub const GOALS: &str = "goals";
    pub const NOTES: &str = "notes";
    pub const POMODORO_SETTINGS: &str = "pomodoro_settings";
    pub const REMINDER_STATE: &str = "reminder_state";
}

/// The storage actor that owns the JSON store files
///
/// One file per key under the data directory. All readers and writers go
/// through the actor mailbox, so file access is serialized.
pub struct StorageActor {
    data_dir: PathBuf,
    command_rx: mpsc::Receiver<StorageCommand>,
}

/// Commands that can be sent to the storage actor
pub enum StorageCommand {
    Get(String, mpsc::Sender<AppResult<Option<Value>>>),
    Set(String, Value, mpsc::Sender<AppResult<()>>),
    Shutdown,
}

/// Handle for communicating with the storage actor
#[derive(Clone)]
pub struct StorageActorHandle {
    command_tx: mpsc::Sender<StorageCommand>,
}

impl StorageActorHandle {
    /// Create a new empty handle for initialization purposes
    pub fn empty() -> Self {
        let (command_tx, _) = mpsc::channel(32);
        Self { command_tx }
    }

    /// Read the value stored under `key`, `None` if absent or unreadable
    pub async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(StorageCommand::Get(key.to_string(), response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Write `value` under `key`
    pub async fn set(&self, key: &str, value: Value) -> AppResult<()> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(StorageCommand::Set(key.to_string(), value, response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(StorageCommand::Shutdown).await;
        Ok(())
    }
}

impl StorageActor {
    /// Create a new actor and return its handle
    pub fn new(data_dir: PathBuf) -> (Self, StorageActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            data_dir,
            command_rx,
        };

        let handle = StorageActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Storage actor started (data dir: {})", self.data_dir.display());

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                StorageCommand::Get(key, response_tx) => {
                    let result = self.read_key(&key).await;
                    let _ = response_tx.send(result).await;
                }
                StorageCommand::Set(key, value, response_tx) => {
                    let result = self.write_key(&key, value).await;
                    let _ = response_tx.send(result).await;
                }
                StorageCommand::Shutdown => {
                    info!("Storage actor shutting down");
                    break;
                }
            }
        }

        info!("Storage actor shut down");
    }

    fn path_for_key(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    /// Read and parse the file backing `key`
    ///
    /// A missing file is `None`; an unreadable or unparseable file is logged
    /// and reported as `None` so the caller continues with empty state.
    async fn read_key(&self, key: &str) -> AppResult<Option<Value>> {
        let path = self.path_for_key(key);

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return Ok(None);
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Dropping unparseable store file {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    /// Serialize and write the file backing `key`
    async fn write_key(&self, key: &str, value: Value) -> AppResult<()> {
        if let Err(e) = tokio::fs::create_dir_all(&self.data_dir).await {
            return Err(storage_error(&format!(
                "Failed to create data dir {}: {}",
                self.data_dir.display(),
                e
            )));
        }

        let path = self.path_for_key(key);
        let raw = serde_json::to_string_pretty(&value)
            .map_err(|e| storage_error(&format!("Failed to serialize {}: {}", key, e)))?;

        tokio::fs::write(&path, raw)
            .await
            .map_err(|e| storage_error(&format!("Failed to write {}: {}", path.display(), e)))?;

        Ok(())
    }
}

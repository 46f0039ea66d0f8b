use super::models::PomodoroSettings;
use crate::components::storage::{keys, StorageActorHandle};
use crate::error::{storage_error, AppResult};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// The pomodoro settings actor
///
/// Holds the single persisted settings record; invalid persisted state falls
/// back to the defaults.
pub struct PomodoroSettingsActor {
    settings: PomodoroSettings,
    storage: StorageActorHandle,
    command_rx: mpsc::Receiver<PomodoroCommand>,
}

/// Commands that can be sent to the pomodoro settings actor
pub enum PomodoroCommand {
    Get(mpsc::Sender<AppResult<PomodoroSettings>>),
    Update(PomodoroSettings, mpsc::Sender<AppResult<PomodoroSettings>>),
    Shutdown,
}

/// Handle for communicating with the pomodoro settings actor
#[derive(Clone)]
pub struct PomodoroSettingsActorHandle {
    command_tx: mpsc::Sender<PomodoroCommand>,
}

impl PomodoroSettingsActorHandle {
    /// Current settings
    pub async fn get(&self) -> AppResult<PomodoroSettings> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(PomodoroCommand::Get(response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Replace the settings after validation
    pub async fn update(&self, settings: PomodoroSettings) -> AppResult<PomodoroSettings> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(PomodoroCommand::Update(settings, response_tx))
            .await
            .map_err(|e| storage_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(PomodoroCommand::Shutdown).await;
        Ok(())
    }
}

impl PomodoroSettingsActor {
    /// Create a new actor and return its handle
    pub fn new(storage: StorageActorHandle) -> (Self, PomodoroSettingsActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            settings: PomodoroSettings::default(),
            storage,
            command_rx,
        };

        let handle = PomodoroSettingsActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Pomodoro settings actor started");
        self.load().await;

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                PomodoroCommand::Get(response_tx) => {
                    let _ = response_tx.send(Ok(self.settings.clone())).await;
                }
                PomodoroCommand::Update(settings, response_tx) => {
                    let result = self.update(settings).await;
                    let _ = response_tx.send(result).await;
                }
                PomodoroCommand::Shutdown => {
                    info!("Pomodoro settings actor shutting down");
                    break;
                }
            }
        }

        info!("Pomodoro settings actor shut down");
    }

    /// Load persisted settings, falling back to the defaults
    async fn load(&mut self) {
        let value = match self.storage.get(keys::POMODORO_SETTINGS).await {
            Ok(Some(value)) => value,
            Ok(None) => return,
            Err(e) => {
                warn!("Failed to load pomodoro settings: {}", e);
                return;
            }
        };

        match serde_json::from_value::<PomodoroSettings>(value) {
            Ok(settings) if settings.validate().is_ok() => self.settings = settings,
            Ok(_) => warn!("Dropping out-of-range pomodoro settings, using defaults"),
            Err(e) => warn!("Dropping unreadable pomodoro settings: {}", e),
        }
    }

    async fn update(&mut self, settings: PomodoroSettings) -> AppResult<PomodoroSettings> {
        settings.validate()?;
        self.settings = settings;

        match serde_json::to_value(&self.settings) {
            Ok(value) => {
                if let Err(e) = self.storage.set(keys::POMODORO_SETTINGS, value).await {
                    error!("Failed to persist pomodoro settings: {}", e);
                }
            }
            Err(e) => error!("Failed to serialize pomodoro settings: {}", e),
        }

        Ok(self.settings.clone())
    }
}

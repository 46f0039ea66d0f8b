mod actor;
pub mod models;
pub mod timer;

pub use actor::{PomodoroSettingsActor, PomodoroSettingsActorHandle};
pub use models::{Phase, PomodoroSettings};
pub use timer::{format_phase_change, PhaseChange, PomodoroTimer};

use crate::components::storage::StorageActorHandle;
use crate::config::Config;
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Pomodoro component: persisted timer settings and the cycle state machine
#[derive(Default)]
pub struct Pomodoro {
    handle: RwLock<Option<PomodoroSettingsActorHandle>>,
}

impl Pomodoro {
    /// Create a new Pomodoro component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<PomodoroSettingsActorHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for Pomodoro {
    fn name(&self) -> &'static str {
        "pomodoro"
    }

    async fn init(
        &self,
        _config: Arc<RwLock<Config>>,
        storage: StorageActorHandle,
    ) -> AppResult<()> {
        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            let (mut actor, handle) = PomodoroSettingsActor::new(storage);
            tokio::spawn(async move {
                actor.run().await;
            });
            *handle_lock = Some(handle);
        }

        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

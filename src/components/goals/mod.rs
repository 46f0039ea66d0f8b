mod actor;
pub mod models;
pub mod resolve;

pub use actor::{GoalStoreActor, GoalStoreActorHandle};
pub use models::{Goal, GoalDraft, GoalPatch, GoalStatus, Priority};

use crate::components::storage::StorageActorHandle;
use crate::config::Config;
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Goals component for tracking personal goals
#[derive(Default)]
pub struct Goals {
    handle: RwLock<Option<GoalStoreActorHandle>>,
}

impl Goals {
    /// Create a new Goals component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<GoalStoreActorHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for Goals {
    fn name(&self) -> &'static str {
        "goals"
    }

    async fn init(
        &self,
        _config: Arc<RwLock<Config>>,
        storage: StorageActorHandle,
    ) -> AppResult<()> {
        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            let (mut actor, handle) = GoalStoreActor::new(storage);
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

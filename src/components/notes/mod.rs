mod actor;
pub mod models;

pub use actor::{NoteStoreActor, NoteStoreActorHandle};
pub use models::{Note, NoteDraft, NotePatch};

use crate::components::storage::StorageActorHandle;
use crate::config::Config;
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Notes component for free-form notes
#[derive(Default)]
pub struct Notes {
    handle: RwLock<Option<NoteStoreActorHandle>>,
}

impl Notes {
    /// Create a new Notes component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<NoteStoreActorHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for Notes {
    fn name(&self) -> &'static str {
        "notes"
    }

    async fn init(
        &self,
        _config: Arc<RwLock<Config>>,
        storage: StorageActorHandle,
    ) -> AppResult<()> {
        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            let (mut actor, handle) = NoteStoreActor::new(storage);
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

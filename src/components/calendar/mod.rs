mod actor;
mod handle;
pub mod models;
pub mod notifications;
pub mod query;
pub mod recurrence;
pub mod scheduler;

pub use actor::EventStoreActorHandle;
pub use handle::CalendarHandle;
pub use models::{
    Category, Event, EventDraft, EventPatch, Frequency, Occurrence, RecurrenceRule,
    ReminderSetting,
};
pub use notifications::{LogNotifier, Notifier};

use crate::components::storage::StorageActorHandle;
use crate::config::Config;
use crate::error::AppResult;
use crate::utils::scheduler::TickerHandle;
use async_trait::async_trait;
use scheduler::start_reminder_scheduler;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Calendar component: event store, recurrence expansion and reminders
pub struct Calendar {
    notifier: Arc<dyn Notifier>,
    handle: RwLock<Option<CalendarHandle>>,
    ticker: RwLock<Option<TickerHandle>>,
}

impl Calendar {
    /// Create a new Calendar component delivering reminders through `notifier`
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            handle: RwLock::new(None),
            ticker: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<CalendarHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for Calendar {
    fn name(&self) -> &'static str {
        "calendar"
    }

    async fn init(
        &self,
        config: Arc<RwLock<Config>>,
        storage: StorageActorHandle,
    ) -> AppResult<()> {
        // Create a new handle if one doesn't exist
        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            *handle_lock = Some(CalendarHandle::new(storage.clone()));
        }
        let handle = handle_lock.as_ref().map(|h| h.clone());
        drop(handle_lock);

        // Start the reminder sweep unless one is already running
        if let Some(handle) = handle {
            let mut ticker_lock = self.ticker.write().await;
            if ticker_lock.is_none() {
                let ticker = start_reminder_scheduler(
                    config,
                    handle.store(),
                    storage,
                    Arc::clone(&self.notifier),
                )
                .await;
                *ticker_lock = Some(ticker);
            }
        }

        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        // Tear the sweep down before the store goes away
        if let Some(ticker) = self.ticker.write().await.take() {
            ticker.stop().await;
        }

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

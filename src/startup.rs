use crate::components::calendar::{Calendar, LogNotifier};
use crate::components::goals::Goals;
use crate::components::notes::Notes;
use crate::components::pomodoro::Pomodoro;
use crate::components::storage::StorageActor;
use crate::components::ComponentManager;
use crate::config::Config;
use crate::error::Error;
use crate::shutdown;
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Initialize storage and components, then run until a shutdown signal
pub async fn start_app(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    // Initialize the storage actor backing every store
    let data_dir = {
        let config_read = config.read().await;
        config_read.data_dir.clone()
    };
    let (mut storage_actor, storage_handle) = StorageActor::new(data_dir);

    // Spawn storage actor task
    tokio::spawn(async move {
        storage_actor.run().await;
    });

    // Initialize component manager
    let mut component_manager = ComponentManager::new(Arc::clone(&config));

    // Register the dashboard components
    component_manager.register(Calendar::new(Arc::new(LogNotifier)));
    component_manager.register(Goals::new());
    component_manager.register(Notes::new());
    component_manager.register(Pomodoro::new());

    // Create a shared component manager
    let component_manager = Arc::new(component_manager);

    if let Err(e) = component_manager.init_all(storage_handle.clone()).await {
        error!("Failed to initialize components: {:?}", e);
    }

    // Create shutdown channel
    let (shutdown_send, shutdown_recv) = oneshot::channel();

    // Clone handles for the shutdown handler
    let shutdown_storage = storage_handle.clone();
    let shutdown_components = Arc::clone(&component_manager);

    // Spawn signal handler task
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_components, shutdown_storage).await;
    });

    info!("focusdeck is running");

    // Wait for the shutdown signal
    let _ = shutdown_recv.await;
    info!("Shutdown complete");

    Ok(())
}

mod components;
mod config;
mod error;
mod shutdown;
mod startup;
mod utils;

use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting focusdeck");

    // Load configuration
    let config = startup::load_config().await?;

    // Run the dashboard engine
    startup::start_app(config).await
}

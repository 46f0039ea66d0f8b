use crate::error::AppResult;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use toml;

/// Default reminder sweep interval in seconds
pub const DEFAULT_REMINDER_TICK_SECS: u64 = 60;

/// Main configuration structure for the dashboard engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the JSON store files
    pub data_dir: PathBuf,
    /// Seconds between reminder sweeps
    pub reminder_tick_secs: u64,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let data_dir = match env::var("FOCUSDECK_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => default_data_dir(),
        };

        let reminder_tick_secs = env::var("FOCUSDECK_REMINDER_TICK_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REMINDER_TICK_SECS);

        // Initialize default components
        let mut components = HashMap::new();
        components.insert("calendar".to_string(), true);
        components.insert("goals".to_string(), true);
        components.insert("notes".to_string(), true);
        components.insert("pomodoro".to_string(), true);

        // Load components configuration from file if it exists
        if let Ok(content) = fs::read_to_string("config/components.toml") {
            if let Ok(file_components) = toml::from_str::<HashMap<String, bool>>(&content) {
                // Merge with defaults
                for (key, value) in file_components {
                    components.insert(key, value);
                }
            }
        }

        Ok(Config {
            data_dir,
            reminder_tick_secs,
            components,
        })
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }

    /// Update component enabled status
    #[allow(dead_code)]
    pub fn set_component_enabled(&mut self, name: &str, enabled: bool) -> AppResult<()> {
        self.components.insert(name.to_string(), enabled);
        self.save_components()
    }

    /// Save component configuration to file
    #[allow(dead_code)]
    fn save_components(&self) -> AppResult<()> {
        // Create config directory if it doesn't exist
        if !Path::new("config").exists() {
            fs::create_dir("config")?;
        }

        let toml_str = toml::to_string(&self.components)?;
        fs::write("config/components.toml", toml_str)?;

        Ok(())
    }
}

/// Resolve the default data directory for the store files
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("focusdeck"))
        .unwrap_or_else(|| PathBuf::from(".focusdeck"))
}

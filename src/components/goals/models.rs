use crate::error::{validation_error, AppResult};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Goal priority, also the fallback source for event display colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Progress state of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Pending,
    InProgress,
    Completed,
}

/// A tracked goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Local>>,
    pub status: GoalStatus,
    pub priority: Priority,
    /// Completion percentage, clamped to 0..=100
    pub progress: u8,
    #[serde(default)]
    pub color: Option<String>,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl Goal {
    /// Check the record invariants
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(validation_error("title must not be empty"));
        }
        if self.progress > 100 {
            return Err(validation_error("progress must be between 0 and 100"));
        }
        Ok(())
    }

    /// Clamp out-of-range progress instead of rejecting it
    pub fn normalize(&mut self) {
        if self.progress > 100 {
            self.progress = 100;
        }
    }
}

/// Input for creating a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Local>>,
    pub status: GoalStatus,
    pub priority: Priority,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub color: Option<String>,
}

/// Partial update for a goal; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Local>>,
    #[serde(default)]
    pub status: Option<GoalStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub color: Option<String>,
}

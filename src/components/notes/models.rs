use crate::error::{validation_error, AppResult};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A free-form note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pinned: bool,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl Note {
    /// Check the record invariants
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(validation_error("title must not be empty"));
        }
        Ok(())
    }
}

/// Input for creating a note
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pinned: bool,
}

/// Partial update for a note; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub pinned: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn validate_requires_title() {
        let now = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut note = Note {
            id: "n1".to_string(),
            title: "Groceries".to_string(),
            content: "milk, eggs".to_string(),
            pinned: false,
            created_at: now,
            updated_at: now,
        };
        assert!(note.validate().is_ok());

        note.title = " ".to_string();
        assert!(note.validate().is_err());
    }
}

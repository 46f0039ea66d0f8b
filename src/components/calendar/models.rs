use crate::error::{recurrence_error, validation_error, AppResult};
use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

/// Display category of a calendar event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Task,
    Goal,
    Meeting,
    Personal,
    Other,
}

/// Recurrence step frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Recurrence rule attached to a series definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Local>>,
}

impl RecurrenceRule {
    /// Validate the rule shape; rejected rules never reach the expander
    pub fn validate(&self) -> AppResult<()> {
        if self.interval < 1 {
            return Err(recurrence_error(&format!(
                "interval must be at least 1, got {}",
                self.interval
            )));
        }
        Ok(())
    }
}

/// Reminder settings for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderSetting {
    pub enabled: bool,
    /// Minutes before the occurrence start at which the reminder becomes due
    pub minutes_before: i64,
}

/// A stored event: a single occurrence template or a recurring series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub category: Category,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub goal_id: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default)]
    pub reminder: Option<ReminderSetting>,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl Event {
    /// Series duration, preserved across all expanded occurrences
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Check the record invariants
    ///
    /// Applied at the store boundary: on create, on update (against the
    /// merged record) and to each record loaded from storage.
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(validation_error("title must not be empty"));
        }
        if self.end <= self.start {
            return Err(validation_error("end must be after start"));
        }
        if self.is_recurring {
            match &self.recurrence {
                Some(rule) => rule.validate()?,
                None => {
                    return Err(validation_error(
                        "recurring event must carry a recurrence rule",
                    ))
                }
            }
        }
        Ok(())
    }

    /// Coerce the record into canonical shape
    ///
    /// A recurrence rule on a non-recurring event is dropped rather than
    /// rejected, so stale flags from older records do not block loading.
    pub fn normalize(&mut self) {
        if !self.is_recurring {
            self.recurrence = None;
        }
    }
}

/// Input for creating an event; id and timestamps are assigned by the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub category: Category,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub goal_id: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default)]
    pub reminder: Option<ReminderSetting>,
}

/// Partial update for an event; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Local>>,
    #[serde(default)]
    pub end: Option<DateTime<Local>>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub goal_id: Option<String>,
    #[serde(default)]
    pub is_recurring: Option<bool>,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default)]
    pub reminder: Option<ReminderSetting>,
}

/// One concrete, time-bounded instance derived from an event
///
/// Never persisted; recomputed on every query.
#[derive(Debug, Clone, Serialize)]
pub struct Occurrence {
    pub id: String,
    pub series_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub category: Category,
    pub color: Option<String>,
    pub goal_id: Option<String>,
    pub reminder: Option<ReminderSetting>,
    /// Styling color resolved through the goal link, filled in by the
    /// query path; `None` when the raw expansion is used directly
    pub display_color: Option<String>,
}

impl Occurrence {
    /// The event itself as its only occurrence (non-recurring case)
    pub fn single(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            series_id: event.id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            start: event.start,
            end: event.end,
            category: event.category,
            color: event.color.clone(),
            goal_id: event.goal_id.clone(),
            reminder: event.reminder.clone(),
            display_color: None,
        }
    }

    /// An occurrence of `event` shifted to `start`, duration preserved
    pub fn of_series(event: &Event, start: DateTime<Local>) -> Self {
        Self {
            id: format!("{}-{}", event.id, start.timestamp_millis()),
            series_id: event.id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            start,
            end: start + event.duration(),
            category: event.category,
            color: event.color.clone(),
            goal_id: event.goal_id.clone(),
            reminder: event.reminder.clone(),
            display_color: None,
        }
    }

    /// Duration of this occurrence
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

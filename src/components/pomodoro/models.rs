use crate::error::{validation_error, AppResult};
use serde::{Deserialize, Serialize};

/// Phase of the pomodoro cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

/// Durations and cadence of the pomodoro cycle, in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSettings {
    pub focus_secs: u32,
    pub short_break_secs: u32,
    pub long_break_secs: u32,
    /// Number of completed focus phases before a long break
    pub long_break_interval: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            focus_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            long_break_interval: 4,
        }
    }
}

impl PomodoroSettings {
    /// Duration of the given phase
    pub fn duration_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_secs,
            Phase::ShortBreak => self.short_break_secs,
            Phase::LongBreak => self.long_break_secs,
        }
    }

    /// Check the settings invariants
    pub fn validate(&self) -> AppResult<()> {
        if self.focus_secs < 60 || self.short_break_secs < 60 || self.long_break_secs < 60 {
            return Err(validation_error("phase durations must be at least 60 seconds"));
        }
        if self.long_break_interval < 1 {
            return Err(validation_error("long break interval must be at least 1"));
        }
        Ok(())
    }
}

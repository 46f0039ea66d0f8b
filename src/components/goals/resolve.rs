use super::models::{Goal, Priority};
use crate::components::calendar::models::{Event, Occurrence};

/// Fallback when neither the event nor a linked goal provides a color
pub const FALLBACK_COLOR: &str = "#6366f1";

/// Priority-derived default colors
const HIGH_COLOR: &str = "#ef4444";
const MEDIUM_COLOR: &str = "#f59e0b";
const LOW_COLOR: &str = "#22c55e";

/// Resolve the display color for an event
///
/// Precedence: the event's explicit color, then the linked goal's color, then
/// the goal's priority default, then the fixed fallback. A dangling goal id
/// is not an error; it falls through to the fallback.
pub fn resolve_color(event: &Event, goals: &[Goal]) -> String {
    resolve(event.color.as_deref(), event.goal_id.as_deref(), goals)
}

/// Resolve the display color for an expanded occurrence
pub fn resolve_occurrence_color(occurrence: &Occurrence, goals: &[Goal]) -> String {
    resolve(
        occurrence.color.as_deref(),
        occurrence.goal_id.as_deref(),
        goals,
    )
}

fn resolve(color: Option<&str>, goal_id: Option<&str>, goals: &[Goal]) -> String {
    if let Some(color) = color {
        return color.to_string();
    }

    if let Some(goal_id) = goal_id {
        if let Some(goal) = goals.iter().find(|g| g.id == goal_id) {
            if let Some(goal_color) = &goal.color {
                return goal_color.clone();
            }
            return priority_color(goal.priority).to_string();
        }
    }

    FALLBACK_COLOR.to_string()
}

/// Default color for a goal priority
pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => HIGH_COLOR,
        Priority::Medium => MEDIUM_COLOR,
        Priority::Low => LOW_COLOR,
    }
}

use super::models::{Category, Event, Occurrence};
use super::recurrence::expand;
use crate::error::AppResult;
use chrono::{DateTime, Local};

/// Expand `events` and return the occurrences intersecting the range
///
/// Intersection uses the half-open rule: an occurrence matches when
/// `start < range_end && end > range_start`. Output is sorted by start,
/// ties broken by occurrence id, so identical inputs always produce
/// identically ordered output. Pure: no side effects, input untouched.
pub fn query_range(
    events: &[Event],
    range_start: DateTime<Local>,
    range_end: DateTime<Local>,
    category: Option<Category>,
) -> AppResult<Vec<Occurrence>> {
    let mut occurrences = Vec::new();

    for event in events {
        let expanded = expand(event, Some((range_start, range_end)))?;
        occurrences.extend(
            expanded
                .into_iter()
                .filter(|occ| occ.start < range_end && occ.end > range_start),
        );
    }

    if let Some(category) = category {
        occurrences.retain(|occ| occ.category == category);
    }

    occurrences.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));

    Ok(occurrences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::calendar::models::{Frequency, RecurrenceRule};
    use chrono::{Duration, TimeZone};

    fn event(id: &str, category: Category, day: u32, hour: u32) -> Event {
        let start = Local.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap();
        let end = start + Duration::hours(1);
        Event {
            id: id.to_string(),
            title: format!("Event {}", id),
            description: None,
            start,
            end,
            category,
            color: None,
            goal_id: None,
            is_recurring: false,
            recurrence: None,
            reminder: None,
            created_at: start,
            updated_at: start,
        }
    }

    fn march(day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn filters_to_intersecting_occurrences() {
        let events = vec![
            event("a", Category::Task, 5, 9),
            event("b", Category::Task, 10, 9),
            event("c", Category::Task, 20, 9),
        ];

        let result = query_range(&events, march(8), march(15), None).unwrap();
        let ids: Vec<&str> = result.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn half_open_rule_excludes_touching_boundaries() {
        // Event ending exactly at range start does not match; one starting
        // exactly at range end does not match either
        let mut ends_at_boundary = event("edge-end", Category::Task, 7, 23);
        ends_at_boundary.end = march(8);
        let starts_at_boundary = event("edge-start", Category::Task, 15, 0);

        let events = vec![ends_at_boundary, starts_at_boundary];
        let result = query_range(&events, march(8), march(15), None).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn expands_series_inside_the_range() {
        let mut series = event("s", Category::Meeting, 1, 9);
        series.is_recurring = true;
        series.recurrence = Some(RecurrenceRule {
            frequency: Frequency::Daily,
            interval: 1,
            end_date: None,
        });

        let result = query_range(&[series], march(10), march(13), None).unwrap();
        assert_eq!(result.len(), 3);
        for occurrence in &result {
            assert_eq!(occurrence.series_id, "s");
        }
    }

    #[test]
    fn category_filter_is_a_pure_restriction() {
        let events = vec![
            event("a", Category::Task, 10, 9),
            event("b", Category::Personal, 10, 11),
            event("c", Category::Task, 11, 9),
        ];

        let all = query_range(&events, march(8), march(15), None).unwrap();
        let tasks = query_range(&events, march(8), march(15), Some(Category::Task)).unwrap();

        assert!(tasks.len() < all.len());
        for occurrence in &tasks {
            assert_eq!(occurrence.category, Category::Task);
            assert!(all.iter().any(|o| o.id == occurrence.id));
        }
    }

    #[test]
    fn output_is_sorted_and_idempotent() {
        let events = vec![
            event("z", Category::Task, 12, 9),
            event("a", Category::Task, 12, 9),
            event("m", Category::Task, 10, 9),
        ];

        let first = query_range(&events, march(8), march(15), None).unwrap();
        let second = query_range(&events, march(8), march(15), None).unwrap();

        let first_ids: Vec<&str> = first.iter().map(|o| o.id.as_str()).collect();
        let second_ids: Vec<&str> = second.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(first_ids, second_ids);

        // Sorted by start, then id for the two simultaneous events
        assert_eq!(first_ids, vec!["m", "a", "z"]);
    }

    #[test]
    fn multi_day_event_matches_every_covered_day() {
        let mut long_event = event("long", Category::Personal, 10, 0);
        long_event.end = long_event.start + Duration::days(3);

        // A one-day window in the middle of the span still matches
        let result = query_range(&[long_event], march(11), march(12), None).unwrap();
        assert_eq!(result.len(), 1);
    }
}

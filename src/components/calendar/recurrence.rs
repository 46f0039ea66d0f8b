use super::models::{Event, Frequency, Occurrence, RecurrenceRule};
use crate::error::{recurrence_error, AppResult};
use crate::utils::time::{add_months_clamped, resolve_local};
use chrono::{DateTime, Duration, Local};

/// Horizon applied when a recurrence rule carries no end date
pub const DEFAULT_HORIZON_DAYS: i64 = 365;

/// Resolved end bound for generating occurrences of `event`
pub fn recurrence_horizon(event: &Event) -> DateTime<Local> {
    match event.recurrence.as_ref().and_then(|rule| rule.end_date) {
        Some(end_date) => end_date,
        None => event.start + Duration::days(DEFAULT_HORIZON_DAYS),
    }
}

/// Expand an event into its concrete occurrences
///
/// Non-recurring events (or events without a rule) come back as themselves,
/// untouched. For a series the cursor starts at `event.start` and is stepped
/// by the rule until it passes the horizon (`end_date`, or start + 365 days).
/// Steps operate on local wall-clock time: the time of day is held constant
/// across DST transitions, and monthly/yearly steps clamp the day-of-month to
/// the target month's length (Jan 31 + 1 month = Feb 28/29), counted from the
/// anchor so the original day is restored in longer months.
///
/// `window` is purely an output filter: occurrences falling outside it are
/// skipped, but the cursor walk is identical with or without it.
pub fn expand(
    event: &Event,
    window: Option<(DateTime<Local>, DateTime<Local>)>,
) -> AppResult<Vec<Occurrence>> {
    let rule = match (event.is_recurring, &event.recurrence) {
        (true, Some(rule)) => rule,
        _ => return Ok(vec![Occurrence::single(event)]),
    };

    if rule.interval < 1 {
        return Err(recurrence_error(&format!(
            "interval must be at least 1, got {}",
            rule.interval
        )));
    }

    let horizon = recurrence_horizon(event);
    let mut occurrences = Vec::new();

    for step in 0.. {
        let start = nth_start(event.start, rule, step);
        if start > horizon {
            break;
        }

        let occurrence = Occurrence::of_series(event, start);
        match window {
            Some((window_start, window_end)) => {
                // Same half-open overlap rule the query engine applies
                if occurrence.start < window_end && occurrence.end > window_start {
                    occurrences.push(occurrence);
                }
            }
            None => occurrences.push(occurrence),
        }
    }

    Ok(occurrences)
}

/// Start of the `n`-th occurrence, counted from the series anchor
///
/// Computed from the anchor rather than the previous occurrence so the
/// day-of-month clamp does not accumulate: a Jan 31 monthly series visits
/// Feb 28, Mar 31, Apr 30, not Feb 28, Mar 28, ...
fn nth_start(anchor: DateTime<Local>, rule: &RecurrenceRule, n: i32) -> DateTime<Local> {
    let interval = rule.interval as i32;
    let naive = anchor.naive_local();

    match rule.frequency {
        Frequency::Daily => resolve_local(naive + Duration::days((interval * n) as i64)),
        Frequency::Weekly => resolve_local(naive + Duration::days((interval * 7 * n) as i64)),
        Frequency::Monthly => resolve_local(add_months_clamped(naive, interval * n)),
        Frequency::Yearly => resolve_local(add_months_clamped(naive, interval * 12 * n)),
    }
}

use chrono::{DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone};

/// Number of days in the given month, accounting for leap years
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Add `months` to a datetime, clamping the day to the target month's length
///
/// Clamp policy: Jan 31 + 1 month = Feb 28 (29 in leap years). The time of
/// day is carried over unchanged.
pub fn add_months_clamped(dt: NaiveDateTime, months: i32) -> NaiveDateTime {
    let total = dt.year() * 12 + dt.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = dt.day().min(days_in_month(year, month));

    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| dt.date())
        .and_time(dt.time())
}

/// Resolve a naive wall-clock time to a concrete local instant
///
/// DST fold picks the earlier instant; a wall-clock gap shifts past it.
pub fn resolve_local(naive: NaiveDateTime) -> DateTime<Local> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            match Local.from_local_datetime(&shifted) {
                LocalResult::Single(dt) => dt,
                LocalResult::Ambiguous(earliest, _) => earliest,
                LocalResult::None => Local.from_utc_datetime(&naive),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 1), 31);
        assert_eq!(days_in_month(2024, 2), 29); // Leap year
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn test_add_months_simple() {
        let dt = naive(2024, 1, 15, 9, 30);
        assert_eq!(add_months_clamped(dt, 1), naive(2024, 2, 15, 9, 30));
        assert_eq!(add_months_clamped(dt, 12), naive(2025, 1, 15, 9, 30));
    }

    #[test]
    fn test_add_months_clamps_short_months() {
        // Jan 31 + 1 month lands on the last day of February
        let jan31 = naive(2023, 1, 31, 10, 0);
        assert_eq!(add_months_clamped(jan31, 1), naive(2023, 2, 28, 10, 0));

        let jan31_leap = naive(2024, 1, 31, 10, 0);
        assert_eq!(add_months_clamped(jan31_leap, 1), naive(2024, 2, 29, 10, 0));

        // Clamping applies per step target, not cumulatively
        assert_eq!(add_months_clamped(jan31, 3), naive(2023, 4, 30, 10, 0));
    }

    #[test]
    fn test_add_months_year_rollover() {
        let nov30 = naive(2023, 11, 30, 8, 0);
        assert_eq!(add_months_clamped(nov30, 3), naive(2024, 2, 29, 8, 0));

        // Feb 29 + 1 year clamps to Feb 28
        let feb29 = naive(2024, 2, 29, 8, 0);
        assert_eq!(add_months_clamped(feb29, 12), naive(2025, 2, 28, 8, 0));
    }

    #[test]
    fn test_resolve_local_plain_time() {
        let dt = resolve_local(naive(2024, 6, 15, 12, 0));
        assert_eq!(dt.naive_local(), naive(2024, 6, 15, 12, 0));
    }
}

//! Derived-view helpers shared by the pages.
//!
//! All of these are pure and recomputed from `items` on every render pass;
//! none of them hold state of their own.

use chrono::{Local, NaiveDate};

/// Partition into (active, completed) by a completion flag.
///
/// Active items are those where `completed` returns false.
pub fn split_by_flag<'a, T>(
    items: &'a [T],
    completed: impl Fn(&T) -> bool,
) -> (Vec<&'a T>, Vec<&'a T>) {
    items.iter().partition(|item| !completed(item))
}

/// Progress percentage, clamped into `[0, target]` first.
///
/// Undefined (`None`) when `target` is not positive.
pub fn progress_percent(current: i32, target: i32) -> Option<f64> {
    if target <= 0 {
        return None;
    }
    let clamped = current.clamp(0, target);
    Some(f64::from(clamped) / f64::from(target) * 100.0)
}

/// Calendar-day key for `date`, `YYYY-MM-DD`.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's calendar-day key in the user's local timezone.
///
/// Reads the wall clock on every call so a page left open across midnight
/// picks up the new day on its next interaction.
pub fn today_key() -> String {
    day_key(Local::now().date_naive())
}

/// Today as a local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_by_flag_partitions_active_first() {
        let items = [(1, false), (2, true), (3, false)];
        let (active, completed) = split_by_flag(&items, |&(_, done)| done);
        assert_eq!(active, vec![&(1, false), &(3, false)]);
        assert_eq!(completed, vec![&(2, true)]);
    }

    #[test]
    fn split_of_empty_list_is_empty() {
        let items: [(i32, bool); 0] = [];
        let (active, completed) = split_by_flag(&items, |&(_, done)| done);
        assert!(active.is_empty());
        assert!(completed.is_empty());
    }

    #[test]
    fn percent_is_undefined_without_a_positive_target() {
        assert_eq!(progress_percent(5, 0), None);
        assert_eq!(progress_percent(5, -1), None);
    }

    #[test]
    fn percent_clamps_out_of_range_progress() {
        assert_eq!(progress_percent(150, 100), Some(100.0));
        assert_eq!(progress_percent(-10, 100), Some(0.0));
        assert_eq!(progress_percent(30, 100), Some(30.0));
        assert_eq!(progress_percent(1, 3), Some(100.0 / 3.0));
    }

    #[test]
    fn day_key_is_iso_calendar_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(day_key(date), "2024-01-05");
    }

    #[test]
    fn today_key_has_expected_shape() {
        let key = today_key();
        assert_eq!(key.len(), 10);
        assert_eq!(key.as_bytes()[4], b'-');
        assert_eq!(key.as_bytes()[7], b'-');
    }
}

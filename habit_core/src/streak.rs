//! Streak calculation over a set of fulfilled days.
//!
//! - Current streak: anchored at today, or at yesterday when today has no
//!   fulfillment yet, then walked backwards until the first gap.
//! - Longest streak: the longest run of consecutive days anywhere in the set.
//!
//! Inputs are unordered and may contain duplicates. "Today" is always passed
//! in by the caller.

use crate::Result;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Length of the unbroken run ending at today (or yesterday, if today is
/// still open).
pub fn current_streak(fulfilled: &[NaiveDate], today: NaiveDate) -> u32 {
    if fulfilled.is_empty() {
        return 0;
    }

    let days: HashSet<NaiveDate> = fulfilled.iter().copied().collect();

    let anchor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0u32;
    let mut day = Some(anchor);
    while let Some(d) = day {
        if !days.contains(&d) {
            break;
        }
        streak += 1;
        day = d.pred_opt();
    }

    tracing::debug!("Current streak {} anchored at {}", streak, anchor);
    streak
}

/// Length of the longest run of consecutive days in the set
pub fn longest_streak(fulfilled: &[NaiveDate]) -> u32 {
    if fulfilled.is_empty() {
        return 0;
    }

    let mut days = fulfilled.to_vec();
    days.sort_unstable();
    days.dedup();

    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in days.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }

    longest
}

/// [`current_streak`] over `YYYY-MM-DD` strings
pub fn current_streak_str<S: AsRef<str>>(fulfilled: &[S], today: NaiveDate) -> Result<u32> {
    let days = crate::date::parse_days(fulfilled)?;
    Ok(current_streak(&days, today))
}

/// [`longest_streak`] over `YYYY-MM-DD` strings
pub fn longest_streak_str<S: AsRef<str>>(fulfilled: &[S]) -> Result<u32> {
    let days = crate::date::parse_days(fulfilled)?;
    Ok(longest_streak(&days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(s: &str) -> NaiveDate {
        crate::date::parse_day(s).unwrap()
    }

    /// `n` consecutive days ending at `end`
    fn run_ending(end: NaiveDate, n: i64) -> Vec<NaiveDate> {
        (0..n).map(|i| end - Duration::days(i)).collect()
    }

    #[test]
    fn test_empty() {
        assert_eq!(current_streak(&[], day("2024-01-05")), 0);
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn test_gap_before_today() {
        let dates = ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-05"];
        assert_eq!(current_streak_str(&dates, day("2024-01-05")).unwrap(), 1);
        assert_eq!(longest_streak_str(&dates).unwrap(), 3);
    }

    #[test]
    fn test_run_including_today() {
        let today = day("2024-03-10");
        let dates = run_ending(today, 6);
        assert_eq!(current_streak(&dates, today), 6);
    }

    #[test]
    fn test_today_open_counts_run_ending_yesterday() {
        let today = day("2024-03-10");
        let yesterday = day("2024-03-09");
        let dates = run_ending(yesterday, 4);
        assert_eq!(current_streak(&dates, today), 4);
    }

    #[test]
    fn test_broken_when_today_and_yesterday_missing() {
        let today = day("2024-03-10");
        let dates = run_ending(day("2024-03-08"), 30);
        assert_eq!(current_streak(&dates, today), 0);
        assert_eq!(longest_streak(&dates), 30);
    }

    #[test]
    fn test_future_days_ignored_by_current() {
        let today = day("2024-03-10");
        let dates = vec![day("2024-03-11"), day("2024-03-12")];
        assert_eq!(current_streak(&dates, today), 0);
    }

    #[test]
    fn test_unordered_and_duplicate_input() {
        let dates = [
            "2024-01-03",
            "2024-01-01",
            "2024-01-02",
            "2024-01-02",
            "2024-01-03",
            "2024-01-10",
        ];
        assert_eq!(longest_streak_str(&dates).unwrap(), 3);
        assert_eq!(current_streak_str(&dates, day("2024-01-03")).unwrap(), 3);
        assert_eq!(current_streak_str(&dates, day("2024-01-04")).unwrap(), 3);
    }

    #[test]
    fn test_single_day() {
        let dates = vec![day("2024-06-01")];
        assert_eq!(longest_streak(&dates), 1);
        assert_eq!(current_streak(&dates, day("2024-06-01")), 1);
        assert_eq!(current_streak(&dates, day("2024-06-02")), 1);
        assert_eq!(current_streak(&dates, day("2024-06-03")), 0);
    }

    #[test]
    fn test_runs_across_month_and_leap_day() {
        let dates = ["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01"];
        assert_eq!(longest_streak_str(&dates).unwrap(), 4);
        assert_eq!(current_streak_str(&dates, day("2024-03-01")).unwrap(), 4);

        let year_end = ["2023-12-30", "2023-12-31", "2024-01-01"];
        assert_eq!(longest_streak_str(&year_end).unwrap(), 3);
    }

    #[test]
    fn test_longest_covers_current_run() {
        let today = day("2024-05-20");
        let mut dates = run_ending(today, 5);
        dates.extend(run_ending(day("2024-04-01"), 3));

        let current = current_streak(&dates, today);
        assert_eq!(current, 5);
        assert!(longest_streak(&dates) >= current);
    }

    #[test]
    fn test_idempotent() {
        let today = day("2024-05-20");
        let dates = run_ending(today, 9);
        assert_eq!(current_streak(&dates, today), current_streak(&dates, today));
        assert_eq!(longest_streak(&dates), longest_streak(&dates));
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let dates = ["2024-01-01", "2024-02-30"];
        assert!(longest_streak_str(&dates).is_err());
        assert!(current_streak_str(&dates, day("2024-01-01")).is_err());
    }
}

//! Assemble the per-habit streak summary from daily aggregates.

use crate::fulfillment::fulfilled_dates;
use crate::streak::{current_streak, longest_streak};
use crate::{DailyAggregate, HabitConfig, StreakSummary};
use chrono::NaiveDate;

/// Evaluate every day, then derive both streaks.
///
/// `today_value` is the raw total for `today`, reported whether or not it
/// fulfills the habit.
pub fn build_summary(
    config: &HabitConfig,
    aggregates: &[DailyAggregate],
    today: NaiveDate,
) -> StreakSummary {
    let mut dates = fulfilled_dates(config, aggregates);
    dates.sort_unstable();

    let today_value = aggregates
        .iter()
        .find(|agg| agg.date == today)
        .map(|agg| agg.total);

    let summary = StreakSummary {
        current_streak: current_streak(&dates, today),
        longest_streak: longest_streak(&dates),
        fulfilled_dates: dates,
        today_value,
    };

    tracing::debug!(
        "Summary: {} fulfilled days, current {}, longest {}",
        summary.fulfilled_dates.len(),
        summary.current_streak,
        summary.longest_streak
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;

    fn agg(s: &str, total: f64) -> DailyAggregate {
        DailyAggregate {
            date: crate::date::parse_day(s).unwrap(),
            total,
        }
    }

    #[test]
    fn test_counter_summary() {
        let config = HabitConfig::counter(8.0, Direction::Gte);
        let aggregates = vec![
            agg("2024-01-05", 8.0),
            agg("2024-01-01", 9.0),
            agg("2024-01-02", 8.0),
            agg("2024-01-03", 10.0),
            agg("2024-01-04", 7.99),
        ];
        let today = crate::date::parse_day("2024-01-05").unwrap();

        let summary = build_summary(&config, &aggregates, today);
        assert_eq!(summary.fulfilled_dates.len(), 4);
        assert_eq!(summary.fulfilled_dates[0], crate::date::parse_day("2024-01-01").unwrap());
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.longest_streak, 3);
        assert_eq!(summary.today_value, Some(8.0));
    }

    #[test]
    fn test_today_value_reported_when_not_fulfilled() {
        let config = HabitConfig::gauge(70.0);
        let aggregates = vec![agg("2024-02-01", 71.0), agg("2024-02-02", 80.0)];
        let today = crate::date::parse_day("2024-02-02").unwrap();

        let summary = build_summary(&config, &aggregates, today);
        assert_eq!(summary.today_value, Some(80.0));
        // Yesterday still carries the streak while today is unfulfilled
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.longest_streak, 1);
    }

    #[test]
    fn test_no_logs() {
        let today = crate::date::parse_day("2024-02-02").unwrap();
        let summary = build_summary(&HabitConfig::boolean(), &[], today);
        assert!(summary.fulfilled_dates.is_empty());
        assert_eq!(summary.current_streak, 0);
        assert_eq!(summary.longest_streak, 0);
        assert_eq!(summary.today_value, None);
    }
}

//! Per-day aggregation of raw log entries.

use crate::{DailyAggregate, LogEntry};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Sum entry values per calendar day, ascending by date
pub fn aggregate_daily<'a, I>(entries: I) -> Vec<DailyAggregate>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut totals: BTreeMap<_, f64> = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.date).or_insert(0.0) += entry.value;
    }

    totals
        .into_iter()
        .map(|(date, total)| DailyAggregate { date, total })
        .collect()
}

/// Daily aggregates for a single habit
pub fn aggregate_for_habit(habit_id: Uuid, entries: &[LogEntry]) -> Vec<DailyAggregate> {
    aggregate_daily(entries.iter().filter(|e| e.habit_id == habit_id))
}

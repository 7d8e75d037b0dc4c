//! Fulfillment evaluation: does a day's total count as "done"?
//!
//! Rules per habit type:
//! - Boolean: a total is present and strictly positive
//! - Counter: total >= goal (gte) or total <= goal (lte)
//! - Gauge: total within ±5% of goal
//!
//! A missing total means no log that day and is never fulfilled.

use crate::{DailyAggregate, Direction, HabitConfig, HabitKind};
use chrono::NaiveDate;

/// Relative half-width of the gauge acceptance band
pub const GAUGE_TOLERANCE: f64 = 0.05;

impl HabitKind {
    /// Evaluate a day's aggregated total against this habit kind
    pub fn is_fulfilled(&self, total: Option<f64>) -> bool {
        let Some(total) = total else {
            return false;
        };

        match *self {
            HabitKind::Boolean => total > 0.0,
            HabitKind::Counter { goal, direction } => match direction {
                Direction::Gte => total >= goal,
                Direction::Lte => total <= goal,
            },
            HabitKind::Gauge { goal } => {
                let low = goal * (1.0 - GAUGE_TOLERANCE);
                let high = goal * (1.0 + GAUGE_TOLERANCE);
                low <= total && total <= high
            }
        }
    }
}

/// Evaluate a stored habit configuration against a day's total.
///
/// Inconsistent configuration (e.g. a counter with no direction) is not an
/// error here; the day simply isn't fulfilled.
pub fn is_fulfilled(config: &HabitConfig, total: Option<f64>) -> bool {
    match config.kind() {
        Some(kind) => kind.is_fulfilled(total),
        None => {
            tracing::debug!(
                "Inconsistent {} habit config (goal={:?}, direction={:?}), treating as not fulfilled",
                config.habit_type,
                config.goal,
                config.direction
            );
            false
        }
    }
}

/// Days among `aggregates` that fulfill the habit, in input order
pub fn fulfilled_dates(config: &HabitConfig, aggregates: &[DailyAggregate]) -> Vec<NaiveDate> {
    aggregates
        .iter()
        .filter(|agg| is_fulfilled(config, Some(agg.total)))
        .map(|agg| agg.date)
        .collect()
}

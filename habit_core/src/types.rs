//! Core domain types for the habit tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Habit configuration (type, goal, direction) as stored
//! - The tagged `HabitKind` the evaluator dispatches on
//! - Raw log entries and their per-day aggregates
//! - The streak summary handed to the presentation layer

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{Error, Result};

// ============================================================================
// Habit Configuration
// ============================================================================

/// How a habit's daily total is judged
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HabitType {
    /// Done or not done; any positive total counts
    Boolean,
    /// Numeric threshold with a direction
    Counter,
    /// Numeric target hit within a tolerance band
    Gauge,
}

impl fmt::Display for HabitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HabitType::Boolean => "boolean",
            HabitType::Counter => "counter",
            HabitType::Gauge => "gauge",
        };
        f.write_str(s)
    }
}

/// Comparison direction for counter habits
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// total >= goal
    Gte,
    /// total <= goal
    Lte,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Gte => f.write_str("gte"),
            Direction::Lte => f.write_str("lte"),
        }
    }
}

/// Habit configuration in its stored, flat form.
///
/// Consistency between the three fields is only enforced by [`HabitConfig::validate`]
/// at creation time. Anything that reads a stored config goes through
/// [`HabitConfig::kind`], which yields `None` for inconsistent combinations.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HabitConfig {
    #[serde(rename = "type")]
    pub habit_type: HabitType,
    #[serde(default)]
    pub goal: Option<f64>,
    #[serde(default)]
    pub direction: Option<Direction>,
}

impl HabitConfig {
    pub fn boolean() -> Self {
        Self {
            habit_type: HabitType::Boolean,
            goal: None,
            direction: None,
        }
    }

    pub fn counter(goal: f64, direction: Direction) -> Self {
        Self {
            habit_type: HabitType::Counter,
            goal: Some(goal),
            direction: Some(direction),
        }
    }

    pub fn gauge(goal: f64) -> Self {
        Self {
            habit_type: HabitType::Gauge,
            goal: Some(goal),
            direction: None,
        }
    }

    /// Check the type/goal/direction invariants.
    ///
    /// - boolean: no goal, no direction
    /// - counter: finite non-negative goal and a direction
    /// - gauge: finite non-negative goal, no direction
    pub fn validate(&self) -> Result<()> {
        match self.habit_type {
            HabitType::Boolean => {
                if self.goal.is_some() {
                    return Err(Error::HabitValidation(
                        "boolean habits do not take a goal".into(),
                    ));
                }
            }
            HabitType::Counter | HabitType::Gauge => match self.goal {
                None => {
                    return Err(Error::HabitValidation(format!(
                        "{} habits require a goal",
                        self.habit_type
                    )));
                }
                Some(goal) if !goal.is_finite() || goal < 0.0 => {
                    return Err(Error::HabitValidation(format!(
                        "goal must be a non-negative number, got {}",
                        goal
                    )));
                }
                Some(_) => {}
            },
        }

        match (self.habit_type, self.direction) {
            (HabitType::Counter, None) => Err(Error::HabitValidation(
                "counter habits require a direction (gte or lte)".into(),
            )),
            (HabitType::Boolean | HabitType::Gauge, Some(_)) => Err(Error::HabitValidation(
                format!("{} habits do not take a direction", self.habit_type),
            )),
            _ => Ok(()),
        }
    }

    /// Resolve into the tagged variant, or `None` if the fields are inconsistent.
    ///
    /// A boolean habit with a stray goal still resolves to `Boolean`; the goal
    /// is ignored for that type.
    pub fn kind(&self) -> Option<HabitKind> {
        match self.habit_type {
            HabitType::Boolean => Some(HabitKind::Boolean),
            HabitType::Counter => Some(HabitKind::Counter {
                goal: self.goal?,
                direction: self.direction?,
            }),
            HabitType::Gauge => Some(HabitKind::Gauge { goal: self.goal? }),
        }
    }
}

/// Habit type with the parameters each type needs
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HabitKind {
    Boolean,
    Counter { goal: f64, direction: Direction },
    Gauge { goal: f64 },
}

/// A user-defined habit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub config: HabitConfig,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Logs and Aggregates
// ============================================================================

/// A single recorded value for a habit on a calendar day
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub date: NaiveDate,
    pub value: f64,
    pub logged_at: DateTime<Utc>,
}

/// Sum of all log entries for one habit on one day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub total: f64,
}

// ============================================================================
// Streak Summary
// ============================================================================

/// Fulfillment and streak data for one habit, recomputed per request
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub fulfilled_dates: Vec<NaiveDate>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub today_value: Option<f64>,
}

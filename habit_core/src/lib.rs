#![forbid(unsafe_code)]

//! Core domain model and business logic for the streak habit tracker.
//!
//! This crate provides:
//! - Domain types (habit configuration, log entries, daily aggregates)
//! - Fulfillment evaluation per habit type
//! - Current and longest streak calculation
//! - Persistence (habit registry, log WAL, CSV archive)

pub mod types;
pub mod error;
pub mod date;
pub mod config;
pub mod logging;
pub mod fulfillment;
pub mod streak;
pub mod aggregate;
pub mod summary;
pub mod registry;
pub mod wal;
pub mod csv_rollup;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use date::{format_day, parse_day, today_utc};
pub use fulfillment::is_fulfilled;
pub use streak::{current_streak, longest_streak};
pub use aggregate::aggregate_for_habit;
pub use summary::build_summary;
pub use registry::HabitRegistry;
pub use wal::{JsonlSink, LogSink};
pub use history::load_entries;

use chrono::{Days, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use habit_core::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "streak")]
#[command(about = "Habit tracker with daily streaks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Treat this day (YYYY-MM-DD, UTC) as today
    #[arg(long, global = true)]
    today: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a habit
    Add {
        name: String,

        #[arg(long = "type", value_enum)]
        habit_type: TypeArg,

        /// Target value (counter and gauge habits)
        #[arg(long)]
        goal: Option<f64>,

        /// Comparison for counter habits
        #[arg(long, value_enum)]
        direction: Option<DirectionArg>,
    },

    /// List habits
    List,

    /// Delete a habit
    Remove { habit: String },

    /// Record a value for a habit
    Log {
        habit: String,

        /// Amount to add to the day's total (defaults to 1)
        #[arg(allow_negative_numbers = true)]
        value: Option<f64>,

        /// Day to log against (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show current and longest streaks
    Status {
        /// Limit to a single habit
        habit: Option<String>,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Show daily totals for recent days
    History {
        habit: String,

        /// Number of days ending today
        #[arg(long)]
        days: Option<u32>,
    },

    /// Roll up WAL log entries to CSV
    Rollup {
        /// Clean up processed WAL files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    Boolean,
    Counter,
    Gauge,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Gte,
    Lte,
}

/// Locations of the tracker's files under the data directory
struct DataPaths {
    registry: PathBuf,
    wal_dir: PathBuf,
    wal: PathBuf,
    csv: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        let wal_dir = data_dir.join("wal");
        Self {
            registry: data_dir.join("habits.json"),
            wal: wal_dir.join("logs.wal"),
            wal_dir,
            csv: data_dir.join("logs.csv"),
        }
    }
}

fn main() -> Result<()> {
    habit_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let paths = DataPaths::new(&data_dir);

    let today = match cli.today.as_deref() {
        Some(s) => parse_day(s)?,
        None => today_utc(),
    };
    tracing::debug!("Using data dir {:?}, today {}", data_dir, today);

    match cli.command {
        Commands::Add {
            name,
            habit_type,
            goal,
            direction,
        } => cmd_add(&paths, &name, habit_type, goal, direction),
        Commands::List => cmd_list(&paths),
        Commands::Remove { habit } => cmd_remove(&paths, &habit),
        Commands::Log { habit, value, date } => {
            cmd_log(&paths, &habit, value.unwrap_or(1.0), date.as_deref(), today)
        }
        Commands::Status { habit, json } => cmd_status(&paths, habit.as_deref(), json, today),
        Commands::History { habit, days } => {
            let days = days.unwrap_or(config.report.history_days);
            cmd_history(&paths, &habit, days, today)
        }
        Commands::Rollup { cleanup } => cmd_rollup(&paths, cleanup),
    }
}

fn cmd_add(
    paths: &DataPaths,
    name: &str,
    habit_type: TypeArg,
    goal: Option<f64>,
    direction: Option<DirectionArg>,
) -> Result<()> {
    let config = HabitConfig {
        habit_type: match habit_type {
            TypeArg::Boolean => HabitType::Boolean,
            TypeArg::Counter => HabitType::Counter,
            TypeArg::Gauge => HabitType::Gauge,
        },
        goal,
        direction: direction.map(|d| match d {
            DirectionArg::Gte => Direction::Gte,
            DirectionArg::Lte => Direction::Lte,
        }),
    };

    let habit = HabitRegistry::update(&paths.registry, |registry| {
        Ok(registry.add(name, config)?.clone())
    })?;

    println!("✓ Created habit '{}' ({})", habit.name, describe(&habit.config));
    Ok(())
}

fn cmd_list(paths: &DataPaths) -> Result<()> {
    let registry = HabitRegistry::load(&paths.registry)?;

    if registry.habits.is_empty() {
        println!("No habits yet. Create one with `streak add`.");
        return Ok(());
    }

    for habit in &registry.habits {
        println!("{:<24} {}", habit.name, describe(&habit.config));
    }
    Ok(())
}

fn cmd_remove(paths: &DataPaths, key: &str) -> Result<()> {
    let habit = HabitRegistry::update(&paths.registry, |registry| registry.remove(key))?;
    println!("✓ Removed habit '{}'", habit.name);
    Ok(())
}

fn cmd_log(
    paths: &DataPaths,
    key: &str,
    value: f64,
    date: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    let registry = HabitRegistry::load(&paths.registry)?;
    let habit = registry.get(key)?;

    let date = match date {
        Some(s) => parse_day(s)?,
        None => today,
    };

    let entry = LogEntry {
        id: uuid::Uuid::new_v4(),
        habit_id: habit.id,
        date,
        value,
        logged_at: chrono::Utc::now(),
    };

    let mut sink = JsonlSink::new(&paths.wal);
    sink.append(&entry)?;

    println!("✓ Logged {} for '{}' on {}", fmt_value(value), habit.name, format_day(date));
    Ok(())
}

fn cmd_status(paths: &DataPaths, key: Option<&str>, json: bool, today: NaiveDate) -> Result<()> {
    let registry = HabitRegistry::load(&paths.registry)?;
    let habits: Vec<&Habit> = match key {
        Some(k) => vec![registry.get(k)?],
        None => registry.habits.iter().collect(),
    };

    let entries = load_entries(&paths.wal, &paths.csv)?;
    let summaries: Vec<(&Habit, StreakSummary)> = habits
        .into_iter()
        .map(|h| {
            let aggregates = aggregate_for_habit(h.id, &entries);
            (h, build_summary(&h.config, &aggregates, today))
        })
        .collect();

    if json {
        let output = if key.is_some() {
            serde_json::to_value(&summaries[0].1)?
        } else {
            let mut rows = Vec::with_capacity(summaries.len());
            for (habit, summary) in &summaries {
                let mut row = serde_json::to_value(summary)?;
                if let Some(obj) = row.as_object_mut() {
                    obj.insert("id".into(), habit.id.to_string().into());
                    obj.insert("name".into(), habit.name.clone().into());
                }
                rows.push(row);
            }
            serde_json::Value::Array(rows)
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No habits yet. Create one with `streak add`.");
        return Ok(());
    }

    for (habit, summary) in &summaries {
        let done_today = is_fulfilled(&habit.config, summary.today_value);
        let today_text = match summary.today_value {
            Some(v) if done_today => format!("{} ✓", fmt_value(v)),
            Some(v) => format!("{} (not yet)", fmt_value(v)),
            None => "—".to_string(),
        };

        println!("{} ({})", habit.name, describe(&habit.config));
        println!("  Current streak: {}", days_label(summary.current_streak));
        println!("  Longest streak: {}", days_label(summary.longest_streak));
        println!("  Today: {}", today_text);
    }
    Ok(())
}

fn cmd_history(paths: &DataPaths, key: &str, days: u32, today: NaiveDate) -> Result<()> {
    let registry = HabitRegistry::load(&paths.registry)?;
    let habit = registry.get(key)?;

    let entries = load_entries(&paths.wal, &paths.csv)?;
    let totals: HashMap<NaiveDate, f64> = aggregate_for_habit(habit.id, &entries)
        .into_iter()
        .map(|agg| (agg.date, agg.total))
        .collect();

    let span = u64::from(days.max(1)) - 1;
    let start = today.checked_sub_days(Days::new(span)).ok_or_else(|| {
        Error::Other(format!(
            "a {}-day history ending {} reaches before the earliest supported date",
            days,
            format_day(today)
        ))
    })?;

    println!("{} ({})", habit.name, describe(&habit.config));
    for day in start.iter_days().take_while(|d| *d <= today) {
        let total = totals.get(&day).copied();
        let mark = if is_fulfilled(&habit.config, total) { "✓" } else { "·" };
        let value = total.map(fmt_value).unwrap_or_else(|| "-".to_string());
        println!("  {}  {:>8}  {}", format_day(day), value, mark);
    }
    Ok(())
}

fn cmd_rollup(paths: &DataPaths, cleanup: bool) -> Result<()> {
    if !paths.wal.exists() {
        println!("No WAL file found - nothing to roll up.");
        return Ok(());
    }

    let count = habit_core::csv_rollup::wal_to_csv_and_archive(&paths.wal, &paths.csv)?;

    println!("✓ Rolled up {} log entries to CSV", count);
    println!("  CSV: {}", paths.csv.display());

    if cleanup {
        let cleaned = habit_core::csv_rollup::cleanup_processed_wals(&paths.wal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed WAL files", cleaned);
        }
    }

    Ok(())
}

/// One-line description of a habit's rule, e.g. `counter >= 8`
fn describe(config: &HabitConfig) -> String {
    match config.kind() {
        Some(HabitKind::Boolean) => "boolean".to_string(),
        Some(HabitKind::Counter { goal, direction }) => {
            let op = match direction {
                Direction::Gte => ">=",
                Direction::Lte => "<=",
            };
            format!("counter {} {}", op, fmt_value(goal))
        }
        Some(HabitKind::Gauge { goal }) => format!("gauge ≈ {} ±5%", fmt_value(goal)),
        None => format!("{} (misconfigured)", config.habit_type),
    }
}

fn fmt_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

fn days_label(n: u32) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", n)
    }
}

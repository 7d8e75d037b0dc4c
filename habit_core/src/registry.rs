//! Habit registry persistence with file locking.
//!
//! The registry is a single JSON document listing every habit. It is the
//! only record of habit ids, so a file that fails to parse is never
//! overwritten: read-only commands see an empty registry, while
//! [`HabitRegistry::update`] refuses to run until the file is repaired.
//!
//! Writers serialize on an exclusive lock over a `<registry>.lock` sidecar
//! for the whole load-modify-save cycle, then replace the registry through a
//! temp file rename.

use crate::{Error, Habit, HabitConfig, Result};
use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// All habits known to the tracker
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct HabitRegistry {
    pub habits: Vec<Habit>,
}

/// Sidecar lock file guarding read-modify-write of the registry
fn lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("habits.json"));
    name.push(".lock");
    path.with_file_name(name)
}

/// Read the registry file under a shared lock; `None` if it doesn't exist
fn read_contents(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    Ok(Some(contents))
}

impl HabitRegistry {
    /// Load the registry for reading.
    ///
    /// Returns an empty registry if the file doesn't exist. If the file
    /// can't be read or parsed, logs a warning and returns an empty registry;
    /// the file itself is left untouched.
    pub fn load(path: &Path) -> Result<Self> {
        match Self::load_strict(path) {
            Ok(registry) => Ok(registry),
            Err(e) => {
                tracing::warn!("{}. Showing an empty registry.", e);
                Ok(Self::default())
            }
        }
    }

    /// Load the registry, failing on any read or parse error.
    ///
    /// A missing file is still an empty registry.
    pub fn load_strict(path: &Path) -> Result<Self> {
        let contents = match read_contents(path) {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                tracing::debug!("No habit registry found, starting empty");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(Error::Registry(format!(
                    "unable to read habit registry {:?}: {}",
                    path, e
                )));
            }
        };

        let registry = serde_json::from_str::<HabitRegistry>(&contents).map_err(|e| {
            Error::Registry(format!(
                "habit registry {:?} is corrupted ({}); fix or move it aside before making changes",
                path, e
            ))
        })?;

        tracing::debug!("Loaded {} habits from {:?}", registry.habits.len(), path);
        Ok(registry)
    }

    /// Save the registry atomically (temp file, fsync, rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("registry path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} habits to {:?}", self.habits.len(), path);
        Ok(())
    }

    /// Load, modify, and save back while holding the registry lock.
    ///
    /// Fails without writing anything if the existing registry is corrupted.
    pub fn update<F, T>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut HabitRegistry) -> Result<T>,
    {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path(path))?;
        lock.lock_exclusive()?;

        let result = Self::load_strict(path).and_then(|mut registry| {
            let out = f(&mut registry)?;
            registry.save(path)?;
            Ok(out)
        });

        lock.unlock()?;
        result
    }

    /// Create a habit after validating its configuration and name
    pub fn add(&mut self, name: &str, config: HabitConfig) -> Result<&Habit> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::HabitValidation("name must not be empty".into()));
        }
        if self.find(name).is_some() {
            return Err(Error::HabitValidation(format!(
                "a habit named '{}' already exists",
                name
            )));
        }
        config.validate()?;

        self.habits.push(Habit {
            id: Uuid::new_v4(),
            name: name.to_string(),
            config,
            created_at: Utc::now(),
        });

        let habit = &self.habits[self.habits.len() - 1];
        tracing::info!("Created {} habit '{}' ({})", habit.config.habit_type, habit.name, habit.id);
        Ok(habit)
    }

    /// Look up a habit by exact id or case-insensitive name
    pub fn find(&self, key: &str) -> Option<&Habit> {
        let key = key.trim();
        self.habits
            .iter()
            .find(|h| h.id.to_string() == key)
            .or_else(|| self.habits.iter().find(|h| h.name.eq_ignore_ascii_case(key)))
    }

    /// Like [`find`](Self::find) but a miss is an error
    pub fn get(&self, key: &str) -> Result<&Habit> {
        self.find(key).ok_or_else(|| Error::NotFound(key.to_string()))
    }

    /// Remove a habit and return it
    pub fn remove(&mut self, key: &str) -> Result<Habit> {
        let id = self.get(key)?.id;
        let idx = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| Error::NotFound(key.to_string()))?;

        let habit = self.habits.remove(idx);
        tracing::info!("Removed habit '{}' ({})", habit.name, habit.id);
        Ok(habit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, HabitType};

    #[test]
    fn test_save_and_load_roundtrip() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.json");

        let mut registry = HabitRegistry::default();
        registry.add("Water", HabitConfig::counter(8.0, Direction::Gte)).unwrap();
        registry.add("Meditate", HabitConfig::boolean()).unwrap();
        registry.save(&path).unwrap();

        let loaded = HabitRegistry::load(&path).unwrap();
        assert_eq!(loaded.habits.len(), 2);
        let water = loaded.get("water").unwrap();
        assert_eq!(water.config, HabitConfig::counter(8.0, Direction::Gte));
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = HabitRegistry::load(&temp_dir.path().join("missing.json")).unwrap();
        assert!(registry.habits.is_empty());
    }

    #[test]
    fn test_corrupted_registry_returns_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let registry = HabitRegistry::load(&path).unwrap();
        assert!(registry.habits.is_empty());
    }

    #[test]
    fn test_add_rejects_invalid_config() {
        let mut registry = HabitRegistry::default();
        let counter_without_direction = HabitConfig {
            habit_type: HabitType::Counter,
            goal: Some(3.0),
            direction: None,
        };

        let err = registry.add("Steps", counter_without_direction).unwrap_err();
        assert!(matches!(err, Error::HabitValidation(_)));
        assert!(registry.habits.is_empty());
    }

    #[test]
    fn test_add_rejects_duplicate_and_empty_names() {
        let mut registry = HabitRegistry::default();
        registry.add("Read", HabitConfig::boolean()).unwrap();

        assert!(registry.add("read", HabitConfig::boolean()).is_err());
        assert!(registry.add("   ", HabitConfig::boolean()).is_err());
        assert_eq!(registry.habits.len(), 1);
    }

    #[test]
    fn test_find_by_id_and_remove() {
        let mut registry = HabitRegistry::default();
        let id = registry.add("Sleep", HabitConfig::gauge(8.0)).unwrap().id;

        assert_eq!(registry.get(&id.to_string()).unwrap().name, "Sleep");

        let removed = registry.remove("SLEEP").unwrap();
        assert_eq!(removed.id, id);
        assert!(matches!(registry.remove("Sleep"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.json");

        let id = HabitRegistry::update(&path, |registry| {
            Ok(registry.add("Stretch", HabitConfig::boolean())?.id)
        })
        .unwrap();

        let loaded = HabitRegistry::load(&path).unwrap();
        assert_eq!(loaded.get("Stretch").unwrap().id, id);

        // No stray temp files left behind
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "habits.json" && e.file_name() != "habits.json.lock")
            .collect();
        assert!(extras.is_empty(), "unexpected files: {:?}", extras);
    }

    #[test]
    fn test_update_refuses_corrupted_registry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.json");

        let mut registry = HabitRegistry::default();
        registry.add("Water", HabitConfig::counter(8.0, Direction::Gte)).unwrap();
        registry.save(&path).unwrap();

        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push('x');
        std::fs::write(&path, &contents).unwrap();

        let err = HabitRegistry::update(&path, |registry| {
            registry.add("Walk", HabitConfig::boolean())?;
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Registry(_)));

        // The damaged file is left exactly as it was
        assert_eq!(std::fs::read_to_string(&path).unwrap(), contents);
        assert!(matches!(HabitRegistry::load_strict(&path), Err(Error::Registry(_))));
    }

    #[test]
    fn test_concurrent_updates_keep_every_habit() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("habits.json");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    HabitRegistry::update(&path, |registry| {
                        registry.add(&format!("habit-{}", i), HabitConfig::boolean())?;
                        Ok(())
                    })
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let loaded = HabitRegistry::load_strict(&path).unwrap();
        assert_eq!(loaded.habits.len(), 8);
        for i in 0..8 {
            assert!(loaded.find(&format!("habit-{}", i)).is_some());
        }
    }
}

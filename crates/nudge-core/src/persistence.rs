// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Nudge Household.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Persistence of score and streak counters.
//!
//! Counters are stored by unique id so they survive restarts. A missing
//! file or a missing id restores as 0.

use anyhow::{Context, Result};
use bevy_ecs::prelude::Resource;
use nudge_types::{UniqueId, config::DEFAULT_STATE_PATH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Last known value of every restorable counter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    #[serde(default)]
    pub counters: BTreeMap<UniqueId, u32>,
}

impl CounterSnapshot {
    /// Restored value, 0 when the counter was never saved
    pub fn value(&self, unique_id: &UniqueId) -> u32 {
        self.counters.get(unique_id).copied().unwrap_or(0)
    }

    pub fn set(&mut self, unique_id: UniqueId, value: u32) {
        self.counters.insert(unique_id, value);
    }
}

/// Counter persistence manager.
#[derive(Resource, Debug, Clone)]
pub struct CounterPersistence {
    state_path: PathBuf,
}

impl CounterPersistence {
    pub fn new(state_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.state_path
    }

    /// Load counters from disk.
    ///
    /// Returns an empty snapshot if the file doesn't exist.
    pub fn load(&self) -> Result<CounterSnapshot> {
        if !self.state_path.exists() {
            info!(
                "[SCORE] Counter file not found at {}, starting from zero",
                self.state_path.display()
            );
            return Ok(CounterSnapshot::default());
        }

        let contents = fs::read_to_string(&self.state_path).with_context(|| {
            format!("Failed to read counters from {}", self.state_path.display())
        })?;

        let snapshot: CounterSnapshot = serde_json::from_str(&contents).with_context(|| {
            format!("Failed to parse counters from {}", self.state_path.display())
        })?;

        info!(
            "📂 [SCORE] Restored {} counters from {}",
            snapshot.counters.len(),
            self.state_path.display()
        );

        Ok(snapshot)
    }

    /// Move an unreadable counter file aside so the next save cannot
    /// overwrite it. Returns the new location.
    pub fn quarantine(&self) -> Result<PathBuf> {
        let mut file_name = self
            .state_path
            .file_name()
            .map(ToOwned::to_owned)
            .with_context(|| format!("{} is not a file path", self.state_path.display()))?;
        file_name.push(".corrupt");
        let corrupt_path = self.state_path.with_file_name(file_name);

        fs::rename(&self.state_path, &corrupt_path).with_context(|| {
            format!(
                "Failed to move {} to {}",
                self.state_path.display(),
                corrupt_path.display()
            )
        })?;

        Ok(corrupt_path)
    }

    /// Save counters to disk.
    ///
    /// Uses atomic write (temp file + rename) to prevent corruption.
    pub fn save(&self, snapshot: &CounterSnapshot) -> Result<()> {
        if let Some(parent) = self.state_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let json =
            serde_json::to_string_pretty(snapshot).context("Failed to serialize counters")?;

        let temp_path = self.state_path.with_extension("tmp");
        fs::write(&temp_path, &json)
            .with_context(|| format!("Failed to write temp file {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.state_path).with_context(|| {
            format!(
                "Failed to rename temp file to {}",
                self.state_path.display()
            )
        })?;

        debug!(
            "[SCORE] Saved {} counters to {}",
            snapshot.counters.len(),
            self.state_path.display()
        );

        Ok(())
    }
}

impl Default for CounterPersistence {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudge_types::NudgeCategory;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = TempDir::new().unwrap();
        let persistence = CounterPersistence::new(dir.path().join("counters.json"));

        let snapshot = persistence.load().unwrap();
        assert!(snapshot.counters.is_empty());
        assert_eq!(
            snapshot.value(&UniqueId::score("abc", NudgeCategory::Water)),
            0
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("counters.json");
        let persistence = CounterPersistence::new(&path);

        let score = UniqueId::score("abc", NudgeCategory::Electricity);
        let streak = UniqueId::streak("abc", NudgeCategory::Electricity);
        let mut snapshot = CounterSnapshot::default();
        snapshot.set(score.clone(), 42);
        snapshot.set(streak.clone(), 6);

        persistence.save(&snapshot).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        let loaded = persistence.load().unwrap();
        assert_eq!(loaded.value(&score), 42);
        assert_eq!(loaded.value(&streak), 6);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counters.json");
        fs::write(&path, "{ not json").unwrap();

        let err = CounterPersistence::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse counters"));
    }

    #[test]
    fn test_quarantine_moves_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counters.json");
        fs::write(&path, "{ truncated").unwrap();
        let persistence = CounterPersistence::new(&path);

        assert!(persistence.load().is_err());
        let moved = persistence.quarantine().unwrap();

        assert_eq!(moved, dir.path().join("counters.json.corrupt"));
        assert_eq!(fs::read_to_string(&moved).unwrap(), "{ truncated");
        assert!(!path.exists());
        assert_eq!(persistence.load().unwrap(), CounterSnapshot::default());
    }
}

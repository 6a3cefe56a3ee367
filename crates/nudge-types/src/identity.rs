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

//! Stable identifiers of the entities a household exposes to the host.
//!
//! Ids are recorded at setup time and survive restarts. Cross-entity
//! references (score -> streak, total -> scores) store these ids and resolve
//! them to live handles only when needed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::{NudgeCategory, Period};

/// Host platform an entity is registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityDomain {
    /// Computed read-only sensors (budgets, autarky)
    Sensor,
    /// Restorable counters (score, streak, total)
    Number,
}

impl fmt::Display for EntityDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor => f.write_str("sensor"),
            Self::Number => f.write_str("number"),
        }
    }
}

/// Stable unique id of an entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueId(String);

impl UniqueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// `{entry}_{category}_{Period}`, e.g. `abc123_electricity_Daily`
    pub fn nudge(entry_id: &str, category: NudgeCategory, period: Period) -> Self {
        Self(format!("{entry_id}_{}_{}", category.key(), period.name()))
    }

    /// `{entry}_{CATEGORY}_Score`
    pub fn score(entry_id: &str, category: NudgeCategory) -> Self {
        Self(format!(
            "{entry_id}_{}_Score",
            category.key().to_uppercase()
        ))
    }

    /// `{entry}_{CATEGORY}_Streak`
    pub fn streak(entry_id: &str, category: NudgeCategory) -> Self {
        Self(format!(
            "{entry_id}_{}_Streak",
            category.key().to_uppercase()
        ))
    }

    /// `{entry}_total_score`
    pub fn total_score(entry_id: &str) -> Self {
        Self(format!("{entry_id}_total_score"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UniqueId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

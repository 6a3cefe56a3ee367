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

//! Host triggers and requests delivered to the household.
//!
//! The core keeps no timers; the host writes these messages when its own
//! schedules fire. Each message is applied exactly as received.

use bevy_ecs::prelude::*;
use chrono::{DateTime, Utc};
use nudge_types::{EntityDomain, NudgeCategory, UniqueId};

/// Refresh every budget sensor from the statistics store
#[derive(Message, Debug, Clone)]
pub struct EvaluationTick {
    pub at: DateTime<Utc>,
}

/// End of the local day: award points and advance streaks from the daily
/// sensors.
///
/// Write it at 23:59 local time, before the daily window rolls over. Only a
/// daily reading evaluated on the same local day as `at` counts.
#[derive(Message, Debug, Clone)]
pub struct DayBoundary {
    pub at: DateTime<Utc>,
}

/// New year: reset every score
#[derive(Message, Debug, Clone)]
pub struct YearBoundary {
    pub at: DateTime<Utc>,
}

/// Start a new tracking cycle, tightening budgets and raising autarky goals
#[derive(Message, Debug, Clone)]
pub struct CycleStart {
    /// Only this category, or all when `None`
    pub category: Option<NudgeCategory>,
}

/// Display-only rank pushed by the host
#[derive(Message, Debug, Clone)]
pub struct RankUpdate {
    pub target: UniqueId,
    pub domain: EntityDomain,
    pub position: u32,
    pub length: u32,
}

/// Manual set of a score or streak counter
#[derive(Message, Debug, Clone)]
pub struct SetCounter {
    pub target: UniqueId,
    pub value: f64,
}

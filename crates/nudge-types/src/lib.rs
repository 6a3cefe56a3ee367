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

pub mod category;
pub mod config;
pub mod errors;
pub mod goal;
pub mod identity;
pub mod score;
pub mod sources;
pub mod validation;

// Re-export common types for convenience
pub use category::{
    EnergyFlowKind, GoalPolarity, NudgeCategory, Period, SourceKind, StatisticGranularity,
};
pub use config::{
    AutarkySettings, BudgetSettings, HeatBudgetSettings, HeatSource, HouseholdInfo,
    NudgeSettings, SystemSettings,
};
pub use errors::{NudgeError, NudgeResult};
pub use goal::{BudgetReading, BudgetState, Goal, GoalSet, GuardReason, Tracking};
pub use identity::{EntityDomain, UniqueId};
pub use score::{Rank, ScoreState, StreakState, TotalScore};
pub use sources::{CONSUMPTION_FLOWS, EnergyEntities, EnergySource};
pub use validation::{ValidationIssue, ValidationResult, ValidationSeverity};

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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::category::{NudgeCategory, Period};
use crate::sources::EnergyEntities;

// ============= Goals =============

/// Target for one category over one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub category: NudgeCategory,
    pub period: Period,
    pub target: f64,
    pub unit: String,
}

impl Goal {
    pub fn new(category: NudgeCategory, period: Period, target: f64) -> Self {
        Self {
            category,
            period,
            target,
            unit: category.unit().to_owned(),
        }
    }
}

/// How the actual value of a goal is obtained each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tracking {
    /// Sum of the change of raw statistics (gas, heat pump, water, e-charger)
    Statistics { statistic_ids: Vec<String> },
    /// Own consumption from the categorised energy flows (electricity)
    OwnConsumption { entities: EnergyEntities },
    /// Own / total consumption ratio in percent (autarky)
    AutarkyRatio { entities: EnergyEntities },
}

impl Tracking {
    /// Every statistic id that has to be queried for this tracking
    pub fn statistic_ids(&self) -> Vec<String> {
        match self {
            Self::Statistics { statistic_ids } => statistic_ids.clone(),
            Self::OwnConsumption { entities } | Self::AutarkyRatio { entities } => {
                entities.flow_statistic_ids()
            }
        }
    }
}

/// Validated goals of one category, one per period.
///
/// Created by `configure`; the yearly target is the only value that ever
/// changes afterwards (tighten / raise at the start of a tracking cycle),
/// the per-period goals are re-derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSet {
    pub category: NudgeCategory,
    pub yearly_target: f64,
    /// Reduction percent for budgets, increase percent for autarky
    pub adjustment_percent: u8,
    pub goals: BTreeMap<Period, Goal>,
    pub tracking: Tracking,
}

impl GoalSet {
    pub fn goal(&self, period: Period) -> Option<&Goal> {
        self.goals.get(&period)
    }

    pub fn target(&self, period: Period) -> Option<f64> {
        self.goal(period).map(|goal| goal.target)
    }
}

// ============= Evaluation Results =============

/// Outcome of one evaluation of a (category, period) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetState {
    pub category: NudgeCategory,
    pub period: Period,
    pub goal: Goal,
    pub actual: f64,
    pub percent_of_goal: i64,
    pub reached: bool,
    pub last_update: DateTime<Utc>,
}

/// Why an evaluation produced no data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardReason {
    /// Goal target is zero or negative
    NonPositiveGoal,
    /// Actual or target is NaN or infinite
    NonFiniteInput,
}

impl fmt::Display for GuardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveGoal => f.write_str("goal is not positive"),
            Self::NonFiniteInput => f.write_str("input is not a finite number"),
        }
    }
}

/// Evaluation result, either a full state or a fail-closed sentinel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BudgetReading {
    Available(BudgetState),
    NoData {
        category: NudgeCategory,
        period: Period,
        reason: GuardReason,
        at: DateTime<Utc>,
    },
}

impl BudgetReading {
    pub fn state(&self) -> Option<&BudgetState> {
        match self {
            Self::Available(state) => Some(state),
            Self::NoData { .. } => None,
        }
    }

    /// A reading without data never counts as reached
    pub fn reached(&self) -> bool {
        self.state().is_some_and(|state| state.reached)
    }

    pub fn category(&self) -> NudgeCategory {
        match self {
            Self::Available(state) => state.category,
            Self::NoData { category, .. } => *category,
        }
    }

    pub fn period(&self) -> Period {
        match self {
            Self::Available(state) => state.period,
            Self::NoData { period, .. } => *period,
        }
    }

    /// Evaluation time of the reading
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Self::Available(state) => state.last_update,
            Self::NoData { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_is_never_reached() {
        let reading = BudgetReading::NoData {
            category: NudgeCategory::Water,
            period: Period::Daily,
            reason: GuardReason::NonPositiveGoal,
            at: Utc::now(),
        };
        assert!(!reading.reached());
        assert!(reading.state().is_none());
        assert_eq!(reading.category(), NudgeCategory::Water);
    }

    #[test]
    fn test_goal_unit_follows_category() {
        assert_eq!(Goal::new(NudgeCategory::Water, Period::Daily, 10.0).unit, "L");
        assert_eq!(Goal::new(NudgeCategory::Autarky, Period::Yearly, 50.0).unit, "%");
    }

    #[test]
    fn test_tracking_serialization() {
        let tracking = Tracking::Statistics {
            statistic_ids: vec!["sensor.gas".to_owned()],
        };
        let json = serde_json::to_value(&tracking).unwrap();
        assert_eq!(json["kind"], "statistics");
        assert_eq!(tracking.statistic_ids(), vec!["sensor.gas".to_owned()]);
    }
}

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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::NudgeError;

// ============= Nudge Category =============

/// Kinds of nudges a household can track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeCategory {
    /// Yearly electricity budget
    Electricity,
    /// Yearly heat budget (gas or heat pump)
    Heat,
    /// Yearly water budget
    Water,
    /// Self-sufficiency target
    Autarky,
    /// CO2 budget (no tracking source yet)
    #[serde(rename = "co2")]
    Co2,
    /// Money budget (no tracking source yet)
    Money,
    /// E-charger budget
    EMobility,
}

impl NudgeCategory {
    /// List all categories
    pub fn all() -> &'static [NudgeCategory] {
        &[
            Self::Electricity,
            Self::Heat,
            Self::Water,
            Self::Autarky,
            Self::Co2,
            Self::Money,
            Self::EMobility,
        ]
    }

    /// Get human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Electricity => "Electricity",
            Self::Heat => "Heat",
            Self::Water => "Water",
            Self::Autarky => "Autarky",
            Self::Co2 => "CO2",
            Self::Money => "Money",
            Self::EMobility => "E-Mobility",
        }
    }

    /// Stable key used in unique ids, wizard step ids and config files
    pub fn key(&self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::Heat => "heat",
            Self::Water => "water",
            Self::Autarky => "autarky",
            Self::Co2 => "co2",
            Self::Money => "money",
            Self::EMobility => "e_mobility",
        }
    }

    /// Unit of the goal and actual values
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Electricity | Self::Heat | Self::EMobility => "kWh",
            Self::Water => "L",
            Self::Autarky => "%",
            Self::Co2 => "kg",
            Self::Money => "EUR",
        }
    }

    /// Which direction counts as success for this category
    pub fn polarity(&self) -> GoalPolarity {
        match self {
            Self::Autarky => GoalPolarity::HigherIsBetter,
            Self::Electricity | Self::Heat | Self::Water | Self::Co2 | Self::Money | Self::EMobility => {
                GoalPolarity::LowerIsBetter
            }
        }
    }

    /// Whether a yearly goal is split across periods.
    /// Autarky is a ratio and keeps the same target for every period.
    pub fn is_budget(&self) -> bool {
        self.polarity() == GoalPolarity::LowerIsBetter
    }

    /// Whether any statistic can feed this category
    pub fn is_trackable(&self) -> bool {
        !matches!(self, Self::Co2 | Self::Money)
    }
}

impl fmt::Display for NudgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for NudgeCategory {
    type Err = NudgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|c| c.key() == normalized)
            .ok_or_else(|| NudgeError::InvalidInput {
                field: "category".to_owned(),
                message: format!(
                    "unknown nudge category '{s}', expected one of: {}",
                    Self::all()
                        .iter()
                        .map(NudgeCategory::key)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
    }
}

/// Direction in which a goal is met
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPolarity {
    /// Budgets: staying below the goal is a success
    LowerIsBetter,
    /// Autarky: exceeding the goal is a success
    HigherIsBetter,
}

impl GoalPolarity {
    /// Strict comparison, reaching the goal exactly does not count
    pub fn is_reached(&self, actual: f64, target: f64) -> bool {
        match self {
            Self::LowerIsBetter => actual < target,
            Self::HigherIsBetter => actual > target,
        }
    }
}

// ============= Period =============

/// Aggregation window for a goal/actual pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    pub fn all() -> &'static [Period] {
        &[Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly]
    }

    /// Name used in unique ids and entity names
    pub fn name(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    /// Bucket size requested from the statistics store.
    /// Yearly windows are summed from monthly buckets.
    pub fn statistic_granularity(&self) -> StatisticGranularity {
        match self {
            Self::Daily => StatisticGranularity::Day,
            Self::Weekly => StatisticGranularity::Week,
            Self::Monthly | Self::Yearly => StatisticGranularity::Month,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Bucket size of long-term statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatisticGranularity {
    Day,
    Week,
    Month,
}

impl StatisticGranularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

// ============= Energy Flows =============

/// Categorised energy flow used for own/total consumption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyFlowKind {
    GridImport,
    GridExport,
    BatteryImport,
    BatteryExport,
    SolarProduction,
    HeatPumpConsumption,
    EChargerConsumption,
}

impl EnergyFlowKind {
    pub fn all() -> &'static [EnergyFlowKind] {
        &[
            Self::GridImport,
            Self::GridExport,
            Self::BatteryImport,
            Self::BatteryExport,
            Self::SolarProduction,
            Self::HeatPumpConsumption,
            Self::EChargerConsumption,
        ]
    }
}

/// Type tag of a source in the energy dashboard configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Grid,
    Battery,
    Solar,
    Gas,
    Water,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Battery => "battery",
            Self::Solar => "solar",
            Self::Gas => "gas",
            Self::Water => "water",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

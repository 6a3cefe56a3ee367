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

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::NudgeCategory;

// ============= Input Ranges =============

/// Yearly budgets (kWh or liters)
pub const YEARLY_BUDGET_MIN: f64 = 1000.0;
pub const YEARLY_BUDGET_MAX: f64 = 10000.0;
/// kWh budgets are entered in steps of 100
pub const YEARLY_KWH_STEP: f64 = 100.0;
pub const REDUCTION_GOAL_MAX: u8 = 50;
pub const AUTARKY_GOAL_MIN: u8 = 1;
pub const AUTARKY_GOAL_MAX: u8 = 100;
pub const AUTARKY_INCREASE_MIN: u8 = 1;
pub const AUTARKY_INCREASE_MAX: u8 = 50;
pub const PERSONS_MIN: u32 = 1;
/// Final energy consumption in kWh/(m²a)
pub const ENERGY_EFFICIENCY_MAX: f64 = 250.0;
/// Apartment size in m²
pub const APARTMENT_SIZE_MIN: f64 = 10.0;
pub const APARTMENT_SIZE_MAX: f64 = 300.0;

pub const DEFAULT_STATE_PATH: &str = "./data/nudge_counters.json";
pub const DEFAULT_ENERGY_PREFS_PATH: &str = "/config/.storage/energy";

// ============= Household =============

/// How the household heats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatSource {
    Gas,
    /// Heat pump with its own energy sensor
    HeatPump,
    /// No heat energy sensor available
    #[default]
    None,
}

impl HeatSource {
    pub fn all() -> &'static [HeatSource] {
        &[Self::Gas, Self::HeatPump, Self::None]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gas => "Gas",
            Self::HeatPump => "Heat pump with energy sensor",
            Self::None => "No heat sensor",
        }
    }
}

impl fmt::Display for HeatSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Household information collected by the first wizard step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdInfo {
    pub name: String,
    #[serde(default)]
    pub persons: Option<u32>,
    /// Final energy consumption in kWh/(m²a)
    #[serde(default)]
    pub energy_efficiency: Option<f64>,
    /// Apartment size in m²
    #[serde(default)]
    pub apartment_size: Option<f64>,
    #[serde(default)]
    pub heat_source: HeatSource,
    /// Energy statistic of the e-charger, if any
    #[serde(default)]
    pub e_charger: Option<String>,
}

impl Default for HouseholdInfo {
    fn default() -> Self {
        Self {
            name: "Household".to_owned(),
            persons: None,
            energy_efficiency: None,
            apartment_size: None,
            heat_source: HeatSource::None,
            e_charger: None,
        }
    }
}

// ============= Nudge Settings =============

/// Yearly budget with the reduction applied at each new tracking cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSettings {
    pub yearly_goal: f64,
    #[serde(default)]
    pub reduction_goal_percent: u8,
}

/// Heat budget, optionally tracked through a heat pump energy statistic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatBudgetSettings {
    #[serde(flatten)]
    pub budget: BudgetSettings,
    #[serde(default)]
    pub heat_pump_statistic: Option<String>,
}

/// Self-sufficiency target with the increase applied at each new tracking cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutarkySettings {
    pub goal_percent: u8,
    #[serde(default = "default_autarky_increase")]
    pub increase_percent: u8,
}

fn default_autarky_increase() -> u8 {
    AUTARKY_INCREASE_MIN
}

/// Connection and storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSettings {
    /// Home Assistant base URL (optional, defaults to supervisor)
    #[serde(default)]
    pub ha_base_url: Option<String>,

    /// Home Assistant token (optional, uses SUPERVISOR_TOKEN if not set)
    #[serde(default)]
    pub ha_token: Option<String>,

    /// IANA timezone used for period windows (fetched from HA when unset)
    #[serde(default)]
    pub timezone: Option<String>,

    /// Where score and streak counters are persisted
    #[serde(default = "default_state_path")]
    pub state_path: String,

    /// Energy dashboard preferences file of the host
    #[serde(default = "default_energy_prefs_path")]
    pub energy_prefs_path: String,
}

fn default_state_path() -> String {
    DEFAULT_STATE_PATH.to_owned()
}

fn default_energy_prefs_path() -> String {
    DEFAULT_ENERGY_PREFS_PATH.to_owned()
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            ha_base_url: None,
            ha_token: None,
            timezone: None,
            state_path: default_state_path(),
            energy_prefs_path: default_energy_prefs_path(),
        }
    }
}

/// Complete configuration of one household entry
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NudgeSettings {
    /// Stable id of the configuration entry, prefix of every unique id
    pub entry_id: String,

    #[serde(default)]
    pub household: HouseholdInfo,

    #[serde(default)]
    pub electricity: Option<BudgetSettings>,

    #[serde(default)]
    pub heat: Option<HeatBudgetSettings>,

    #[serde(default)]
    pub water: Option<BudgetSettings>,

    #[serde(default)]
    pub autarky: Option<AutarkySettings>,

    #[serde(default)]
    pub e_mobility: Option<BudgetSettings>,

    #[serde(default)]
    pub system: SystemSettings,
}

impl Default for NudgeSettings {
    fn default() -> Self {
        Self {
            entry_id: "nudge_household".to_owned(),
            household: HouseholdInfo::default(),
            electricity: Some(BudgetSettings {
                yearly_goal: 3000.0,
                reduction_goal_percent: 0,
            }),
            heat: None,
            water: None,
            autarky: None,
            e_mobility: None,
            system: SystemSettings::default(),
        }
    }
}

impl NudgeSettings {
    /// Categories with settings present, in canonical order
    pub fn configured_categories(&self) -> Vec<NudgeCategory> {
        NudgeCategory::all()
            .iter()
            .copied()
            .filter(|category| match category {
                NudgeCategory::Electricity => self.electricity.is_some(),
                NudgeCategory::Heat => self.heat.is_some(),
                NudgeCategory::Water => self.water.is_some(),
                NudgeCategory::Autarky => self.autarky.is_some(),
                NudgeCategory::EMobility => self.e_mobility.is_some(),
                NudgeCategory::Co2 | NudgeCategory::Money => false,
            })
            .collect()
    }

    /// Budget settings of a lower-is-better category
    pub fn budget(&self, category: NudgeCategory) -> Option<&BudgetSettings> {
        match category {
            NudgeCategory::Electricity => self.electricity.as_ref(),
            NudgeCategory::Heat => self.heat.as_ref().map(|heat| &heat.budget),
            NudgeCategory::Water => self.water.as_ref(),
            NudgeCategory::EMobility => self.e_mobility.as_ref(),
            NudgeCategory::Autarky | NudgeCategory::Co2 | NudgeCategory::Money => None,
        }
    }
}

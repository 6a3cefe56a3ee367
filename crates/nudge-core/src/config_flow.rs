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

//! Multi-step setup wizard.
//!
//! The host renders the forms; this module decides which steps are shown,
//! validates each submission against the step's schema and accumulates the
//! entered data. A `ConfigFlow` is immutable: every accepted submission
//! returns a new flow with the merged data and the next step.

use nudge_types::{
    AutarkySettings, BudgetSettings, EnergySource, HeatBudgetSettings, HeatSource, HouseholdInfo,
    NudgeCategory, NudgeError, NudgeResult, NudgeSettings, SourceKind, SystemSettings,
    ValidationResult,
    config::{
        APARTMENT_SIZE_MAX, APARTMENT_SIZE_MIN, AUTARKY_GOAL_MAX, AUTARKY_GOAL_MIN,
        AUTARKY_INCREASE_MAX, AUTARKY_INCREASE_MIN, ENERGY_EFFICIENCY_MAX, PERSONS_MIN,
        REDUCTION_GOAL_MAX, YEARLY_BUDGET_MAX, YEARLY_BUDGET_MIN, YEARLY_KWH_STEP,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info};

use crate::energy_sources::{source_kinds, supported_categories};

/// Title of the created configuration entry
pub const ENTRY_TITLE: &str = "Nudge Household";

// ============= Data Keys =============

pub const KEY_NAME_HOUSEHOLD: &str = "name_household";
pub const KEY_PERSONS: &str = "number_persons";
pub const KEY_ENERGY_EFFICIENCY: &str = "final_energy_consumption";
pub const KEY_APARTMENT_SIZE: &str = "apartment_size";
pub const KEY_HEAT_SOURCE: &str = "heat_source";
pub const KEY_E_CHARGER: &str = "e_charger";
pub const KEY_HEAT_PUMP: &str = "heat_pump";
pub const KEY_AUTARKY_GOAL: &str = "goal_autarky";
pub const KEY_AUTARKY_INCREASE: &str = "autarky_goal_increase";

/// `budget_yearly_{category}`
pub fn yearly_budget_key(category: NudgeCategory) -> String {
    format!("budget_yearly_{}", category.key())
}

/// `budget_{category}_reduction_goal`
pub fn reduction_goal_key(category: NudgeCategory) -> String {
    format!("budget_{}_reduction_goal", category.key())
}

// ============= Steps =============

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    /// Household information
    User,
    /// Goal of one category
    Nudge(NudgeCategory),
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Nudge(category) => f.write_str(category.key()),
        }
    }
}

/// Input widget of a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number {
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
        unit: Option<String>,
    },
    Select {
        options: Vec<String>,
    },
    /// Energy statistic id chosen from the host's sensors
    Statistic,
}

/// One field of a step form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub key: String,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSchema {
    fn number(key: impl Into<String>, min: f64, max: Option<f64>, step: Option<f64>, unit: &str) -> Self {
        Self {
            key: key.into(),
            required: true,
            kind: FieldKind::Number {
                min: Some(min),
                max,
                step,
                unit: (!unit.is_empty()).then(|| unit.to_owned()),
            },
        }
    }

    fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Check a submitted value, returning the error message on rejection
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match &self.kind {
            FieldKind::Text => match value.as_str() {
                Some(text) if !text.trim().is_empty() => Ok(()),
                Some(_) => Err("must not be empty".to_owned()),
                None => Err("must be text".to_owned()),
            },
            FieldKind::Statistic => match value.as_str() {
                Some(id) if id.contains('.') => Ok(()),
                Some(id) => Err(format!("'{id}' is not a statistic id")),
                None => Err("must be a statistic id".to_owned()),
            },
            FieldKind::Select { options } => match value.as_str() {
                Some(option) if options.iter().any(|o| o == option) => Ok(()),
                _ => Err(format!("must be one of: {}", options.join(", "))),
            },
            FieldKind::Number {
                min, max, step, ..
            } => {
                let Some(number) = value.as_f64() else {
                    return Err("must be a number".to_owned());
                };
                if let Some(min) = min
                    && number < *min
                {
                    return Err(format!("must be at least {min}"));
                }
                if let Some(max) = max
                    && number > *max
                {
                    return Err(format!("must be at most {max}"));
                }
                if let Some(step) = step
                    && ((number - min.unwrap_or(0.0)) / step).fract() != 0.0
                {
                    return Err(format!("must be a multiple of {step}"));
                }
                Ok(())
            }
        }
    }
}

/// Form of one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSchema {
    pub step: StepId,
    pub fields: Vec<FieldSchema>,
}

impl StepSchema {
    /// Combine two fragments into a new schema; fields of `other` replace
    /// fields with the same key
    pub fn merge(&self, other: &StepSchema) -> StepSchema {
        let mut fields: Vec<FieldSchema> = self
            .fields
            .iter()
            .filter(|field| !other.fields.iter().any(|o| o.key == field.key))
            .cloned()
            .collect();
        fields.extend(other.fields.iter().cloned());
        StepSchema {
            step: self.step,
            fields,
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Validate a submission against every field of the form
    pub fn validate(&self, input: &ConfigData) -> ValidationResult {
        let mut result = ValidationResult::success();

        for field in &self.fields {
            match input.get(&field.key) {
                Some(Value::Null) | None if field.required => {
                    result.add_error(&field.key, "is required");
                }
                Some(Value::Null) | None => {}
                Some(value) => {
                    if let Err(message) = field.check(value) {
                        result.add_error(&field.key, message);
                    }
                }
            }
        }

        for key in input.keys() {
            if self.field(key).is_none() {
                result.add_warning(key, format!("not part of step '{}', ignored", self.step));
            }
        }

        result
    }
}

/// Schema of the household information step
pub fn household_schema() -> StepSchema {
    StepSchema {
        step: StepId::User,
        fields: vec![
            FieldSchema {
                key: KEY_NAME_HOUSEHOLD.to_owned(),
                required: true,
                kind: FieldKind::Text,
            },
            FieldSchema::number(KEY_PERSONS, f64::from(PERSONS_MIN), None, Some(1.0), "").optional(),
            FieldSchema::number(
                KEY_ENERGY_EFFICIENCY,
                0.0,
                Some(ENERGY_EFFICIENCY_MAX),
                None,
                "kWh/(m²a)",
            )
            .optional(),
            FieldSchema::number(
                KEY_APARTMENT_SIZE,
                APARTMENT_SIZE_MIN,
                Some(APARTMENT_SIZE_MAX),
                None,
                "m²",
            )
            .optional(),
            FieldSchema {
                key: KEY_HEAT_SOURCE.to_owned(),
                required: true,
                kind: FieldKind::Select {
                    options: HeatSource::all()
                        .iter()
                        .filter_map(|source| serde_json::to_value(source).ok())
                        .filter_map(|value| value.as_str().map(str::to_owned))
                        .collect(),
                },
            },
            FieldSchema {
                key: KEY_E_CHARGER.to_owned(),
                required: false,
                kind: FieldKind::Statistic,
            },
        ],
    }
}

/// Extra field of the heat step when the household heats with a heat pump
pub fn heat_pump_schema() -> StepSchema {
    StepSchema {
        step: StepId::Nudge(NudgeCategory::Heat),
        fields: vec![FieldSchema {
            key: KEY_HEAT_PUMP.to_owned(),
            required: true,
            kind: FieldKind::Statistic,
        }],
    }
}

/// Schema of the goal step of `category`
pub fn nudge_schema(category: NudgeCategory) -> StepSchema {
    let reduction = FieldSchema::number(
        reduction_goal_key(category),
        0.0,
        Some(f64::from(REDUCTION_GOAL_MAX)),
        Some(1.0),
        "%",
    );

    let fields = match category {
        NudgeCategory::Autarky => vec![
            FieldSchema::number(
                KEY_AUTARKY_GOAL,
                f64::from(AUTARKY_GOAL_MIN),
                Some(f64::from(AUTARKY_GOAL_MAX)),
                Some(1.0),
                "%",
            ),
            FieldSchema::number(
                KEY_AUTARKY_INCREASE,
                f64::from(AUTARKY_INCREASE_MIN),
                Some(f64::from(AUTARKY_INCREASE_MAX)),
                Some(1.0),
                "%",
            ),
        ],
        NudgeCategory::Water => vec![
            FieldSchema::number(
                yearly_budget_key(category),
                YEARLY_BUDGET_MIN,
                Some(YEARLY_BUDGET_MAX),
                None,
                category.unit(),
            ),
            reduction,
        ],
        NudgeCategory::Electricity
        | NudgeCategory::Heat
        | NudgeCategory::EMobility
        | NudgeCategory::Co2
        | NudgeCategory::Money => vec![
            FieldSchema::number(
                yearly_budget_key(category),
                YEARLY_BUDGET_MIN,
                Some(YEARLY_BUDGET_MAX),
                Some(YEARLY_KWH_STEP),
                category.unit(),
            ),
            reduction,
        ],
    };

    StepSchema {
        step: StepId::Nudge(category),
        fields,
    }
}

// ============= Data =============

/// Values entered so far, keyed by field key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigData(BTreeMap<String, Value>);

impl ConfigData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// New data with the entries of `other` layered on top
    pub fn merged(&self, other: &ConfigData) -> ConfigData {
        let mut data = self.0.clone();
        data.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        ConfigData(data)
    }

    /// Only the entries whose key appears in `schema`
    pub fn restricted_to(&self, schema: &StepSchema) -> ConfigData {
        ConfigData(
            self.0
                .iter()
                .filter(|(key, _)| schema.field(key).is_some())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Whole number that fits into `u32`
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn whole(&self, key: &str) -> Option<u32> {
        self.number(key)
            .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
            .map(|n| n as u32)
    }

    fn percent(&self, key: &str) -> Option<u8> {
        self.whole(key).and_then(|n| u8::try_from(n).ok())
    }
}

// ============= Flow =============

/// What the host should show next
#[derive(Debug, Clone, PartialEq)]
pub enum FlowStep {
    Form {
        step: StepId,
        schema: StepSchema,
        errors: ValidationResult,
    },
    CreateEntry {
        title: String,
        data: ConfigData,
    },
}

/// Immutable state of the setup wizard
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFlow {
    source_kinds: BTreeSet<SourceKind>,
    data: ConfigData,
    current: Option<StepId>,
    pending: Vec<NudgeCategory>,
}

impl ConfigFlow {
    /// Begin at the household step.
    ///
    /// `sources` is the energy dashboard configuration, `None` aborts the flow.
    pub fn start(sources: Option<&[EnergySource]>) -> NudgeResult<Self> {
        let Some(sources) = sources else {
            info!("🚫 [NUDGE] Setup aborted: energy dashboard not configured");
            return Err(NudgeError::EnergyNotConfigured);
        };

        Ok(Self {
            source_kinds: source_kinds(sources),
            data: ConfigData::new(),
            current: Some(StepId::User),
            pending: Vec::new(),
        })
    }

    pub fn data(&self) -> &ConfigData {
        &self.data
    }

    pub fn current_step(&self) -> Option<StepId> {
        self.current
    }

    pub fn is_complete(&self) -> bool {
        self.current.is_none()
    }

    fn uses_heat_pump(&self) -> bool {
        self.data.text(KEY_HEAT_SOURCE)
            == serde_json::to_value(HeatSource::HeatPump)
                .ok()
                .as_ref()
                .and_then(Value::as_str)
    }

    /// Schema of a step for this flow, the heat step includes the heat pump
    /// field when the household heats with one
    pub fn schema(&self, step: StepId) -> StepSchema {
        match step {
            StepId::User => household_schema(),
            StepId::Nudge(NudgeCategory::Heat) if self.uses_heat_pump() => {
                nudge_schema(NudgeCategory::Heat).merge(&heat_pump_schema())
            }
            StepId::Nudge(category) => nudge_schema(category),
        }
    }

    /// The form to show, or the entry to create once every step is done
    pub fn next(&self) -> FlowStep {
        self.render(ValidationResult::success())
    }

    fn render(&self, errors: ValidationResult) -> FlowStep {
        match self.current {
            Some(step) => FlowStep::Form {
                step,
                schema: self.schema(step),
                errors,
            },
            None => FlowStep::CreateEntry {
                title: ENTRY_TITLE.to_owned(),
                data: self.data.clone(),
            },
        }
    }

    /// Submit the input of the current step.
    ///
    /// On success returns the flow advanced to the next step; on rejection
    /// returns the field errors and the current flow stays valid.
    pub fn submit(&self, step: StepId, input: &ConfigData) -> Result<ConfigFlow, ValidationResult> {
        if self.current != Some(step) {
            let mut result = ValidationResult::success();
            result.add_error(
                "step",
                format!(
                    "expected step '{}', got '{step}'",
                    self.current.map_or_else(|| "none".to_owned(), |s| s.to_string())
                ),
            );
            return Err(result);
        }

        let schema = self.schema(step);
        let result = schema.validate(input);
        if result.has_errors() {
            debug!(
                "[NUDGE] Step '{step}' rejected: {} error(s)",
                result.errors.len()
            );
            return Err(result);
        }

        let data = self.data.merged(&input.restricted_to(&schema));
        let mut next = ConfigFlow {
            source_kinds: self.source_kinds.clone(),
            data,
            current: None,
            pending: self.pending.clone(),
        };

        if step == StepId::User {
            let household = household_from(&next.data);
            next.pending = supported_categories(&next.source_kinds, &household)
                .into_iter()
                .collect();
            info!(
                "🏠 [NUDGE] Household '{}' supports: {}",
                household.name,
                next.pending
                    .iter()
                    .map(NudgeCategory::key)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        if !next.pending.is_empty() {
            let category = next.pending.remove(0);
            next.current = Some(StepId::Nudge(category));
        }

        Ok(next)
    }

    /// Settings of the finished flow
    pub fn into_settings(self, entry_id: impl Into<String>) -> NudgeResult<NudgeSettings> {
        if !self.is_complete() {
            return Err(NudgeError::InvalidInput {
                field: "step".to_owned(),
                message: "setup is not finished".to_owned(),
            });
        }
        settings_from(&self.data, entry_id.into())
    }
}

fn household_from(data: &ConfigData) -> HouseholdInfo {
    HouseholdInfo {
        name: data.text(KEY_NAME_HOUSEHOLD).unwrap_or_default().to_owned(),
        persons: data.whole(KEY_PERSONS),
        energy_efficiency: data.number(KEY_ENERGY_EFFICIENCY),
        apartment_size: data.number(KEY_APARTMENT_SIZE),
        heat_source: data
            .get(KEY_HEAT_SOURCE)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default(),
        e_charger: data.text(KEY_E_CHARGER).map(str::to_owned),
    }
}

fn budget_from(data: &ConfigData, category: NudgeCategory) -> Option<BudgetSettings> {
    Some(BudgetSettings {
        yearly_goal: data.number(&yearly_budget_key(category))?,
        reduction_goal_percent: data.percent(&reduction_goal_key(category)).unwrap_or(0),
    })
}

/// Settings from entered data
pub fn settings_from(data: &ConfigData, entry_id: String) -> NudgeResult<NudgeSettings> {
    let household = household_from(data);
    if household.name.trim().is_empty() {
        return Err(NudgeError::InvalidInput {
            field: KEY_NAME_HOUSEHOLD.to_owned(),
            message: "household name is required".to_owned(),
        });
    }

    let autarky = data
        .percent(KEY_AUTARKY_GOAL)
        .map(|goal_percent| AutarkySettings {
            goal_percent,
            increase_percent: data
                .percent(KEY_AUTARKY_INCREASE)
                .unwrap_or(AUTARKY_INCREASE_MIN),
        });

    Ok(NudgeSettings {
        entry_id,
        electricity: budget_from(data, NudgeCategory::Electricity),
        heat: budget_from(data, NudgeCategory::Heat).map(|budget| HeatBudgetSettings {
            budget,
            heat_pump_statistic: data.text(KEY_HEAT_PUMP).map(str::to_owned),
        }),
        water: budget_from(data, NudgeCategory::Water),
        autarky,
        e_mobility: budget_from(data, NudgeCategory::EMobility),
        household,
        system: SystemSettings::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Vec<EnergySource> {
        vec![
            EnergySource::new(SourceKind::Grid).with_from("sensor.grid_in"),
            EnergySource::new(SourceKind::Solar).with_from("sensor.pv"),
        ]
    }

    fn household(heat_source: &str) -> ConfigData {
        ConfigData::new()
            .with(KEY_NAME_HOUSEHOLD, "Novák")
            .with(KEY_PERSONS, 3)
            .with(KEY_HEAT_SOURCE, heat_source)
    }

    #[test]
    fn test_unconfigured_energy_dashboard_aborts() {
        assert_eq!(ConfigFlow::start(None), Err(NudgeError::EnergyNotConfigured));
    }

    #[test]
    fn test_full_flow() {
        let flow = ConfigFlow::start(Some(&sources())).unwrap();
        assert_eq!(flow.current_step(), Some(StepId::User));

        let flow = flow.submit(StepId::User, &household("none")).unwrap();
        assert_eq!(
            flow.current_step(),
            Some(StepId::Nudge(NudgeCategory::Electricity))
        );

        let flow = flow
            .submit(
                StepId::Nudge(NudgeCategory::Electricity),
                &ConfigData::new()
                    .with(yearly_budget_key(NudgeCategory::Electricity), 3500)
                    .with(reduction_goal_key(NudgeCategory::Electricity), 5),
            )
            .unwrap();
        assert_eq!(
            flow.current_step(),
            Some(StepId::Nudge(NudgeCategory::Autarky))
        );

        let flow = flow
            .submit(
                StepId::Nudge(NudgeCategory::Autarky),
                &ConfigData::new()
                    .with(KEY_AUTARKY_GOAL, 40)
                    .with(KEY_AUTARKY_INCREASE, 5),
            )
            .unwrap();
        assert!(flow.is_complete());
        assert!(matches!(flow.next(), FlowStep::CreateEntry { ref title, .. } if title == ENTRY_TITLE));

        let settings = flow.into_settings("entry1").unwrap();
        assert_eq!(settings.household.persons, Some(3));
        assert_eq!(
            settings.electricity,
            Some(BudgetSettings {
                yearly_goal: 3500.0,
                reduction_goal_percent: 5,
            })
        );
        assert_eq!(settings.autarky.unwrap().goal_percent, 40);
        assert!(settings.heat.is_none());
    }

    #[test]
    fn test_rejected_input_keeps_flow() {
        let flow = ConfigFlow::start(Some(&sources()))
            .unwrap()
            .submit(StepId::User, &household("gas"))
            .unwrap();

        let errors = flow
            .submit(
                StepId::Nudge(NudgeCategory::Electricity),
                &ConfigData::new()
                    .with(yearly_budget_key(NudgeCategory::Electricity), 950)
                    .with(reduction_goal_key(NudgeCategory::Electricity), 60),
            )
            .unwrap_err();
        assert_eq!(
            errors.errors_for("budget_yearly_electricity"),
            vec!["must be at least 1000"]
        );
        assert_eq!(
            errors.errors_for("budget_electricity_reduction_goal"),
            vec!["must be at most 50"]
        );
        assert_eq!(
            flow.current_step(),
            Some(StepId::Nudge(NudgeCategory::Electricity))
        );
    }

    #[test]
    fn test_kwh_budget_step() {
        let schema = nudge_schema(NudgeCategory::Electricity);
        let field = schema.field("budget_yearly_electricity").unwrap();
        assert!(field.check(&Value::from(3400)).is_ok());
        assert_eq!(
            field.check(&Value::from(3450)),
            Err("must be a multiple of 100".to_owned())
        );

        // Water has no step
        let schema = nudge_schema(NudgeCategory::Water);
        assert!(
            schema
                .field("budget_yearly_water")
                .unwrap()
                .check(&Value::from(3456))
                .is_ok()
        );
    }

    #[test]
    fn test_heat_pump_adds_field_without_touching_base_schema() {
        let flow = ConfigFlow::start(Some(&sources()))
            .unwrap()
            .submit(StepId::User, &household("heat_pump"))
            .unwrap()
            .submit(
                StepId::Nudge(NudgeCategory::Electricity),
                &ConfigData::new()
                    .with(yearly_budget_key(NudgeCategory::Electricity), 3000)
                    .with(reduction_goal_key(NudgeCategory::Electricity), 5),
            )
            .unwrap();

        assert_eq!(flow.current_step(), Some(StepId::Nudge(NudgeCategory::Heat)));
        let schema = flow.schema(StepId::Nudge(NudgeCategory::Heat));
        assert!(schema.field(KEY_HEAT_PUMP).is_some());
        assert!(nudge_schema(NudgeCategory::Heat).field(KEY_HEAT_PUMP).is_none());

        let missing = flow
            .submit(
                StepId::Nudge(NudgeCategory::Heat),
                &ConfigData::new().with(yearly_budget_key(NudgeCategory::Heat), 4000),
            )
            .unwrap_err();
        assert_eq!(missing.errors_for(KEY_HEAT_PUMP), vec!["is required"]);

        let flow = flow
            .submit(
                StepId::Nudge(NudgeCategory::Heat),
                &ConfigData::new()
                    .with(yearly_budget_key(NudgeCategory::Heat), 4000)
                    .with(reduction_goal_key(NudgeCategory::Heat), 10)
                    .with(KEY_HEAT_PUMP, "sensor.heat_pump_energy"),
            )
            .unwrap();
        assert_eq!(
            flow.current_step(),
            Some(StepId::Nudge(NudgeCategory::Autarky))
        );
    }

    #[test]
    fn test_wrong_step_is_rejected() {
        let flow = ConfigFlow::start(Some(&sources())).unwrap();
        let result = flow
            .submit(StepId::Nudge(NudgeCategory::Water), &ConfigData::new())
            .unwrap_err();
        assert!(result.has_errors());
        assert!(flow.into_settings("entry").is_err());
    }

    #[test]
    fn test_household_validation() {
        let result = household_schema().validate(
            &ConfigData::new()
                .with(KEY_NAME_HOUSEHOLD, "")
                .with(KEY_APARTMENT_SIZE, 5)
                .with(KEY_HEAT_SOURCE, "coal"),
        );
        assert_eq!(result.errors_for(KEY_NAME_HOUSEHOLD), vec!["must not be empty"]);
        assert_eq!(result.errors_for(KEY_APARTMENT_SIZE), vec!["must be at least 10"]);
        assert_eq!(
            result.errors_for(KEY_HEAT_SOURCE),
            vec!["must be one of: gas, heat_pump, none"]
        );
    }
}

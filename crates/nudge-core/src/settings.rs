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

//! Loading, validation and saving of household settings.

use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use nudge_types::{
    BudgetSettings, HeatSource, NudgeCategory, NudgeSettings, ValidationResult,
    config::{
        APARTMENT_SIZE_MAX, APARTMENT_SIZE_MIN, AUTARKY_GOAL_MAX, AUTARKY_GOAL_MIN,
        AUTARKY_INCREASE_MAX, AUTARKY_INCREASE_MIN, ENERGY_EFFICIENCY_MAX, PERSONS_MIN,
        REDUCTION_GOAL_MAX, YEARLY_BUDGET_MAX, YEARLY_BUDGET_MIN,
    },
};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// HA addon options
const ADDON_OPTIONS_PATH: &str = "/data/options.json";

/// Load settings from the first source found:
/// HA addon options, `nudge.toml`, `nudge.json`, then defaults with
/// environment overrides
pub fn load() -> Result<NudgeSettings> {
    for path in [ADDON_OPTIONS_PATH, "nudge.toml", "nudge.json"] {
        if Path::new(path).exists() {
            return load_from(path);
        }
    }

    warn!("No settings file found, using defaults with environment overrides");
    let settings = from_env();
    validate(&settings)?;
    Ok(settings)
}

/// Load settings from a TOML or JSON file, chosen by extension
pub fn load_from(path: impl AsRef<Path>) -> Result<NudgeSettings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;

    let settings: NudgeSettings = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?,
        _ => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?,
    };

    info!("✅ Loaded settings from {}", path.display());
    validate(&settings)?;
    Ok(settings)
}

/// Defaults with environment variable overrides (development/testing)
pub fn from_env() -> NudgeSettings {
    let mut settings = NudgeSettings::default();

    if let Ok(url) = std::env::var("HA_BASE_URL") {
        settings.system.ha_base_url = Some(url);
    }
    if let Ok(token) = std::env::var("HA_TOKEN") {
        settings.system.ha_token = Some(token);
    }
    if let Ok(path) = std::env::var("NUDGE_STATE_PATH") {
        settings.system.state_path = path;
    }

    settings
}

/// Save settings as pretty JSON
///
/// Uses atomic write (temp file + rename) to prevent corruption.
pub fn save(settings: &NudgeSettings, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, &json)
        .with_context(|| format!("Failed to write temp file {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to {}", path.display()))?;

    info!("💾 Saved settings to {}", path.display());
    Ok(())
}

/// Validate settings, failing on the first report with errors
pub fn validate(settings: &NudgeSettings) -> Result<()> {
    let result = validate_detailed(settings);

    for warning in &result.warnings {
        warn!("⚠️ Settings: {}: {}", warning.field, warning.message);
    }

    if result.has_errors() {
        let messages: Vec<String> = result
            .errors
            .iter()
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .collect();
        bail!("Invalid settings: {}", messages.join("; "));
    }

    Ok(())
}

/// Validate settings with field-level errors and warnings
pub fn validate_detailed(settings: &NudgeSettings) -> ValidationResult {
    let mut result = ValidationResult::success();

    if settings.entry_id.trim().is_empty() {
        result.add_error("entry_id", "Entry id must not be empty");
    }

    // ============= Household =============
    let household = &settings.household;
    if household.name.trim().is_empty() {
        result.add_error("household.name", "Household name must not be empty");
    }
    if let Some(persons) = household.persons
        && persons < PERSONS_MIN
    {
        result.add_error(
            "household.persons",
            format!("Persons must be at least {PERSONS_MIN}, got {persons}"),
        );
    }
    if let Some(efficiency) = household.energy_efficiency
        && !(0.0..=ENERGY_EFFICIENCY_MAX).contains(&efficiency)
    {
        result.add_error(
            "household.energy_efficiency",
            format!("Final energy consumption must be 0-{ENERGY_EFFICIENCY_MAX} kWh/(m²a), got {efficiency}"),
        );
    }
    if let Some(size) = household.apartment_size
        && !(APARTMENT_SIZE_MIN..=APARTMENT_SIZE_MAX).contains(&size)
    {
        result.add_error(
            "household.apartment_size",
            format!("Apartment size must be {APARTMENT_SIZE_MIN}-{APARTMENT_SIZE_MAX} m², got {size}"),
        );
    }

    // ============= Budgets =============
    for category in settings.configured_categories() {
        if let Some(budget) = settings.budget(category) {
            validate_budget(&mut result, category, budget);
        }
    }

    if let Some(heat) = &settings.heat
        && household.heat_source == HeatSource::HeatPump
        && heat.heat_pump_statistic.is_none()
    {
        result.add_error(
            "heat.heat_pump_statistic",
            "Heat pump households must name the heat pump energy statistic",
        );
    }

    if settings.e_mobility.is_some() && household.e_charger.is_none() {
        result.add_error(
            "household.e_charger",
            "E-mobility budget needs the e-charger energy statistic",
        );
    }

    // ============= Autarky =============
    if let Some(autarky) = &settings.autarky {
        if !(AUTARKY_GOAL_MIN..=AUTARKY_GOAL_MAX).contains(&autarky.goal_percent) {
            result.add_error(
                "autarky.goal_percent",
                format!(
                    "Autarky goal must be {AUTARKY_GOAL_MIN}-{AUTARKY_GOAL_MAX}%, got {}%",
                    autarky.goal_percent
                ),
            );
        }
        if !(AUTARKY_INCREASE_MIN..=AUTARKY_INCREASE_MAX).contains(&autarky.increase_percent) {
            result.add_error(
                "autarky.increase_percent",
                format!(
                    "Autarky increase must be {AUTARKY_INCREASE_MIN}-{AUTARKY_INCREASE_MAX}%, got {}%",
                    autarky.increase_percent
                ),
            );
        }
    }

    if settings.configured_categories().is_empty() {
        result.add_warning("", "No nudge category configured, nothing will be tracked");
    }

    // ============= System =============
    let system = &settings.system;
    if let Some(url) = &system.ha_base_url
        && !url.starts_with("http://")
        && !url.starts_with("https://")
    {
        result.add_error(
            "system.ha_base_url",
            format!("Home Assistant URL must start with http:// or https://, got '{url}'"),
        );
    }
    if let Some(timezone) = &system.timezone
        && timezone.parse::<Tz>().is_err()
    {
        result.add_warning(
            "system.timezone",
            format!("Unknown timezone '{timezone}', period windows will use UTC"),
        );
    }
    if system.state_path.trim().is_empty() {
        result.add_error("system.state_path", "State path must not be empty");
    }

    result
}

fn validate_budget(result: &mut ValidationResult, category: NudgeCategory, budget: &BudgetSettings) {
    let field = |name: &str| format!("{}.{name}", category.key());

    if !budget.yearly_goal.is_finite() || budget.yearly_goal <= 0.0 {
        result.add_error(
            field("yearly_goal"),
            format!("Yearly goal must be positive, got {}", budget.yearly_goal),
        );
    } else if !(YEARLY_BUDGET_MIN..=YEARLY_BUDGET_MAX).contains(&budget.yearly_goal) {
        result.add_warning(
            field("yearly_goal"),
            format!(
                "Yearly goal {} {} is outside the usual {YEARLY_BUDGET_MIN}-{YEARLY_BUDGET_MAX}",
                budget.yearly_goal,
                category.unit()
            ),
        );
    }

    if budget.reduction_goal_percent > REDUCTION_GOAL_MAX {
        result.add_error(
            field("reduction_goal_percent"),
            format!(
                "Reduction goal must be 0-{REDUCTION_GOAL_MAX}%, got {}%",
                budget.reduction_goal_percent
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudge_types::{AutarkySettings, HeatBudgetSettings};
    use tempfile::TempDir;

    #[test]
    fn test_default_settings_are_valid() {
        let result = validate_detailed(&NudgeSettings::default());
        assert!(result.valid, "{:?}", result.errors);
        assert!(validate(&NudgeSettings::default()).is_ok());
    }

    #[test]
    fn test_invalid_budget_and_autarky() {
        let settings = NudgeSettings {
            electricity: Some(BudgetSettings {
                yearly_goal: 0.0,
                reduction_goal_percent: 60,
            }),
            autarky: Some(AutarkySettings {
                goal_percent: 0,
                increase_percent: 51,
            }),
            ..NudgeSettings::default()
        };

        let result = validate_detailed(&settings);
        assert_eq!(result.errors_for("electricity.yearly_goal").len(), 1);
        assert_eq!(result.errors_for("electricity.reduction_goal_percent").len(), 1);
        assert_eq!(result.errors_for("autarky.goal_percent").len(), 1);
        assert_eq!(result.errors_for("autarky.increase_percent").len(), 1);

        let err = validate(&settings).unwrap_err();
        assert!(err.to_string().starts_with("Invalid settings: "));
    }

    #[test]
    fn test_heat_pump_needs_statistic() {
        let mut settings = NudgeSettings::default();
        settings.household.heat_source = HeatSource::HeatPump;
        settings.heat = Some(HeatBudgetSettings {
            budget: BudgetSettings {
                yearly_goal: 5000.0,
                reduction_goal_percent: 0,
            },
            heat_pump_statistic: None,
        });

        let result = validate_detailed(&settings);
        assert_eq!(
            result.errors_for("heat.heat_pump_statistic"),
            vec!["Heat pump households must name the heat pump energy statistic"]
        );
    }

    #[test]
    fn test_out_of_range_goal_is_a_warning() {
        let settings = NudgeSettings {
            electricity: Some(BudgetSettings {
                yearly_goal: 12000.0,
                reduction_goal_percent: 0,
            }),
            ..NudgeSettings::default()
        };
        let result = validate_detailed(&settings);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nudge.json");
        let mut settings = NudgeSettings::default();
        settings.household.name = "Dvořák".to_owned();
        settings.system.timezone = Some("Europe/Prague".to_owned());

        save(&settings, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nudge.toml");
        fs::write(
            &path,
            r#"
            entry_id = "house1"

            [household]
            name = "Home"

            [water]
            yearly_goal = 40000.0
            "#,
        )
        .unwrap();

        let settings = load_from(&path).unwrap();
        assert_eq!(settings.entry_id, "house1");
        assert!(settings.electricity.is_none());
        assert_eq!(
            settings.configured_categories(),
            vec![NudgeCategory::Water]
        );
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nudge.json");
        fs::write(&path, r#"{"entry_id": "x", "water": {"yearly_goal": -5.0}}"#).unwrap();
        assert!(load_from(&path).is_err());
    }
}

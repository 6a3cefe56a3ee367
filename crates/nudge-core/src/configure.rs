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

//! Validated goal sets from user input.

use nudge_types::{
    CONSUMPTION_FLOWS, EnergyEntities, EnergyFlowKind, EnergySource, Goal, GoalSet, NudgeCategory,
    NudgeError, NudgeResult, NudgeSettings, Tracking,
    config::{AUTARKY_GOAL_MAX, AUTARKY_INCREASE_MAX, REDUCTION_GOAL_MAX},
};
use tracing::info;

use crate::decomposer::{decompose, uniform};
use crate::energy_sources::{energy_entities, with_household};

/// Build the goal set of one category.
///
/// `yearly_goal` is the yearly budget, or the goal percent for autarky.
/// `adjustment_percent` is the reduction per cycle for budgets (0..=50), or
/// the increase per cycle for autarky. The category's prerequisite source
/// must be present in `entities`.
pub fn configure(
    category: NudgeCategory,
    yearly_goal: f64,
    adjustment_percent: u8,
    entities: &EnergyEntities,
) -> NudgeResult<GoalSet> {
    if !category.is_trackable() {
        return Err(NudgeError::Untracked(category));
    }

    let targets = if category.is_budget() {
        if adjustment_percent > REDUCTION_GOAL_MAX {
            return Err(NudgeError::ReductionOutOfRange {
                value: adjustment_percent,
                max: REDUCTION_GOAL_MAX,
            });
        }
        decompose(yearly_goal)?
    } else {
        if yearly_goal > f64::from(AUTARKY_GOAL_MAX) {
            return Err(NudgeError::InvalidInput {
                field: "goal_percent".to_owned(),
                message: format!("autarky goal cannot exceed {AUTARKY_GOAL_MAX}%, got {yearly_goal}%"),
            });
        }
        if adjustment_percent > AUTARKY_INCREASE_MAX {
            return Err(NudgeError::InvalidInput {
                field: "increase_percent".to_owned(),
                message: format!(
                    "autarky increase must be at most {AUTARKY_INCREASE_MAX}%, got {adjustment_percent}%"
                ),
            });
        }
        uniform(yearly_goal)?
    };

    let tracking = tracking_for(category, entities)?;

    info!(
        "✅ [NUDGE] Configured {category}: yearly goal {yearly_goal} {}, adjustment {adjustment_percent}%",
        category.unit()
    );

    Ok(GoalSet {
        category,
        yearly_target: yearly_goal,
        adjustment_percent,
        goals: targets
            .into_iter()
            .map(|(period, target)| (period, Goal::new(category, period, target)))
            .collect(),
        tracking,
    })
}

/// How the actual value of `category` is obtained, or which source is missing
fn tracking_for(category: NudgeCategory, entities: &EnergyEntities) -> NudgeResult<Tracking> {
    let missing = |required: &str| NudgeError::MissingSource {
        category,
        required: required.to_owned(),
    };

    match category {
        NudgeCategory::Electricity => {
            if entities.flow(EnergyFlowKind::GridImport).is_none()
                && entities.flow(EnergyFlowKind::GridExport).is_none()
            {
                return Err(missing("grid"));
            }
            Ok(Tracking::OwnConsumption {
                entities: consumption_only(entities),
            })
        }
        NudgeCategory::Autarky => {
            if entities.flow(EnergyFlowKind::SolarProduction).is_none() {
                return Err(missing("solar"));
            }
            Ok(Tracking::AutarkyRatio {
                entities: consumption_only(entities),
            })
        }
        NudgeCategory::Heat => {
            let statistic_ids: Vec<String> = entities
                .gas
                .iter()
                .cloned()
                .chain(
                    entities
                        .flow(EnergyFlowKind::HeatPumpConsumption)
                        .map(str::to_owned),
                )
                .collect();
            if statistic_ids.is_empty() {
                return Err(missing("gas or heat pump"));
            }
            Ok(Tracking::Statistics { statistic_ids })
        }
        NudgeCategory::Water => entities
            .water
            .clone()
            .map(|id| Tracking::Statistics {
                statistic_ids: vec![id],
            })
            .ok_or_else(|| missing("water")),
        NudgeCategory::EMobility => entities
            .flow(EnergyFlowKind::EChargerConsumption)
            .map(|id| Tracking::Statistics {
                statistic_ids: vec![id.to_owned()],
            })
            .ok_or_else(|| missing("e-charger")),
        NudgeCategory::Co2 | NudgeCategory::Money => Err(NudgeError::Untracked(category)),
    }
}

/// Keep only the flows used by the consumption aggregation
fn consumption_only(entities: &EnergyEntities) -> EnergyEntities {
    EnergyEntities {
        flows: entities
            .flows
            .iter()
            .filter(|(kind, _)| CONSUMPTION_FLOWS.contains(kind))
            .map(|(kind, id)| (*kind, id.clone()))
            .collect(),
        gas: None,
        water: None,
    }
}

/// Goal sets of every category configured in `settings`.
///
/// The first invalid category aborts the whole configuration.
pub fn configure_household(
    settings: &NudgeSettings,
    sources: &[EnergySource],
) -> NudgeResult<Vec<GoalSet>> {
    let mut entities = with_household(energy_entities(sources), &settings.household);
    if let Some(heat_pump) = settings
        .heat
        .as_ref()
        .and_then(|heat| heat.heat_pump_statistic.clone())
    {
        entities
            .flows
            .insert(EnergyFlowKind::HeatPumpConsumption, heat_pump);
    }

    let mut goal_sets = Vec::new();
    for category in settings.configured_categories() {
        let goal_set = match (category, &settings.autarky) {
            (NudgeCategory::Autarky, Some(autarky)) => configure(
                category,
                f64::from(autarky.goal_percent),
                autarky.increase_percent,
                &entities,
            )?,
            _ => {
                let Some(budget) = settings.budget(category) else {
                    continue;
                };
                configure(
                    category,
                    budget.yearly_goal,
                    budget.reduction_goal_percent,
                    &entities,
                )?
            }
        };
        goal_sets.push(goal_set);
    }

    Ok(goal_sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudge_types::{
        AutarkySettings, BudgetSettings, HeatBudgetSettings, Period, SourceKind,
    };

    fn grid_and_solar() -> EnergyEntities {
        energy_entities(&[
            EnergySource::new(SourceKind::Grid)
                .with_from("sensor.grid_in")
                .with_to("sensor.grid_out"),
            EnergySource::new(SourceKind::Solar).with_from("sensor.pv"),
        ])
    }

    #[test]
    fn test_configure_electricity() {
        let set = configure(NudgeCategory::Electricity, 3650.0, 10, &grid_and_solar()).unwrap();
        assert_eq!(set.yearly_target, 3650.0);
        assert!((set.target(Period::Daily).unwrap() - 10.0).abs() < 1e-12);
        assert!(matches!(set.tracking, Tracking::OwnConsumption { .. }));
        assert_eq!(set.goal(Period::Weekly).unwrap().unit, "kWh");
    }

    #[test]
    fn test_configure_rejects_invalid_numbers() {
        let entities = grid_and_solar();
        assert_eq!(
            configure(NudgeCategory::Electricity, 0.0, 10, &entities),
            Err(NudgeError::NonPositiveGoal(0.0))
        );
        assert_eq!(
            configure(NudgeCategory::Electricity, 3000.0, 51, &entities),
            Err(NudgeError::ReductionOutOfRange { value: 51, max: 50 })
        );
        assert!(configure(NudgeCategory::Electricity, 3000.0, 50, &entities).is_ok());
    }

    #[test]
    fn test_configure_requires_sources() {
        let entities = grid_and_solar();
        assert_eq!(
            configure(NudgeCategory::Heat, 4000.0, 5, &entities),
            Err(NudgeError::MissingSource {
                category: NudgeCategory::Heat,
                required: "gas or heat pump".to_owned(),
            })
        );
        assert!(configure(NudgeCategory::Water, 4000.0, 5, &entities).is_err());
        assert_eq!(
            configure(NudgeCategory::Money, 4000.0, 5, &entities),
            Err(NudgeError::Untracked(NudgeCategory::Money))
        );
        assert_eq!(
            configure(NudgeCategory::Co2, 4000.0, 5, &entities),
            Err(NudgeError::Untracked(NudgeCategory::Co2))
        );
    }

    #[test]
    fn test_autarky_goal_is_uniform() {
        let set = configure(NudgeCategory::Autarky, 40.0, 5, &grid_and_solar()).unwrap();
        for period in Period::all() {
            assert_eq!(set.target(*period), Some(40.0));
        }
        assert!(configure(NudgeCategory::Autarky, 120.0, 5, &grid_and_solar()).is_err());
    }

    #[test]
    fn test_configure_household_with_heat_pump() {
        let settings = NudgeSettings {
            electricity: Some(BudgetSettings {
                yearly_goal: 3000.0,
                reduction_goal_percent: 5,
            }),
            heat: Some(HeatBudgetSettings {
                budget: BudgetSettings {
                    yearly_goal: 5000.0,
                    reduction_goal_percent: 0,
                },
                heat_pump_statistic: Some("sensor.heat_pump".to_owned()),
            }),
            autarky: Some(AutarkySettings {
                goal_percent: 30,
                increase_percent: 5,
            }),
            ..NudgeSettings::default()
        };
        let sources = vec![
            EnergySource::new(SourceKind::Grid).with_from("sensor.grid_in"),
            EnergySource::new(SourceKind::Solar).with_from("sensor.pv"),
        ];

        let sets = configure_household(&settings, &sources).unwrap();
        let categories: Vec<_> = sets.iter().map(|set| set.category).collect();
        assert_eq!(
            categories,
            vec![
                NudgeCategory::Electricity,
                NudgeCategory::Heat,
                NudgeCategory::Autarky
            ]
        );
        assert_eq!(
            sets[1].tracking.statistic_ids(),
            vec!["sensor.heat_pump".to_owned()]
        );
    }

    #[test]
    fn test_configure_household_aborts_on_missing_source() {
        let settings = NudgeSettings {
            water: Some(BudgetSettings {
                yearly_goal: 2000.0,
                reduction_goal_percent: 0,
            }),
            ..NudgeSettings::default()
        };
        let sources = vec![EnergySource::new(SourceKind::Grid).with_from("sensor.grid_in")];
        assert!(matches!(
            configure_household(&settings, &sources),
            Err(NudgeError::MissingSource {
                category: NudgeCategory::Water,
                ..
            })
        ));
    }
}

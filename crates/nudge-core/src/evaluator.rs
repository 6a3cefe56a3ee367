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

//! Budget evaluation: actual vs goal, and goal adjustment between tracking cycles.

use chrono::{DateTime, Utc};
use nudge_types::{
    BudgetReading, BudgetState, Goal, GoalSet, GuardReason, NudgeCategory, NudgeResult, Period,
    Tracking,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::aggregator::{aggregate, readings_from_statistics};
use crate::decomposer::{decompose, uniform};

/// Highest autarky goal in percent
const AUTARKY_CAP: f64 = 100.0;

/// `round(actual / target * 100)`, `None` when the target is not positive
/// or either value is not finite.
///
/// Halves round to even.
#[expect(clippy::cast_possible_truncation)]
pub fn percent_of_goal(actual: f64, target: f64) -> Option<i64> {
    if !actual.is_finite() || !target.is_finite() || target <= 0.0 {
        return None;
    }
    Some((actual / target * 100.0).round_ties_even() as i64)
}

/// Whether `actual` meets `target` for the polarity of `category`
pub fn is_reached(category: NudgeCategory, actual: f64, target: f64) -> bool {
    category.polarity().is_reached(actual, target)
}

/// Evaluate one goal against its actual value.
///
/// Fails closed: a non-positive goal or a non-finite input yields
/// `BudgetReading::NoData` instead of NaN or infinity.
pub fn evaluate(goal: &Goal, actual: f64, at: DateTime<Utc>) -> BudgetReading {
    let Some(percent_of_goal) = percent_of_goal(actual, goal.target) else {
        let reason = if actual.is_finite() && goal.target.is_finite() {
            GuardReason::NonPositiveGoal
        } else {
            GuardReason::NonFiniteInput
        };
        warn!(
            "⚠️ [NUDGE] {} {}: no data ({reason}, goal={}, actual={actual})",
            goal.category, goal.period, goal.target
        );
        return BudgetReading::NoData {
            category: goal.category,
            period: goal.period,
            reason,
            at,
        };
    };

    let reached = is_reached(goal.category, actual, goal.target);
    debug!(
        "[NUDGE] {} {}: actual={actual:.3} goal={:.3} ({percent_of_goal}%), reached={reached}",
        goal.category, goal.period, goal.target
    );
    BudgetReading::Available(BudgetState {
        category: goal.category,
        period: goal.period,
        goal: goal.clone(),
        actual,
        percent_of_goal,
        reached,
        last_update: at,
    })
}

/// Actual value of a tracked category from per-statistic changes
pub fn resolve_actual(tracking: &Tracking, changes: &HashMap<String, f64>) -> f64 {
    match tracking {
        Tracking::Statistics { statistic_ids } => statistic_ids
            .iter()
            .filter_map(|id| changes.get(id))
            .sum(),
        Tracking::OwnConsumption { entities } => {
            aggregate(&readings_from_statistics(entities, changes)).own
        }
        Tracking::AutarkyRatio { entities } => {
            aggregate(&readings_from_statistics(entities, changes)).autarky_percent()
        }
    }
}

/// Evaluate one period of a goal set from the statistics fetched for it.
///
/// Returns `None` when the set has no goal for the period.
pub fn evaluate_period(
    goal_set: &GoalSet,
    period: Period,
    changes: &HashMap<String, f64>,
    at: DateTime<Utc>,
) -> Option<BudgetReading> {
    let goal = goal_set.goal(period)?;
    let actual = resolve_actual(&goal_set.tracking, changes);
    Some(evaluate(goal, actual, at))
}

/// `trunc(goal * (100 - reduction) / 100)`
pub fn tighten(goal: f64, reduction_percent: u8) -> f64 {
    let reduction = f64::from(reduction_percent);
    ((100.0 * goal - reduction * goal) / 100.0).trunc()
}

/// `trunc(goal * (100 + increase) / 100)`, capped at 100 %
pub fn raise(goal: f64, increase_percent: u8) -> f64 {
    let increase = f64::from(increase_percent);
    ((goal * (100.0 + increase)) / 100.0).trunc().min(AUTARKY_CAP)
}

/// Goal set for the next tracking cycle.
///
/// Budgets are tightened by their reduction percent, autarky goals are raised
/// by their increase percent. The per-period goals are derived again from the
/// new yearly target. An adjustment that would make the goal non-positive is
/// rejected and the caller keeps the current set.
pub fn start_cycle(goal_set: &GoalSet) -> NudgeResult<GoalSet> {
    let category = goal_set.category;
    let (yearly_target, targets) = if category.is_budget() {
        let yearly = tighten(goal_set.yearly_target, goal_set.adjustment_percent);
        (yearly, decompose(yearly)?)
    } else {
        let yearly = raise(goal_set.yearly_target, goal_set.adjustment_percent);
        (yearly, uniform(yearly)?)
    };

    info!(
        "🎯 [NUDGE] New {category} cycle: yearly goal {:.1} -> {yearly_target:.1} {}",
        goal_set.yearly_target,
        category.unit()
    );

    Ok(GoalSet {
        category,
        yearly_target,
        adjustment_percent: goal_set.adjustment_percent,
        goals: targets
            .into_iter()
            .map(|(period, target)| (period, Goal::new(category, period, target)))
            .collect(),
        tracking: goal_set.tracking.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudge_types::{EnergyEntities, EnergyFlowKind};

    fn goal(category: NudgeCategory, target: f64) -> Goal {
        Goal::new(category, Period::Daily, target)
    }

    #[test]
    fn test_budget_reached_below_goal() {
        let reading = evaluate(&goal(NudgeCategory::Electricity, 100.0), 80.0, Utc::now());
        let state = reading.state().unwrap();
        assert_eq!(state.percent_of_goal, 80);
        assert!(state.reached);
    }

    #[test]
    fn test_budget_exactly_at_goal_is_not_reached() {
        let reading = evaluate(&goal(NudgeCategory::Water, 100.0), 100.0, Utc::now());
        assert_eq!(reading.state().unwrap().percent_of_goal, 100);
        assert!(!reading.reached());
    }

    #[test]
    fn test_autarky_reached_above_goal() {
        let reading = evaluate(&goal(NudgeCategory::Autarky, 50.0), 60.0, Utc::now());
        assert!(reading.reached());

        let reading = evaluate(&goal(NudgeCategory::Autarky, 50.0), 40.0, Utc::now());
        assert!(!reading.reached());
    }

    #[test]
    fn test_zero_goal_fails_closed() {
        let reading = evaluate(&goal(NudgeCategory::Heat, 0.0), 12.0, Utc::now());
        assert!(matches!(
            reading,
            BudgetReading::NoData {
                reason: GuardReason::NonPositiveGoal,
                ..
            }
        ));
        assert!(!reading.reached());
    }

    #[test]
    fn test_non_finite_actual_fails_closed() {
        let reading = evaluate(&goal(NudgeCategory::Heat, 10.0), f64::NAN, Utc::now());
        assert!(matches!(
            reading,
            BudgetReading::NoData {
                reason: GuardReason::NonFiniteInput,
                ..
            }
        ));
    }

    #[test]
    fn test_percent_rounds_half_to_even() {
        assert_eq!(percent_of_goal(1.0, 8.0), Some(12));
        assert_eq!(percent_of_goal(3.0, 8.0), Some(38));
        assert_eq!(percent_of_goal(1.0, 16.0), Some(6));
        assert_eq!(percent_of_goal(1.0, 3.0), Some(33));
        assert_eq!(percent_of_goal(1.0, 0.0), None);
    }

    #[test]
    fn test_tighten() {
        assert_eq!(tighten(100.0, 10), 90.0);
        assert_eq!(tighten(100.0, 0), 100.0);
        assert_eq!(tighten(3333.0, 5), 3166.0);
    }

    #[test]
    fn test_raise_is_capped() {
        assert_eq!(raise(40.0, 10), 44.0);
        assert_eq!(raise(95.0, 10), 100.0);
    }

    #[test]
    fn test_resolve_actual_per_tracking() {
        let changes = HashMap::from([
            ("sensor.gas".to_owned(), 3.0),
            ("sensor.heat_pump".to_owned(), 2.0),
            ("sensor.grid_in".to_owned(), 100.0),
            ("sensor.pv".to_owned(), 25.0),
        ]);

        let statistics = Tracking::Statistics {
            statistic_ids: vec!["sensor.gas".to_owned(), "sensor.heat_pump".to_owned()],
        };
        assert_eq!(resolve_actual(&statistics, &changes), 5.0);

        let mut entities = EnergyEntities::default();
        entities
            .flows
            .insert(EnergyFlowKind::GridImport, "sensor.grid_in".to_owned());
        entities
            .flows
            .insert(EnergyFlowKind::SolarProduction, "sensor.pv".to_owned());

        let own = Tracking::OwnConsumption {
            entities: entities.clone(),
        };
        assert_eq!(resolve_actual(&own, &changes), 25.0);

        let autarky = Tracking::AutarkyRatio { entities };
        assert_eq!(resolve_actual(&autarky, &changes), 20.0);
    }

    #[test]
    fn test_start_cycle_tightens_and_redecomposes() {
        let goals = decompose(3650.0)
            .unwrap()
            .into_iter()
            .map(|(period, target)| (period, Goal::new(NudgeCategory::Water, period, target)))
            .collect();
        let set = GoalSet {
            category: NudgeCategory::Water,
            yearly_target: 3650.0,
            adjustment_percent: 10,
            goals,
            tracking: Tracking::Statistics {
                statistic_ids: vec!["sensor.water".to_owned()],
            },
        };

        let next = start_cycle(&set).unwrap();
        assert_eq!(next.yearly_target, 3285.0);
        assert!((next.target(Period::Daily).unwrap() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_start_cycle_rejects_vanishing_goal() {
        let set = GoalSet {
            category: NudgeCategory::Electricity,
            yearly_target: 1.0,
            adjustment_percent: 50,
            goals: std::collections::BTreeMap::new(),
            tracking: Tracking::Statistics {
                statistic_ids: Vec::new(),
            },
        };
        assert!(start_cycle(&set).is_err());
    }
}

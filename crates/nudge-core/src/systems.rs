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

//! Systems applying host triggers to sensors and counters.

use bevy_ecs::prelude::*;
use nudge_types::{EntityDomain, GoalSet, NudgeSettings, Period, Rank, UniqueId};
use tracing::{debug, error, info, warn};

use crate::{
    components::{BudgetSensor, ScoreCounter, StreakCounter, TotalCounter},
    evaluator::start_cycle,
    ledger::{advance_streak, award, counter_from_value, reset_year, total_score},
    messages::{CycleStart, DayBoundary, RankUpdate, SetCounter, YearBoundary},
    persistence::{CounterPersistence, CounterSnapshot},
    resources::{
        EntityRegistry, HouseholdGoals, HouseholdTimezone, PENDING_MAX_ATTEMPTS,
        PendingTransitions, Transition,
    },
    traits::EntityDirectory,
};

// ============= Setup =============

/// Spawn the sensors and counters of a household and register them.
///
/// Counters start from the restored snapshot, 0 when missing.
pub fn spawn_household(
    commands: &mut Commands,
    registry: &mut EntityRegistry,
    entry_id: &str,
    goal_sets: &[GoalSet],
    restored: &CounterSnapshot,
) {
    for goal_set in goal_sets {
        for goal in goal_set.goals.values() {
            let sensor = BudgetSensor::new(entry_id, goal.clone());
            let unique_id = sensor.unique_id.clone();
            let entity = commands.spawn(sensor).id();
            registry.register(unique_id, EntityDomain::Sensor, entity);
        }

        let category = goal_set.category;
        let score = ScoreCounter::new(
            entry_id,
            category,
            restored.value(&UniqueId::score(entry_id, category)),
        );
        let streak = StreakCounter::new(
            entry_id,
            category,
            restored.value(&UniqueId::streak(entry_id, category)),
        );
        info!(
            "🏅 [SCORE] {category}: {} points, {} day streak",
            score.state.points, streak.state.consecutive_days
        );

        let score_id = score.unique_id.clone();
        let streak_id = streak.unique_id.clone();
        let entity = commands.spawn(score).id();
        registry.register(score_id, EntityDomain::Number, entity);
        let entity = commands.spawn(streak).id();
        registry.register(streak_id, EntityDomain::Number, entity);
    }

    let total = TotalCounter::new(entry_id);
    let total_id = total.unique_id.clone();
    let entity = commands.spawn(total).id();
    registry.register(total_id, EntityDomain::Sensor, entity);

    info!(
        "🏠 [NUDGE] Household {entry_id}: {} categories, {} entities",
        goal_sets.len(),
        registry.len()
    );
}

/// Startup system spawning the household from the installed goals
pub fn setup_household_system(
    mut commands: Commands,
    settings: Res<NudgeSettings>,
    goals: Res<HouseholdGoals>,
    persistence: Option<Res<CounterPersistence>>,
    mut registry: ResMut<EntityRegistry>,
) {
    let restored = match persistence.as_deref().map(|p| (p, p.load())) {
        Some((_, Ok(snapshot))) => snapshot,
        Some((persistence, Err(e))) => {
            error!("❌ [SCORE] Failed to restore counters, starting from zero: {e:#}");
            match persistence.quarantine() {
                Ok(moved) => warn!(
                    "⚠️ [SCORE] Unreadable counter file kept at {}",
                    moved.display()
                ),
                Err(e) => {
                    error!("❌ [SCORE] {e:#}, counters will not be saved this session");
                    commands.remove_resource::<CounterPersistence>();
                }
            }
            CounterSnapshot::default()
        }
        None => CounterSnapshot::default(),
    };

    let goal_sets: Vec<GoalSet> = goals.sets.values().cloned().collect();
    spawn_household(
        &mut commands,
        &mut registry,
        &settings.entry_id,
        &goal_sets,
        &restored,
    );
}

// ============= Host Triggers =============

/// Queue the daily result of every category for its score and streak
pub fn day_boundary_system(
    mut days: MessageReader<DayBoundary>,
    settings: Res<NudgeSettings>,
    timezone: Res<HouseholdTimezone>,
    sensors: Query<&BudgetSensor>,
    mut pending: ResMut<PendingTransitions>,
) {
    for day in days.read() {
        let today = day.at.with_timezone(&timezone.0).date_naive();

        for sensor in &sensors {
            if sensor.period() != Period::Daily {
                continue;
            }

            let category = sensor.category();
            let reached = sensor.reached_on(today, &timezone.0);
            if sensor.reading_on(today, &timezone.0).is_none() {
                debug!("[SCORE] {category}: no daily reading for {today}, counted as missed");
            }
            info!(
                "📅 [SCORE] Day ended {today}: {category} daily goal {}",
                if reached { "reached" } else { "missed" }
            );

            pending.push(
                UniqueId::score(&settings.entry_id, category),
                EntityDomain::Number,
                Transition::Award { reached },
            );
            pending.push(
                UniqueId::streak(&settings.entry_id, category),
                EntityDomain::Number,
                Transition::Streak { reached },
            );
        }
    }
}

/// Reset every score at the year boundary
pub fn year_boundary_system(
    mut years: MessageReader<YearBoundary>,
    mut scores: Query<&mut ScoreCounter>,
) {
    for year in years.read() {
        info!("🎆 [SCORE] New year {}: resetting scores", year.at.format("%Y"));
        for mut score in &mut scores {
            reset_year(&mut score.state);
        }
    }
}

/// Adjust goal sets for a new tracking cycle and refresh the sensors' goals
pub fn cycle_start_system(
    mut cycles: MessageReader<CycleStart>,
    mut goals: ResMut<HouseholdGoals>,
    mut sensors: Query<&mut BudgetSensor>,
) {
    for cycle in cycles.read() {
        let categories: Vec<_> = match cycle.category {
            Some(category) => vec![category],
            None => goals.sets.keys().copied().collect(),
        };

        for category in categories {
            let Some(current) = goals.get(category) else {
                warn!("⚠️ [NUDGE] Cycle start for unconfigured category {category}");
                continue;
            };

            match start_cycle(current) {
                Ok(next) => {
                    for mut sensor in &mut sensors {
                        if sensor.category() == category
                            && let Some(goal) = next.goal(sensor.period())
                        {
                            sensor.goal = goal.clone();
                        }
                    }
                    goals.sets.insert(category, next);
                }
                Err(e) => {
                    error!("❌ [NUDGE] Keeping {category} goals, new cycle rejected: {e}");
                }
            }
        }
    }
}

/// Queue rank updates pushed by the host
pub fn rank_update_system(
    mut ranks: MessageReader<RankUpdate>,
    mut pending: ResMut<PendingTransitions>,
) {
    for rank in ranks.read() {
        pending.push(
            rank.target.clone(),
            rank.domain,
            Transition::Rank(Rank::new(rank.position, rank.length)),
        );
    }
}

/// Queue manual counter sets, rejecting values that are not whole numbers
pub fn set_counter_system(
    mut sets: MessageReader<SetCounter>,
    mut pending: ResMut<PendingTransitions>,
) {
    for set in sets.read() {
        match counter_from_value(set.value) {
            Ok(value) => {
                pending.push(set.target.clone(), EntityDomain::Number, Transition::Set(value));
            }
            Err(e) => warn!("⚠️ [SCORE] Ignoring set of {}: {e}", set.target),
        }
    }
}

// ============= Pending Transitions =============

/// Apply queued transitions whose target resolves, retry the others on the
/// next tick
pub fn apply_pending_transitions_system(
    mut pending: ResMut<PendingTransitions>,
    registry: Res<EntityRegistry>,
    mut scores: Query<&mut ScoreCounter>,
    mut streaks: Query<&mut StreakCounter>,
    mut totals: Query<&mut TotalCounter>,
) {
    for transition in pending.drain() {
        let entity = match registry.lookup(&transition.target, transition.domain) {
            Ok(entity) => entity,
            Err(e) => {
                if transition.attempts + 1 >= PENDING_MAX_ATTEMPTS {
                    warn!(
                        "⚠️ [SCORE] Dropping {:?} after {} attempts: {e}",
                        transition.transition, PENDING_MAX_ATTEMPTS
                    );
                } else {
                    if transition.attempts == 0 {
                        warn!("⚠️ [SCORE] {e}, retrying on the next tick");
                    }
                    pending.retry(transition);
                }
                continue;
            }
        };

        let applied = match &transition.transition {
            Transition::Award { reached } => scores.get_mut(entity).map(|mut score| {
                award(&mut score.state, *reached);
            }),
            Transition::Streak { reached } => streaks.get_mut(entity).map(|mut streak| {
                advance_streak(&mut streak.state, *reached);
            }),
            Transition::Rank(rank) => match scores.get_mut(entity) {
                Ok(mut score) => {
                    score.state.rank = *rank;
                    Ok(())
                }
                Err(_) => totals.get_mut(entity).map(|mut total| {
                    total.state.rank = *rank;
                }),
            },
            Transition::Set(value) => match scores.get_mut(entity) {
                Ok(mut score) => {
                    score.state.points = *value;
                    Ok(())
                }
                Err(_) => streaks.get_mut(entity).map(|mut streak| {
                    streak.state.consecutive_days = *value;
                }),
            },
        };

        match applied {
            Ok(()) => debug!(
                "[SCORE] Applied {:?} to {}",
                transition.transition, transition.target
            ),
            Err(e) => warn!(
                "⚠️ [SCORE] {} cannot take {:?}: {e}",
                transition.target, transition.transition
            ),
        }
    }
}

// ============= Derived State =============

/// Recompute the total from all score counters
pub fn update_total_system(
    scores: Query<&ScoreCounter>,
    mut totals: Query<&mut TotalCounter>,
) {
    for mut total in &mut totals {
        let next = total_score(scores.iter().map(|score| &score.state), total.state.rank);
        if next != total.state {
            debug!("[SCORE] Total score: {} points", next.points);
            total.state = next;
        }
    }
}

/// Save all counters when any of them changed
pub fn persist_counters_system(
    persistence: Option<Res<CounterPersistence>>,
    scores: Query<Ref<'_, ScoreCounter>>,
    streaks: Query<Ref<'_, StreakCounter>>,
) {
    let Some(persistence) = persistence else {
        return;
    };

    let changed = scores.iter().any(|score| score.is_changed())
        || streaks.iter().any(|streak| streak.is_changed());
    if !changed {
        return;
    }

    let mut snapshot = CounterSnapshot::default();
    for score in &scores {
        snapshot.set(score.unique_id.clone(), score.state.points);
    }
    for streak in &streaks {
        snapshot.set(streak.unique_id.clone(), streak.state.consecutive_days);
    }

    if let Err(e) = persistence.save(&snapshot) {
        error!("❌ [SCORE] Failed to save counters: {e:#}");
    }
}

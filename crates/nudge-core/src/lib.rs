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

pub mod aggregator;
pub mod async_systems;
pub mod async_tasks;
pub mod components;
pub mod config_flow;
pub mod configure;
pub mod decomposer;
pub mod energy_sources;
pub mod entities;
pub mod evaluator;
pub mod ledger;
pub mod messages;
pub mod period;
pub mod persistence;
pub mod resources;
pub mod settings;
pub mod systems;
pub mod traits;

pub use aggregator::{ConsumptionSummary, FlowReadings, aggregate};
pub use async_tasks::*;
use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
pub use components::*;
pub use config_flow::{ConfigData, ConfigFlow, FlowStep, StepId, StepSchema};
pub use configure::{configure, configure_household};
pub use decomposer::decompose;
pub use energy_sources::{StaticEnergySources, energy_entities, supported_categories};
pub use entities::{EntitySnapshot, NudgeEntity};
pub use evaluator::{evaluate, percent_of_goal, start_cycle, tighten};
pub use ledger::{ScoreBoard, ScoreLedger, total_score};
pub use messages::*;
pub use persistence::{CounterPersistence, CounterSnapshot};
pub use resources::*;
pub use systems::spawn_household;
pub use traits::{EnergySourceConfig, EntityDirectory, StatisticsProvider};

/// Core plugin that registers the household messages, resources and systems.
///
/// The host inserts `NudgeSettings` and `HouseholdGoals` before startup,
/// and optionally `StatisticsProviderResource`, `CounterPersistence` and
/// `HouseholdTimezone`.
#[derive(Debug)]
pub struct NudgeCorePlugin;

impl Plugin for NudgeCorePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<EvaluationTick>()
            .add_message::<DayBoundary>()
            .add_message::<YearBoundary>()
            .add_message::<CycleStart>()
            .add_message::<RankUpdate>()
            .add_message::<SetCounter>()
            .init_resource::<EntityRegistry>()
            .init_resource::<PendingTransitions>()
            .init_resource::<HouseholdTimezone>()
            .add_systems(
                Startup,
                (
                    systems::setup_household_system,
                    async_systems::setup_async_workers,
                ),
            )
            .add_systems(
                Update,
                (
                    systems::cycle_start_system,
                    async_systems::request_statistics_system,
                    async_systems::apply_statistics_system,
                    async_systems::statistics_health_system,
                    systems::day_boundary_system,
                    systems::rank_update_system,
                    systems::set_counter_system,
                    systems::apply_pending_transitions_system,
                    systems::year_boundary_system,
                    systems::update_total_system,
                    systems::persist_counters_system,
                )
                    .chain(),
            );
    }
}

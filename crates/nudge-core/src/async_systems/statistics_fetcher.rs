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

use bevy_ecs::prelude::*;
use nudge_types::Period;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, trace, warn};

use crate::{
    async_tasks::*,
    components::BudgetSensor,
    evaluator::evaluate_period,
    messages::EvaluationTick,
    period::window_start,
    resources::{HouseholdGoals, HouseholdTimezone, StatisticsProviderResource},
    traits::StatisticsProvider,
};

/// Spawns the statistics fetcher worker task
pub fn spawn_statistics_worker(commands: &mut Commands, provider: &StatisticsProviderResource) {
    info!("📊 Setting up statistics fetcher...");

    let (channel, ends) = statistics_channel();
    let fetcher = StatisticsFetcher::new(provider.0.name());

    tokio::spawn(run_statistics_worker(provider.0.clone(), ends));

    commands.spawn((fetcher, channel));

    info!("✅ Statistics fetcher entity created");
}

/// Answer statistics requests until the ECS side drops its sender
pub async fn run_statistics_worker(
    provider: Arc<dyn StatisticsProvider>,
    mut ends: StatisticsWorkerEnds,
) {
    info!("📊 Statistics fetcher started ({})", provider.name());
    report_health(provider.as_ref(), &ends.health).await;

    while let Some(request) = ends.requests.recv().await {
        trace!(
            "Fetching {} statistics for {} {} since {}",
            request.statistic_ids.len(),
            request.category,
            request.period,
            request.window_start
        );

        let changes = provider
            .sum_change(&request.statistic_ids, request.period, request.window_start)
            .await;
        if let Err(e) = &changes {
            error!(
                "❌ Failed to fetch statistics for {} {}: {e}",
                request.category, request.period
            );
            report_health(provider.as_ref(), &ends.health).await;
        }

        let update = StatisticsUpdate {
            category: request.category,
            period: request.period,
            at: request.at,
            changes,
        };
        if let Err(e) = ends.updates.send(update) {
            error!("❌ Failed to send statistics update to channel: {e}");
            break;
        }
    }

    info!("📊 Statistics fetcher stopped");
}

/// Check the store and pass the result to the ECS side
async fn report_health(
    provider: &dyn StatisticsProvider,
    health: &crossbeam_channel::Sender<bool>,
) {
    debug!("Checking {} health...", provider.name());
    let healthy = match provider.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            error!("❌ {} health check failed: {e}", provider.name());
            false
        }
    };
    let _ = health.try_send(healthy);
}

/// System that turns evaluation ticks into one statistics request per
/// category and period
pub fn request_statistics_system(
    mut ticks: MessageReader<EvaluationTick>,
    goals: Res<HouseholdGoals>,
    timezone: Res<HouseholdTimezone>,
    channel: Query<&StatisticsChannel>,
) {
    let Ok(channel) = channel.single() else {
        ticks.clear();
        return; // No statistics fetcher entity yet
    };

    for tick in ticks.read() {
        let local_now = tick.at.with_timezone(&timezone.0);

        for goal_set in goals.sets.values() {
            let statistic_ids = goal_set.tracking.statistic_ids();
            for period in Period::all() {
                let request = StatisticsRequest {
                    category: goal_set.category,
                    period: *period,
                    statistic_ids: statistic_ids.clone(),
                    window_start: window_start(*period, &local_now),
                    at: tick.at,
                };

                match channel.sender.try_send(request) {
                    Ok(()) => {}
                    Err(TrySendError::Full(request)) => {
                        warn!(
                            "⚠️ Statistics worker busy, skipping {} {}",
                            request.category, request.period
                        );
                    }
                    Err(TrySendError::Closed(_)) => {
                        error!("❌ Statistics worker is not running");
                        return;
                    }
                }
            }
        }
    }
}

/// System that polls the statistics channel and updates the budget sensors
pub fn apply_statistics_system(
    channel: Query<&StatisticsChannel>,
    goals: Res<HouseholdGoals>,
    mut sensors: Query<&mut BudgetSensor>,
) {
    let Ok(channel) = channel.single() else {
        return;
    };

    // NON-BLOCKING: try to receive from channel
    while let Ok(update) = channel.receiver.try_recv() {
        // Failures are logged by the worker; the sensor keeps its last reading
        let Ok(changes) = update.changes else {
            continue;
        };

        let Some(goal_set) = goals.get(update.category) else {
            debug!(
                "Statistics for unconfigured category {} ignored",
                update.category
            );
            continue;
        };

        let Some(reading) = evaluate_period(goal_set, update.period, &changes, update.at) else {
            continue;
        };

        for mut sensor in &mut sensors {
            if sensor.category() == update.category && sensor.period() == update.period {
                sensor.reading = Some(reading.clone());
            }
        }
    }
}

/// System that records the health reports of the statistics worker
pub fn statistics_health_system(
    mut fetchers: Query<(&mut StatisticsFetcher, &StatisticsChannel)>,
) {
    for (mut fetcher, channel) in &mut fetchers {
        while let Ok(healthy) = channel.health.try_recv() {
            if fetcher.healthy == Some(healthy) {
                continue;
            }
            if healthy {
                info!("✅ {} statistics store reachable", fetcher.source_name);
            } else {
                warn!(
                    "⚠️ {} statistics store unreachable, budget sensors keep their readings",
                    fetcher.source_name
                );
            }
            fetcher.healthy = Some(healthy);
        }
    }
}

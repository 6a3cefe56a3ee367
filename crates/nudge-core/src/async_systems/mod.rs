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

//! Async systems module
//!
//! Long-running worker tasks and the ECS systems that talk to them over
//! channels. The ECS side never awaits.

use bevy_ecs::prelude::*;
use tracing::info;

mod statistics_fetcher;

pub use statistics_fetcher::{
    apply_statistics_system, request_statistics_system, run_statistics_worker,
    spawn_statistics_worker, statistics_health_system,
};

use crate::resources::StatisticsProviderResource;

/// Startup system that spawns the statistics worker when a provider is installed
pub fn setup_async_workers(
    mut commands: Commands,
    provider: Option<Res<StatisticsProviderResource>>,
) {
    let Some(provider) = provider else {
        info!("No statistics provider installed, budget sensors stay unknown");
        return;
    };

    spawn_statistics_worker(&mut commands, &provider);
    info!("🎉 Async workers initialized");
}

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

//! Wiring of a household against a Home Assistant instance.

use anyhow::{Context, Result};
use bevy_app::prelude::*;
use nudge_core::{
    CounterPersistence, HouseholdGoals, HouseholdTimezone, NudgeCorePlugin,
    StatisticsProviderResource, configure_household, period::parse_timezone,
    traits::EnergySourceConfig,
};
use nudge_types::{NudgeError, NudgeSettings};
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::{HaEnergySources, HaStatisticsAdapter};
use crate::client::HomeAssistantClient;

/// Everything the household plugin needs, resolved from HA before startup
#[derive(Debug, Clone)]
pub struct HouseholdSetup {
    pub settings: NudgeSettings,
    pub goals: HouseholdGoals,
    pub timezone: HouseholdTimezone,
    pub provider: StatisticsProviderResource,
    pub persistence: CounterPersistence,
}

/// Read the energy dashboard, configure every nudge and connect the
/// statistics adapter.
pub async fn prepare_household(settings: NudgeSettings) -> Result<HouseholdSetup> {
    let client = Arc::new(
        HomeAssistantClient::from_config(
            settings.system.ha_base_url.clone(),
            settings.system.ha_token.clone(),
        )
        .context("Failed to create Home Assistant client")?,
    );

    let sources = HaEnergySources::new(&settings.system.energy_prefs_path)
        .list_sources()
        .await?
        .ok_or(NudgeError::EnergyNotConfigured)?;

    let goal_sets = configure_household(&settings, &sources)
        .with_context(|| format!("Failed to configure household {}", settings.entry_id))?;

    let timezone = match &settings.system.timezone {
        Some(name) => Some(name.clone()),
        None => match client.get_timezone().await {
            Ok(name) => Some(name),
            Err(e) => {
                warn!("⚠️ [NUDGE] Could not read HA timezone, using UTC: {e}");
                None
            }
        },
    };
    let timezone = HouseholdTimezone(parse_timezone(timezone.as_deref()));

    info!(
        "🏠 [NUDGE] Household {} ready: {} nudges, timezone {}",
        settings.entry_id,
        goal_sets.len(),
        timezone.0
    );

    Ok(HouseholdSetup {
        goals: HouseholdGoals::new(goal_sets),
        timezone,
        provider: StatisticsProviderResource(Arc::new(HaStatisticsAdapter::new(client))),
        persistence: CounterPersistence::new(&settings.system.state_path),
        settings,
    })
}

/// Plugin installing a prepared household together with the core systems
#[derive(Debug)]
pub struct NudgeHaPlugin {
    setup: HouseholdSetup,
}

impl NudgeHaPlugin {
    pub fn new(setup: HouseholdSetup) -> Self {
        Self { setup }
    }
}

impl Plugin for NudgeHaPlugin {
    fn build(&self, app: &mut App) {
        let setup = self.setup.clone();
        app.insert_resource(setup.settings)
            .insert_resource(setup.goals)
            .insert_resource(setup.timezone)
            .insert_resource(setup.provider)
            .insert_resource(setup.persistence)
            .add_plugins(NudgeCorePlugin);
    }
}

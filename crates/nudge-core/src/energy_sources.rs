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

//! Mapping of configured energy sources to flows and supported nudges.

use anyhow::Result;
use async_trait::async_trait;
use nudge_types::{
    EnergyEntities, EnergyFlowKind, EnergySource, HeatSource, HouseholdInfo, NudgeCategory,
    SourceKind,
};
use std::collections::BTreeSet;
use tracing::debug;

use crate::traits::EnergySourceConfig;

/// Resolve the statistic id of every flow kind.
///
/// When several statistics map to one kind the last one wins.
pub fn energy_entities(sources: &[EnergySource]) -> EnergyEntities {
    let mut entities = EnergyEntities::default();

    for source in sources {
        match source.kind {
            SourceKind::Grid => {
                if let Some(id) = source.stat_energy_from.last() {
                    entities.flows.insert(EnergyFlowKind::GridImport, id.clone());
                }
                if let Some(id) = source.stat_energy_to.last() {
                    entities.flows.insert(EnergyFlowKind::GridExport, id.clone());
                }
            }
            SourceKind::Battery => {
                if let Some(id) = source.stat_energy_to.last() {
                    entities.flows.insert(EnergyFlowKind::BatteryExport, id.clone());
                }
                if let Some(id) = source.stat_energy_from.last() {
                    entities.flows.insert(EnergyFlowKind::BatteryImport, id.clone());
                }
            }
            SourceKind::Solar => {
                if let Some(id) = source.stat_energy_from.last() {
                    entities
                        .flows
                        .insert(EnergyFlowKind::SolarProduction, id.clone());
                }
            }
            SourceKind::Gas => {
                if let Some(id) = source.stat_energy_from.last() {
                    entities.gas = Some(id.clone());
                }
            }
            SourceKind::Water => {
                if let Some(id) = source.stat_energy_from.last() {
                    entities.water = Some(id.clone());
                }
            }
        }
    }

    debug!(
        "[NUDGE] Energy entities: {} flows, gas={:?}, water={:?}",
        entities.flows.len(),
        entities.gas,
        entities.water
    );
    entities
}

/// Add the household's own statistics (e-charger) to the resolved flows
pub fn with_household(mut entities: EnergyEntities, household: &HouseholdInfo) -> EnergyEntities {
    if let Some(e_charger) = &household.e_charger {
        entities
            .flows
            .insert(EnergyFlowKind::EChargerConsumption, e_charger.clone());
    }
    entities
}

/// Source kinds present in the configuration
pub fn source_kinds(sources: &[EnergySource]) -> BTreeSet<SourceKind> {
    sources.iter().map(|source| source.kind).collect()
}

/// Categories a household can configure, given its sources and heat source
pub fn supported_categories(
    kinds: &BTreeSet<SourceKind>,
    household: &HouseholdInfo,
) -> BTreeSet<NudgeCategory> {
    let mut supported = BTreeSet::new();

    if kinds.contains(&SourceKind::Grid) {
        supported.insert(NudgeCategory::Electricity);
    }
    if kinds.contains(&SourceKind::Gas) || household.heat_source == HeatSource::HeatPump {
        supported.insert(NudgeCategory::Heat);
    }
    if kinds.contains(&SourceKind::Solar) {
        supported.insert(NudgeCategory::Autarky);
    }
    if kinds.contains(&SourceKind::Water) {
        supported.insert(NudgeCategory::Water);
    }
    if household.e_charger.is_some() {
        supported.insert(NudgeCategory::EMobility);
    }

    supported
}

/// Energy configuration known up front (settings file, tests)
#[derive(Debug, Clone, Default)]
pub struct StaticEnergySources {
    sources: Option<Vec<EnergySource>>,
}

impl StaticEnergySources {
    pub fn new(sources: Vec<EnergySource>) -> Self {
        Self {
            sources: Some(sources),
        }
    }

    /// Energy dashboard that was never configured
    pub fn unconfigured() -> Self {
        Self { sources: None }
    }
}

#[async_trait]
impl EnergySourceConfig for StaticEnergySources {
    async fn list_sources(&self) -> Result<Option<Vec<EnergySource>>> {
        Ok(self.sources.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

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

//! Energy sources as configured in the host's energy dashboard.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::category::{EnergyFlowKind, SourceKind};

/// One configured energy source with its statistic ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergySource {
    pub kind: SourceKind,
    /// Statistics of energy flowing from the source into the house
    #[serde(default)]
    pub stat_energy_from: Vec<String>,
    /// Statistics of energy flowing from the house into the source
    #[serde(default)]
    pub stat_energy_to: Vec<String>,
}

impl EnergySource {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            stat_energy_from: Vec::new(),
            stat_energy_to: Vec::new(),
        }
    }

    pub fn with_from(mut self, statistic_id: impl Into<String>) -> Self {
        self.stat_energy_from.push(statistic_id.into());
        self
    }

    pub fn with_to(mut self, statistic_id: impl Into<String>) -> Self {
        self.stat_energy_to.push(statistic_id.into());
        self
    }
}

/// Flows that feed own/total consumption
pub const CONSUMPTION_FLOWS: [EnergyFlowKind; 5] = [
    EnergyFlowKind::GridImport,
    EnergyFlowKind::GridExport,
    EnergyFlowKind::BatteryImport,
    EnergyFlowKind::BatteryExport,
    EnergyFlowKind::SolarProduction,
];

/// Statistic ids resolved from the energy sources, at most one per flow kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyEntities {
    #[serde(default)]
    pub flows: BTreeMap<EnergyFlowKind, String>,
    #[serde(default)]
    pub gas: Option<String>,
    #[serde(default)]
    pub water: Option<String>,
}

impl EnergyEntities {
    pub fn flow(&self, kind: EnergyFlowKind) -> Option<&str> {
        self.flows.get(&kind).map(String::as_str)
    }

    pub fn has_consumption_flows(&self) -> bool {
        CONSUMPTION_FLOWS.iter().any(|kind| self.flows.contains_key(kind))
    }

    /// Deduplicated ids of the flows used by the consumption aggregation
    pub fn flow_statistic_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = CONSUMPTION_FLOWS
            .iter()
            .filter_map(|kind| self.flows.get(kind).cloned())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_statistic_ids_skip_non_consumption_flows() {
        let mut entities = EnergyEntities::default();
        entities
            .flows
            .insert(EnergyFlowKind::GridImport, "sensor.grid_in".to_owned());
        entities
            .flows
            .insert(EnergyFlowKind::SolarProduction, "sensor.pv".to_owned());
        entities
            .flows
            .insert(EnergyFlowKind::EChargerConsumption, "sensor.wallbox".to_owned());

        assert_eq!(
            entities.flow_statistic_ids(),
            vec!["sensor.grid_in".to_owned(), "sensor.pv".to_owned()]
        );
        assert!(entities.has_consumption_flows());
        assert_eq!(
            entities.flow(EnergyFlowKind::EChargerConsumption),
            Some("sensor.wallbox")
        );
    }
}

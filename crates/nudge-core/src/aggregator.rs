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

//! Own and total consumption from categorised energy flows.

use nudge_types::{EnergyEntities, EnergyFlowKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{trace, warn};

/// Accumulated change per flow kind over one window.
/// Kinds that are not configured read as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowReadings(BTreeMap<EnergyFlowKind, f64>);

impl FlowReadings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: EnergyFlowKind, value: f64) -> Self {
        self.add(kind, value);
        self
    }

    /// Add to the reading of a kind
    pub fn add(&mut self, kind: EnergyFlowKind, value: f64) {
        *self.0.entry(kind).or_insert(0.0) += value;
    }

    pub fn get(&self, kind: EnergyFlowKind) -> f64 {
        self.0.get(&kind).copied().unwrap_or(0.0)
    }
}

impl FromIterator<(EnergyFlowKind, f64)> for FlowReadings {
    fn from_iter<T: IntoIterator<Item = (EnergyFlowKind, f64)>>(iter: T) -> Self {
        let mut readings = Self::new();
        for (kind, value) in iter {
            readings.add(kind, value);
        }
        readings
    }
}

/// Own and total consumption of a household over one window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionSummary {
    pub own: f64,
    pub total: f64,
}

impl ConsumptionSummary {
    /// Share of the total consumption covered by own sources, in percent.
    ///
    /// Zero total consumption yields 0.
    pub fn autarky_percent(&self) -> f64 {
        if self.total == 0.0 {
            warn!("⚠️ [NUDGE] Total consumption is zero, autarky reported as 0%");
            return 0.0;
        }
        self.own / self.total * 100.0
    }
}

/// own = battery_export - battery_import + solar_production + grid_export,
/// total = own + grid_import
pub fn aggregate(readings: &FlowReadings) -> ConsumptionSummary {
    let own = readings.get(EnergyFlowKind::BatteryExport)
        - readings.get(EnergyFlowKind::BatteryImport)
        + readings.get(EnergyFlowKind::SolarProduction)
        + readings.get(EnergyFlowKind::GridExport);
    let total = own + readings.get(EnergyFlowKind::GridImport);

    trace!("[NUDGE] Aggregated consumption: own={own:.3}, total={total:.3}");
    ConsumptionSummary { own, total }
}

/// Map per-statistic changes back to their flow kinds.
///
/// Statistics that the provider did not return count as 0.
pub fn readings_from_statistics(
    entities: &EnergyEntities,
    changes: &HashMap<String, f64>,
) -> FlowReadings {
    entities
        .flows
        .iter()
        .map(|(kind, statistic_id)| (*kind, changes.get(statistic_id).copied().unwrap_or(0.0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_and_total_consumption() {
        let readings = FlowReadings::new()
            .with(EnergyFlowKind::GridImport, 100.0)
            .with(EnergyFlowKind::GridExport, 20.0)
            .with(EnergyFlowKind::SolarProduction, 50.0)
            .with(EnergyFlowKind::BatteryExport, 10.0)
            .with(EnergyFlowKind::BatteryImport, 5.0);

        let summary = aggregate(&readings);
        assert_eq!(summary.own, 75.0);
        assert_eq!(summary.total, 175.0);
        assert!((summary.autarky_percent() - 42.857_142_857).abs() < 1e-6);
    }

    #[test]
    fn test_missing_kinds_default_to_zero() {
        let readings = FlowReadings::new().with(EnergyFlowKind::GridImport, 12.0);
        let summary = aggregate(&readings);
        assert_eq!(summary.own, 0.0);
        assert_eq!(summary.total, 12.0);
        assert_eq!(summary.autarky_percent(), 0.0);
    }

    #[test]
    fn test_autarky_with_zero_total_is_zero() {
        let summary = aggregate(&FlowReadings::new());
        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.autarky_percent(), 0.0);
    }

    #[test]
    fn test_readings_from_statistics() {
        let mut entities = EnergyEntities::default();
        entities
            .flows
            .insert(EnergyFlowKind::GridImport, "sensor.grid_in".to_owned());
        entities
            .flows
            .insert(EnergyFlowKind::SolarProduction, "sensor.pv".to_owned());

        let changes = HashMap::from([("sensor.pv".to_owned(), 8.5)]);
        let readings = readings_from_statistics(&entities, &changes);

        assert_eq!(readings.get(EnergyFlowKind::SolarProduction), 8.5);
        assert_eq!(readings.get(EnergyFlowKind::GridImport), 0.0);
        assert_eq!(readings.get(EnergyFlowKind::BatteryExport), 0.0);
    }
}

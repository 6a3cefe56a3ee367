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

//! Energy dashboard preferences as stored by Home Assistant in
//! `.storage/energy`.

use nudge_types::{EnergySource, SourceKind};
use serde::Deserialize;
use tracing::debug;

use crate::errors::HaResult;

#[derive(Debug, Deserialize)]
struct StoredPrefs {
    #[serde(default)]
    data: Option<EnergyPrefs>,
}

#[derive(Debug, Deserialize)]
struct EnergyPrefs {
    #[serde(default)]
    energy_sources: Vec<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    flow_from: Vec<GridFlowFrom>,
    #[serde(default)]
    flow_to: Vec<GridFlowTo>,
    #[serde(default)]
    stat_energy_from: Option<String>,
    #[serde(default)]
    stat_energy_to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GridFlowFrom {
    stat_energy_from: String,
}

#[derive(Debug, Deserialize)]
struct GridFlowTo {
    stat_energy_to: String,
}

fn source_kind(tag: &str) -> Option<SourceKind> {
    match tag {
        "grid" => Some(SourceKind::Grid),
        "battery" => Some(SourceKind::Battery),
        "solar" => Some(SourceKind::Solar),
        "gas" => Some(SourceKind::Gas),
        "water" => Some(SourceKind::Water),
        _ => None,
    }
}

impl RawSource {
    fn into_source(self) -> Option<EnergySource> {
        let Some(kind) = source_kind(&self.kind) else {
            debug!("[HA STATS] Ignoring energy source of type '{}'", self.kind);
            return None;
        };

        let mut source = EnergySource::new(kind);
        if kind == SourceKind::Grid {
            source.stat_energy_from = self
                .flow_from
                .into_iter()
                .map(|flow| flow.stat_energy_from)
                .collect();
            source.stat_energy_to = self
                .flow_to
                .into_iter()
                .map(|flow| flow.stat_energy_to)
                .collect();
        } else {
            source.stat_energy_from.extend(self.stat_energy_from);
            source.stat_energy_to.extend(self.stat_energy_to);
        }
        Some(source)
    }
}

/// Parse the stored energy preferences.
///
/// Returns `None` when the energy dashboard was never set up.
pub fn parse_energy_prefs(json: &str) -> HaResult<Option<Vec<EnergySource>>> {
    let stored: StoredPrefs = serde_json::from_str(json)?;
    let Some(prefs) = stored.data else {
        return Ok(None);
    };

    Ok(Some(
        prefs
            .energy_sources
            .into_iter()
            .filter_map(RawSource::into_source)
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_dashboard() {
        let stored = json!({
            "version": 1,
            "minor_version": 1,
            "key": "energy",
            "data": {
                "energy_sources": [
                    {
                        "type": "grid",
                        "flow_from": [
                            {"stat_energy_from": "sensor.grid_in_t1", "stat_cost": null},
                            {"stat_energy_from": "sensor.grid_in_t2", "stat_cost": null}
                        ],
                        "flow_to": [{"stat_energy_to": "sensor.grid_out"}],
                        "cost_adjustment_day": 0.0
                    },
                    {"type": "solar", "stat_energy_from": "sensor.pv", "config_entry_solar_forecast": null},
                    {"type": "battery", "stat_energy_from": "sensor.bat_out", "stat_energy_to": "sensor.bat_in"},
                    {"type": "gas", "stat_energy_from": "sensor.gas_meter"},
                    {"type": "water", "stat_energy_from": "sensor.water_meter"}
                ],
                "device_consumption": [{"stat_consumption": "sensor.fridge"}]
            }
        });

        let sources = parse_energy_prefs(&stored.to_string()).unwrap().unwrap();
        assert_eq!(sources.len(), 5);

        assert_eq!(sources[0].kind, SourceKind::Grid);
        assert_eq!(
            sources[0].stat_energy_from,
            vec!["sensor.grid_in_t1", "sensor.grid_in_t2"]
        );
        assert_eq!(sources[0].stat_energy_to, vec!["sensor.grid_out"]);

        assert_eq!(
            sources[2],
            EnergySource::new(SourceKind::Battery)
                .with_from("sensor.bat_out")
                .with_to("sensor.bat_in")
        );
        assert_eq!(sources[4].stat_energy_from, vec!["sensor.water_meter"]);
    }

    #[test]
    fn test_dashboard_not_set_up() {
        let stored = json!({"version": 1, "key": "energy", "data": null});
        assert!(parse_energy_prefs(&stored.to_string()).unwrap().is_none());
    }

    #[test]
    fn test_empty_and_unknown_sources() {
        let stored = json!({"data": {"energy_sources": [{"type": "wind", "stat_energy_from": "sensor.w"}]}});
        let sources = parse_energy_prefs(&stored.to_string()).unwrap().unwrap();
        assert!(sources.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_energy_prefs("not json").is_err());
    }
}

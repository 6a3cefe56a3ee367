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

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nudge_core::traits::{EnergySourceConfig, StatisticsProvider};
use nudge_types::{EnergySource, Period};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

use crate::client::HomeAssistantClient;
use crate::energy_prefs::parse_energy_prefs;
use crate::errors::HaError;
use crate::types::HistoryDataPoint;

/// Home Assistant adapter implementing StatisticsProvider.
/// Reads the recorded history of cumulative energy/volume meters.
#[derive(Debug)]
pub struct HaStatisticsAdapter {
    client: Arc<HomeAssistantClient>,
}

impl HaStatisticsAdapter {
    pub fn new(client: Arc<HomeAssistantClient>) -> Self {
        Self { client }
    }
}

/// Increase of a cumulative meter over the given points.
///
/// A drop in value is a meter reset; the value after the reset counts as
/// new consumption. `None` without any point.
pub fn accumulated_change(points: &[HistoryDataPoint]) -> Option<f64> {
    let first = points.first()?;
    let mut change = 0.0;
    let mut previous = first.value;

    for point in points.iter().skip(1) {
        let delta = point.value - previous;
        if delta >= 0.0 {
            change += delta;
        } else {
            trace!(
                "[HA STATS] Meter reset at {}: {} -> {}",
                point.timestamp, previous, point.value
            );
            change += point.value;
        }
        previous = point.value;
    }

    Some(change)
}

#[async_trait]
impl StatisticsProvider for HaStatisticsAdapter {
    async fn sum_change(
        &self,
        statistic_ids: &[String],
        period: Period,
        window_start: DateTime<Utc>,
    ) -> Result<HashMap<String, f64>> {
        debug!(
            "📊 [HA STATS] {} statistics since {window_start} ({} buckets)",
            statistic_ids.len(),
            period.statistic_granularity().as_str()
        );

        let mut changes = HashMap::with_capacity(statistic_ids.len());
        for statistic_id in statistic_ids {
            let points = match self
                .client
                .get_history(statistic_id, window_start, None)
                .await
            {
                Ok(points) => points,
                Err(HaError::EntityNotFound(_)) => {
                    warn!("⚠️ [HA STATS] Statistic {statistic_id} not found, skipping");
                    continue;
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to read history of {statistic_id}"));
                }
            };

            match accumulated_change(&points) {
                Some(change) => {
                    trace!("[HA STATS] {statistic_id}: +{change:.3}");
                    changes.insert(statistic_id.clone(), change);
                }
                None => debug!("[HA STATS] No data for {statistic_id} in {period} window"),
            }
        }

        Ok(changes)
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.ping().await.map_err(|e| anyhow::anyhow!(e))
    }

    fn name(&self) -> &str {
        "HomeAssistant"
    }
}

/// Energy dashboard sources read from the HA storage file
#[derive(Debug, Clone)]
pub struct HaEnergySources {
    prefs_path: PathBuf,
}

impl HaEnergySources {
    pub fn new(prefs_path: impl Into<PathBuf>) -> Self {
        Self {
            prefs_path: prefs_path.into(),
        }
    }
}

#[async_trait]
impl EnergySourceConfig for HaEnergySources {
    async fn list_sources(&self) -> Result<Option<Vec<EnergySource>>> {
        let json = match tokio::fs::read_to_string(&self.prefs_path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "[HA STATS] No energy preferences at {}, dashboard not set up",
                    self.prefs_path.display()
                );
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!(
                        "Failed to read energy preferences: {}",
                        self.prefs_path.display()
                    )
                });
            }
        };

        let sources = parse_energy_prefs(&json).with_context(|| {
            format!(
                "Failed to parse energy preferences: {}",
                self.prefs_path.display()
            )
        })?;

        if let Some(sources) = &sources {
            info!("⚡ [HA STATS] {} energy sources configured", sources.len());
        }
        Ok(sources)
    }

    fn name(&self) -> &str {
        "HomeAssistantEnergy"
    }
}

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

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nudge_types::{EnergySource, EntityDomain, NudgeError, NudgeResult, Period, UniqueId};
use std::collections::HashMap;

// ============= Host Collaborators =============

/// Long-term statistics store of the host
#[async_trait]
pub trait StatisticsProvider: Send + Sync {
    /// Accumulated change of each statistic since `window_start`.
    ///
    /// `period` selects the bucket size of the query. Statistics without
    /// data may be missing from the result.
    async fn sum_change(
        &self,
        statistic_ids: &[String],
        period: Period,
        window_start: DateTime<Utc>,
    ) -> Result<HashMap<String, f64>>;

    /// Check if the store is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Energy dashboard configuration of the host
#[async_trait]
pub trait EnergySourceConfig: Send + Sync {
    /// Configured energy sources, `None` when the dashboard is not set up
    async fn list_sources(&self) -> Result<Option<Vec<EnergySource>>>;

    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Lookup of live counters by the stable id recorded at setup
pub trait EntityDirectory {
    type Handle;

    /// Best-effort lookup, `None` while the target is not created yet
    fn resolve(&self, unique_id: &UniqueId, domain: EntityDomain) -> Option<Self::Handle>;

    /// Like `resolve`, with a miss reported as a transient error
    fn lookup(&self, unique_id: &UniqueId, domain: EntityDomain) -> NudgeResult<Self::Handle> {
        self.resolve(unique_id, domain)
            .ok_or_else(|| NudgeError::LookupMiss {
                unique_id: unique_id.clone(),
                domain,
            })
    }
}

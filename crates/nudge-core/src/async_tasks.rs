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
use chrono::{DateTime, Utc};
use crossbeam_channel::Receiver;
use nudge_types::{NudgeCategory, Period};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Requests waiting for the worker before new ones are dropped
pub const STATISTICS_CHANNEL_CAPACITY: usize = 64;

/// Health reports buffered for the ECS side
pub const HEALTH_CHANNEL_CAPACITY: usize = 8;

// ============= Statistics Fetcher =============

/// One statistics query for one category and period
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsRequest {
    pub category: NudgeCategory,
    pub period: Period,
    pub statistic_ids: Vec<String>,
    pub window_start: DateTime<Utc>,
    /// Evaluation time stamped on the resulting reading
    pub at: DateTime<Utc>,
}

/// Answer of the worker to one request
#[derive(Debug)]
pub struct StatisticsUpdate {
    pub category: NudgeCategory,
    pub period: Period,
    pub at: DateTime<Utc>,
    pub changes: anyhow::Result<HashMap<String, f64>>,
}

/// Component marking this entity as the statistics fetcher worker
#[derive(Component, Debug)]
pub struct StatisticsFetcher {
    pub source_name: String,
    /// Last reported reachability of the store, `None` before the first check
    pub healthy: Option<bool>,
}

impl StatisticsFetcher {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            healthy: None,
        }
    }
}

/// Component that holds the request sender and the update receiver
#[derive(Component, Debug)]
pub struct StatisticsChannel {
    /// Send requests to the background worker
    pub sender: mpsc::Sender<StatisticsRequest>,
    /// Receive updates from the background worker
    pub receiver: Receiver<StatisticsUpdate>,
    /// Receive health check results from the background worker
    pub health: Receiver<bool>,
}

/// Worker side of a statistics channel
#[derive(Debug)]
pub struct StatisticsWorkerEnds {
    pub requests: mpsc::Receiver<StatisticsRequest>,
    pub updates: crossbeam_channel::Sender<StatisticsUpdate>,
    pub health: crossbeam_channel::Sender<bool>,
}

/// Create both ends of a statistics channel
pub fn statistics_channel() -> (StatisticsChannel, StatisticsWorkerEnds) {
    let (request_tx, request_rx) = mpsc::channel(STATISTICS_CHANNEL_CAPACITY);
    let (update_tx, update_rx) = crossbeam_channel::bounded(STATISTICS_CHANNEL_CAPACITY);
    let (health_tx, health_rx) = crossbeam_channel::bounded(HEALTH_CHANNEL_CAPACITY);
    (
        StatisticsChannel {
            sender: request_tx,
            receiver: update_rx,
            health: health_rx,
        },
        StatisticsWorkerEnds {
            requests: request_rx,
            updates: update_tx,
            health: health_tx,
        },
    )
}

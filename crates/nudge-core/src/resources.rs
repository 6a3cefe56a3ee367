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
use chrono_tz::Tz;
use nudge_types::{EntityDomain, GoalSet, NudgeCategory, Rank, UniqueId};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::traits::{EntityDirectory, StatisticsProvider};

/// A pending transition is dropped after this many unresolved ticks
pub const PENDING_MAX_ATTEMPTS: u32 = 10;

// ============= Goals =============

/// Goal sets of the configured categories
#[derive(Resource, Debug, Clone, Default)]
pub struct HouseholdGoals {
    pub sets: BTreeMap<NudgeCategory, GoalSet>,
}

impl HouseholdGoals {
    pub fn new(goal_sets: impl IntoIterator<Item = GoalSet>) -> Self {
        Self {
            sets: goal_sets
                .into_iter()
                .map(|set| (set.category, set))
                .collect(),
        }
    }

    pub fn get(&self, category: NudgeCategory) -> Option<&GoalSet> {
        self.sets.get(&category)
    }
}

/// Timezone used to compute period windows
#[derive(Resource, Debug, Clone, Copy)]
pub struct HouseholdTimezone(pub Tz);

impl Default for HouseholdTimezone {
    fn default() -> Self {
        Self(Tz::UTC)
    }
}

// ============= Collaborators =============

/// Statistics store used by the statistics worker
#[derive(Resource, Clone)]
pub struct StatisticsProviderResource(pub Arc<dyn StatisticsProvider>);

impl std::fmt::Debug for StatisticsProviderResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StatisticsProviderResource")
            .field(&self.0.name())
            .finish()
    }
}

// ============= Entity Directory =============

/// Live entities by the unique id recorded at setup
#[derive(Resource, Debug, Default)]
pub struct EntityRegistry {
    entities: HashMap<(UniqueId, EntityDomain), Entity>,
}

impl EntityRegistry {
    pub fn register(&mut self, unique_id: UniqueId, domain: EntityDomain, entity: Entity) {
        self.entities.insert((unique_id, domain), entity);
    }

    pub fn unregister(&mut self, unique_id: &UniqueId, domain: EntityDomain) -> Option<Entity> {
        self.entities.remove(&(unique_id.clone(), domain))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityDirectory for EntityRegistry {
    type Handle = Entity;

    fn resolve(&self, unique_id: &UniqueId, domain: EntityDomain) -> Option<Entity> {
        self.entities.get(&(unique_id.clone(), domain)).copied()
    }
}

// ============= Pending Transitions =============

/// Change waiting for its target counter to become resolvable
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Daily result applied to a score counter
    Award { reached: bool },
    /// Daily result applied to a streak counter
    Streak { reached: bool },
    Rank(Rank),
    /// Manual set of a score or streak counter
    Set(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingTransition {
    pub target: UniqueId,
    pub domain: EntityDomain,
    pub transition: Transition,
    /// Ticks the target was not resolvable
    pub attempts: u32,
}

/// Transitions retried on every tick until their target resolves
#[derive(Resource, Debug, Default)]
pub struct PendingTransitions {
    queue: Vec<PendingTransition>,
}

impl PendingTransitions {
    pub fn push(&mut self, target: UniqueId, domain: EntityDomain, transition: Transition) {
        self.queue.push(PendingTransition {
            target,
            domain,
            transition,
            attempts: 0,
        });
    }

    /// Take all queued transitions, in arrival order
    pub fn drain(&mut self) -> Vec<PendingTransition> {
        std::mem::take(&mut self.queue)
    }

    /// Queue a transition again after a miss
    pub fn retry(&mut self, mut pending: PendingTransition) {
        pending.attempts += 1;
        self.queue.push(pending);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

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

use thiserror::Error;

use crate::category::NudgeCategory;
use crate::identity::{EntityDomain, UniqueId};

/// Errors raised by nudge configuration and cross-entity lookups.
///
/// Computation guards (zero goal, zero total consumption) are not errors:
/// they resolve to sentinel readings, see `BudgetReading::NoData`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NudgeError {
    #[error("Goal must be a positive number, got {0}")]
    NonPositiveGoal(f64),

    #[error("Reduction goal must be between 0 and {max}%, got {value}%")]
    ReductionOutOfRange { value: u8, max: u8 },

    #[error("{category} nudge needs a {required} source in the energy configuration")]
    MissingSource {
        category: NudgeCategory,
        required: String,
    },

    #[error("{0} nudge has no statistic to track")]
    Untracked(NudgeCategory),

    #[error("Energy dashboard not configured")]
    EnergyNotConfigured,

    #[error("Invalid value for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("{domain} entity '{unique_id}' is not available yet")]
    LookupMiss {
        unique_id: UniqueId,
        domain: EntityDomain,
    },
}

impl NudgeError {
    /// Configuration errors abort the configuration step
    pub fn is_configuration_error(&self) -> bool {
        !self.is_transient()
    }

    /// Transient errors are retried on the next evaluation tick
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::LookupMiss { .. })
    }
}

pub type NudgeResult<T> = Result<T, NudgeError>;

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

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::category::NudgeCategory;

/// Display-only ranking among peers, rendered as "position/length"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub position: u32,
    pub length: u32,
}

impl Rank {
    pub fn new(position: u32, length: u32) -> Self {
        Self { position, length }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.position, self.length)
    }
}

/// Points collected by one category in the current year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub category: NudgeCategory,
    pub points: u32,
    pub rank: Rank,
}

/// Consecutive days on which a category reached its daily goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub category: NudgeCategory,
    pub consecutive_days: u32,
}

/// Snapshot of all scores of a household
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalScore {
    pub points: u64,
    pub per_category: BTreeMap<NudgeCategory, u32>,
    pub rank: Rank,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_display() {
        assert_eq!(Rank::default().to_string(), "0/0");
        assert_eq!(Rank::new(3, 12).to_string(), "3/12");
    }
}

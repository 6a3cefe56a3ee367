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

//! Score and streak counters.
//!
//! Each day boundary moves points and streak by at most one. Points are
//! reset at the start of a calendar year, the streak only by a missed day.
//! Every firing is applied as received; a duplicate day boundary counts twice.

use nudge_types::{NudgeCategory, NudgeError, NudgeResult, Rank, ScoreState, StreakState, TotalScore};
use std::collections::BTreeMap;
use tracing::{debug, info};

// ============= Transitions =============

/// Day boundary on a score: +1 point when reached, unchanged on a miss
pub fn award(score: &mut ScoreState, reached: bool) {
    if reached {
        score.points = score.points.saturating_add(1);
    }
}

/// Day boundary on a streak: +1 when reached, back to 0 on a miss
pub fn advance_streak(streak: &mut StreakState, reached: bool) {
    if reached {
        streak.consecutive_days = streak.consecutive_days.saturating_add(1);
    } else {
        streak.consecutive_days = 0;
    }
}

/// Year boundary on a score
pub fn reset_year(score: &mut ScoreState) {
    score.points = 0;
}

/// Validate a counter value set by hand.
///
/// Counters only hold whole, non-negative numbers.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn counter_from_value(value: f64) -> NudgeResult<u32> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(NudgeError::InvalidInput {
            field: "value".to_owned(),
            message: format!("counter must be a whole non-negative number, got {value}"),
        });
    }
    Ok(value as u32)
}

// ============= Ledger =============

/// Score and streak of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLedger {
    pub score: ScoreState,
    pub streak: StreakState,
}

impl ScoreLedger {
    pub fn new(category: NudgeCategory) -> Self {
        Self::restore(category, None, None)
    }

    /// Restore counters from their last known values, 0 when there are none
    pub fn restore(category: NudgeCategory, points: Option<u32>, streak: Option<u32>) -> Self {
        Self {
            score: ScoreState {
                category,
                points: points.unwrap_or(0),
                rank: Rank::default(),
            },
            streak: StreakState {
                category,
                consecutive_days: streak.unwrap_or(0),
            },
        }
    }

    pub fn category(&self) -> NudgeCategory {
        self.score.category
    }

    pub fn points(&self) -> u32 {
        self.score.points
    }

    pub fn consecutive_days(&self) -> u32 {
        self.streak.consecutive_days
    }

    pub fn notify_day_boundary(&mut self, reached: bool) {
        award(&mut self.score, reached);
        advance_streak(&mut self.streak, reached);
        debug!(
            "[SCORE] {} day boundary (reached={reached}): points={}, streak={}",
            self.category(),
            self.score.points,
            self.streak.consecutive_days
        );
    }

    pub fn notify_year_boundary(&mut self) {
        info!(
            "🎆 [SCORE] {} new year: resetting {} points",
            self.category(),
            self.score.points
        );
        reset_year(&mut self.score);
    }

    /// Display-only, does not touch points or streak
    pub fn set_rank(&mut self, position: u32, length: u32) {
        self.score.rank = Rank::new(position, length);
    }
}

/// Scores of every configured category of a household
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    ledgers: BTreeMap<NudgeCategory, ScoreLedger>,
    rank: Rank,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category, keeping its counters when it is already present
    pub fn insert(&mut self, ledger: ScoreLedger) {
        self.ledgers.entry(ledger.category()).or_insert(ledger);
    }

    pub fn remove(&mut self, category: NudgeCategory) -> Option<ScoreLedger> {
        self.ledgers.remove(&category)
    }

    pub fn ledger(&self, category: NudgeCategory) -> Option<&ScoreLedger> {
        self.ledgers.get(&category)
    }

    pub fn ledger_mut(&mut self, category: NudgeCategory) -> Option<&mut ScoreLedger> {
        self.ledgers.get_mut(&category)
    }

    pub fn set_rank(&mut self, position: u32, length: u32) {
        self.rank = Rank::new(position, length);
    }

    /// Year boundary for every category
    pub fn notify_year_boundary(&mut self) {
        for ledger in self.ledgers.values_mut() {
            ledger.notify_year_boundary();
        }
    }

    /// Recompute the total from the current points
    pub fn total(&self) -> TotalScore {
        total_score(self.ledgers.values().map(|ledger| &ledger.score), self.rank)
    }
}

/// Sum the points of the given scores, with a per-category breakdown
pub fn total_score<'a>(scores: impl IntoIterator<Item = &'a ScoreState>, rank: Rank) -> TotalScore {
    let per_category: BTreeMap<NudgeCategory, u32> = scores
        .into_iter()
        .map(|score| (score.category, score.points))
        .collect();
    let points = per_category.values().map(|points| u64::from(*points)).sum();

    TotalScore {
        points,
        per_category,
        rank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_reached_days_then_a_miss() {
        let mut ledger = ScoreLedger::new(NudgeCategory::Electricity);
        for _ in 0..5 {
            ledger.notify_day_boundary(true);
        }
        assert_eq!(ledger.points(), 5);
        assert_eq!(ledger.consecutive_days(), 5);

        ledger.notify_day_boundary(false);
        assert_eq!(ledger.points(), 5);
        assert_eq!(ledger.consecutive_days(), 0);
    }

    #[test]
    fn test_year_boundary_keeps_streak() {
        let mut ledger = ScoreLedger::restore(NudgeCategory::Water, Some(5), Some(3));
        ledger.notify_year_boundary();
        assert_eq!(ledger.points(), 0);
        assert_eq!(ledger.consecutive_days(), 3);
    }

    #[test]
    fn test_duplicate_day_boundary_double_counts() {
        let mut ledger = ScoreLedger::new(NudgeCategory::Heat);
        ledger.notify_day_boundary(true);
        ledger.notify_day_boundary(true);
        assert_eq!(ledger.points(), 2);
    }

    #[test]
    fn test_rank_is_display_only() {
        let mut ledger = ScoreLedger::restore(NudgeCategory::Autarky, Some(4), Some(2));
        ledger.set_rank(2, 7);
        assert_eq!(ledger.score.rank.to_string(), "2/7");
        assert_eq!(ledger.points(), 4);
        assert_eq!(ledger.consecutive_days(), 2);
    }

    #[test]
    fn test_total_follows_configured_categories() {
        let mut board = ScoreBoard::new();
        board.insert(ScoreLedger::restore(NudgeCategory::Electricity, Some(5), None));
        board.insert(ScoreLedger::restore(NudgeCategory::Water, Some(3), None));
        board.set_rank(1, 4);

        let total = board.total();
        assert_eq!(total.points, 8);
        assert_eq!(total.per_category[&NudgeCategory::Water], 3);
        assert_eq!(total.rank.to_string(), "1/4");

        board.remove(NudgeCategory::Water);
        assert_eq!(board.total().points, 5);
        assert!(!board.total().per_category.contains_key(&NudgeCategory::Water));
    }

    #[test]
    fn test_insert_keeps_existing_counters() {
        let mut board = ScoreBoard::new();
        board.insert(ScoreLedger::restore(NudgeCategory::Heat, Some(9), None));
        board.insert(ScoreLedger::new(NudgeCategory::Heat));
        assert_eq!(board.ledger(NudgeCategory::Heat).unwrap().points(), 9);
    }

    #[test]
    fn test_counter_from_value() {
        assert_eq!(counter_from_value(12.0), Ok(12));
        assert!(counter_from_value(1.5).is_err());
        assert!(counter_from_value(-1.0).is_err());
        assert!(counter_from_value(f64::NAN).is_err());
    }
}

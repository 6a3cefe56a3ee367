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
use chrono::NaiveDate;
use chrono_tz::Tz;
use nudge_types::{
    BudgetReading, Goal, NudgeCategory, Period, Rank, ScoreState, StreakState, TotalScore,
    UniqueId,
};

// ============= Budget Sensors =============

/// Progress of one category in one period
#[derive(Component, Debug, Clone)]
pub struct BudgetSensor {
    pub unique_id: UniqueId,
    /// Household device the sensor belongs to
    pub entry_id: String,
    pub goal: Goal,
    /// Latest evaluation, `None` until the first statistics arrive
    pub reading: Option<BudgetReading>,
}

impl BudgetSensor {
    pub fn new(entry_id: &str, goal: Goal) -> Self {
        Self {
            unique_id: UniqueId::nudge(entry_id, goal.category, goal.period),
            entry_id: entry_id.to_owned(),
            goal,
            reading: None,
        }
    }

    pub fn category(&self) -> NudgeCategory {
        self.goal.category
    }

    pub fn period(&self) -> Period {
        self.goal.period
    }

    /// Reading evaluated on the local calendar `day`, if any
    pub fn reading_on(&self, day: NaiveDate, timezone: &Tz) -> Option<&BudgetReading> {
        self.reading
            .as_ref()
            .filter(|reading| reading.at().with_timezone(timezone).date_naive() == day)
    }

    /// Whether the goal was reached on `day`.
    ///
    /// No reading, or one left over from an earlier day, counts as a miss.
    pub fn reached_on(&self, day: NaiveDate, timezone: &Tz) -> bool {
        self.reading_on(day, timezone)
            .is_some_and(BudgetReading::reached)
    }
}

// ============= Counters =============

/// Points of one category, settable by the user
#[derive(Component, Debug, Clone)]
pub struct ScoreCounter {
    pub unique_id: UniqueId,
    pub entry_id: String,
    pub state: ScoreState,
}

impl ScoreCounter {
    pub fn new(entry_id: &str, category: NudgeCategory, points: u32) -> Self {
        Self {
            unique_id: UniqueId::score(entry_id, category),
            entry_id: entry_id.to_owned(),
            state: ScoreState {
                category,
                points,
                rank: Rank::default(),
            },
        }
    }
}

/// Consecutive reached days of one category, settable by the user
#[derive(Component, Debug, Clone)]
pub struct StreakCounter {
    pub unique_id: UniqueId,
    pub entry_id: String,
    pub state: StreakState,
}

impl StreakCounter {
    pub fn new(entry_id: &str, category: NudgeCategory, consecutive_days: u32) -> Self {
        Self {
            unique_id: UniqueId::streak(entry_id, category),
            entry_id: entry_id.to_owned(),
            state: StreakState {
                category,
                consecutive_days,
            },
        }
    }
}

/// Sum of all score counters of the household
#[derive(Component, Debug, Clone)]
pub struct TotalCounter {
    pub unique_id: UniqueId,
    pub entry_id: String,
    pub state: TotalScore,
}

impl TotalCounter {
    pub fn new(entry_id: &str) -> Self {
        Self {
            unique_id: UniqueId::total_score(entry_id),
            entry_id: entry_id.to_owned(),
            state: TotalScore::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_reached_on_uses_local_day() {
        let goal = Goal::new(NudgeCategory::Electricity, Period::Daily, 10.0);
        let mut sensor = BudgetSensor::new("house", goal.clone());
        let prague = chrono_tz::Europe::Prague;
        let june = |day| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();

        assert!(!sensor.reached_on(june(10), &prague));

        // 22:30 UTC is already the 11th in Prague (CEST)
        let at = Utc.with_ymd_and_hms(2025, 6, 10, 22, 30, 0).unwrap();
        sensor.reading = Some(evaluate(&goal, 4.0, at));

        assert!(sensor.reached_on(june(11), &prague));
        assert!(!sensor.reached_on(june(10), &prague));
        assert!(sensor.reached_on(june(10), &Tz::UTC));
        assert!(sensor.reading_on(june(12), &prague).is_none());
    }
}

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

//! What the host renders for each sensor and counter.

use nudge_types::{BudgetReading, EntityDomain, UniqueId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::components::{BudgetSensor, ScoreCounter, StreakCounter, TotalCounter};

/// Capability shared by everything the household exposes to the host
pub trait NudgeEntity {
    fn unique_id(&self) -> &UniqueId;

    fn domain(&self) -> EntityDomain;

    /// Human readable name
    fn name(&self) -> String;

    /// Device the host groups the entity under
    fn device_id(&self) -> String;

    /// Current state, `None` renders as unknown
    fn native_value(&self) -> Option<f64>;

    fn unit(&self) -> Option<&str> {
        None
    }

    /// Extra state attributes as a JSON object
    fn state_attributes(&self) -> Value {
        Value::Object(Map::new())
    }

    fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            unique_id: self.unique_id().clone(),
            domain: self.domain(),
            name: self.name(),
            device_id: self.device_id(),
            state: self.native_value(),
            unit: self.unit().map(str::to_owned),
            attributes: self.state_attributes(),
        }
    }
}

/// Serializable state of one entity as handed to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub unique_id: UniqueId,
    pub domain: EntityDomain,
    pub name: String,
    pub device_id: String,
    pub state: Option<f64>,
    pub unit: Option<String>,
    pub attributes: Value,
}

/// Device holding scores, streaks and the total of a household
pub fn score_board_device(entry_id: &str) -> String {
    format!("{entry_id}_score_board")
}

impl NudgeEntity for BudgetSensor {
    fn unique_id(&self) -> &UniqueId {
        &self.unique_id
    }

    fn domain(&self) -> EntityDomain {
        EntityDomain::Sensor
    }

    fn name(&self) -> String {
        format!(
            "{} {}",
            self.goal.category.display_name(),
            self.goal.period.name()
        )
    }

    fn device_id(&self) -> String {
        format!("{}_{}", self.entry_id, self.goal.category.key())
    }

    #[expect(clippy::cast_precision_loss)]
    fn native_value(&self) -> Option<f64> {
        self.reading
            .as_ref()
            .and_then(BudgetReading::state)
            .map(|state| state.percent_of_goal as f64)
    }

    fn unit(&self) -> Option<&str> {
        Some("%")
    }

    fn state_attributes(&self) -> Value {
        let unit = &self.goal.unit;
        match &self.reading {
            Some(BudgetReading::Available(state)) => json!({
                "last_update": state.last_update.to_rfc3339(),
                "actual": state.actual,
                "goal": state.goal.target,
                "actual/goal": format!("{} {unit} / {} {unit}", state.actual, state.goal.target),
            }),
            Some(BudgetReading::NoData { reason, at, .. }) => json!({
                "last_update": at.to_rfc3339(),
                "goal": self.goal.target,
                "no_data": reason.to_string(),
            }),
            None => json!({
                "goal": self.goal.target,
            }),
        }
    }
}

impl NudgeEntity for ScoreCounter {
    fn unique_id(&self) -> &UniqueId {
        &self.unique_id
    }

    fn domain(&self) -> EntityDomain {
        EntityDomain::Number
    }

    fn name(&self) -> String {
        format!("{} Score", self.state.category.display_name())
    }

    fn device_id(&self) -> String {
        score_board_device(&self.entry_id)
    }

    fn native_value(&self) -> Option<f64> {
        Some(f64::from(self.state.points))
    }

    fn unit(&self) -> Option<&str> {
        Some("points")
    }

    fn state_attributes(&self) -> Value {
        json!({ "rank": self.state.rank.to_string() })
    }
}

impl NudgeEntity for StreakCounter {
    fn unique_id(&self) -> &UniqueId {
        &self.unique_id
    }

    fn domain(&self) -> EntityDomain {
        EntityDomain::Number
    }

    fn name(&self) -> String {
        format!("{} Streak", self.state.category.display_name())
    }

    fn device_id(&self) -> String {
        score_board_device(&self.entry_id)
    }

    fn native_value(&self) -> Option<f64> {
        Some(f64::from(self.state.consecutive_days))
    }

    fn unit(&self) -> Option<&str> {
        Some("days")
    }
}

impl NudgeEntity for TotalCounter {
    fn unique_id(&self) -> &UniqueId {
        &self.unique_id
    }

    fn domain(&self) -> EntityDomain {
        EntityDomain::Sensor
    }

    fn name(&self) -> String {
        "Total Score".to_owned()
    }

    fn device_id(&self) -> String {
        score_board_device(&self.entry_id)
    }

    #[expect(clippy::cast_precision_loss)]
    fn native_value(&self) -> Option<f64> {
        Some(self.state.points as f64)
    }

    fn unit(&self) -> Option<&str> {
        Some("points")
    }

    fn state_attributes(&self) -> Value {
        let mut attributes: Map<String, Value> = self
            .state
            .per_category
            .iter()
            .map(|(category, points)| (category.display_name().to_owned(), Value::from(*points)))
            .collect();
        attributes.insert("Total".to_owned(), Value::from(self.state.rank.to_string()));
        Value::Object(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nudge_types::{BudgetState, Goal, GuardReason, NudgeCategory, Period, Rank};

    fn daily_electricity() -> BudgetSensor {
        BudgetSensor::new("abc", Goal::new(NudgeCategory::Electricity, Period::Daily, 10.0))
    }

    #[test]
    fn test_budget_sensor_without_reading() {
        let sensor = daily_electricity();
        assert_eq!(sensor.unique_id().as_str(), "abc_electricity_Daily");
        assert_eq!(sensor.name(), "Electricity Daily");
        assert_eq!(sensor.native_value(), None);
        assert_eq!(sensor.state_attributes(), json!({ "goal": 10.0 }));
    }

    #[test]
    fn test_budget_sensor_attributes() {
        let mut sensor = daily_electricity();
        let at = Utc.with_ymd_and_hms(2025, 5, 4, 12, 0, 0).unwrap();
        sensor.reading = Some(BudgetReading::Available(BudgetState {
            category: NudgeCategory::Electricity,
            period: Period::Daily,
            goal: sensor.goal.clone(),
            actual: 7.5,
            percent_of_goal: 75,
            reached: true,
            last_update: at,
        }));

        let snapshot = sensor.snapshot();
        assert_eq!(snapshot.state, Some(75.0));
        assert_eq!(snapshot.unit.as_deref(), Some("%"));
        assert_eq!(snapshot.device_id, "abc_electricity");
        assert_eq!(snapshot.attributes["actual/goal"], "7.5 kWh / 10 kWh");
        assert_eq!(snapshot.attributes["last_update"], "2025-05-04T12:00:00+00:00");
    }

    #[test]
    fn test_no_data_reading_is_unknown() {
        let mut sensor = daily_electricity();
        sensor.reading = Some(BudgetReading::NoData {
            category: NudgeCategory::Electricity,
            period: Period::Daily,
            reason: GuardReason::NonPositiveGoal,
            at: Utc::now(),
        });
        assert_eq!(sensor.native_value(), None);
        assert_eq!(sensor.state_attributes()["no_data"], "goal is not positive");
    }

    #[test]
    fn test_counters_share_score_board_device() {
        let mut score = ScoreCounter::new("abc", NudgeCategory::Heat, 12);
        score.state.rank = Rank::new(2, 7);
        let streak = StreakCounter::new("abc", NudgeCategory::Heat, 3);
        let mut total = TotalCounter::new("abc");
        total.state.points = 12;
        total.state.per_category.insert(NudgeCategory::Heat, 12);

        assert_eq!(score.unique_id().as_str(), "abc_HEAT_Score");
        assert_eq!(score.state_attributes(), json!({ "rank": "2/7" }));
        assert_eq!(streak.native_value(), Some(3.0));
        assert_eq!(streak.state_attributes(), json!({}));
        assert_eq!(
            total.state_attributes(),
            json!({ "Heat": 12, "Total": "0/0" })
        );
        assert_eq!(score.device_id(), total.device_id());
        assert_eq!(streak.device_id(), "abc_score_board");
    }
}

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

//! Split a yearly goal into per-period targets.

use nudge_types::{NudgeError, NudgeResult, Period};
use std::collections::BTreeMap;

const DAYS_PER_YEAR: f64 = 365.0;
const DAYS_PER_WEEK: f64 = 7.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Decompose a yearly goal into Daily / Weekly / Monthly / Yearly targets.
///
/// No rounding is applied; the values are displayed as percent-of-goal only.
pub fn decompose(yearly: f64) -> NudgeResult<BTreeMap<Period, f64>> {
    if !yearly.is_finite() || yearly <= 0.0 {
        return Err(NudgeError::NonPositiveGoal(yearly));
    }

    let daily = yearly / DAYS_PER_YEAR;
    Ok(BTreeMap::from([
        (Period::Yearly, yearly),
        (Period::Daily, daily),
        (Period::Weekly, daily * DAYS_PER_WEEK),
        (Period::Monthly, yearly / MONTHS_PER_YEAR),
    ]))
}

/// Target that stays the same for every period (ratios such as autarky)
pub fn uniform(target: f64) -> NudgeResult<BTreeMap<Period, f64>> {
    if !target.is_finite() || target <= 0.0 {
        return Err(NudgeError::NonPositiveGoal(target));
    }
    Ok(Period::all().iter().map(|period| (*period, target)).collect())
}

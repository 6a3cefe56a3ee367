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

//! Start of the statistics window of a period, in local time.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use nudge_types::Period;
use tracing::warn;

/// Truncate `now` to the start of its day, ISO week (Monday), month or year
pub fn window_start<T: TimeZone>(period: Period, now: &DateTime<T>) -> DateTime<Utc> {
    let today = now.date_naive();
    let start = match period {
        Period::Daily => today,
        Period::Weekly => today
            .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_monday())))
            .unwrap_or(today),
        Period::Monthly => today.with_day(1).unwrap_or(today),
        Period::Yearly => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
    };

    localize(&now.timezone(), start.and_time(NaiveTime::MIN))
}

/// Resolve a local wall-clock time, stepping over DST gaps
fn localize<T: TimeZone>(tz: &T, local: NaiveDateTime) -> DateTime<Utc> {
    if let Some(resolved) = tz.from_local_datetime(&local).earliest() {
        return resolved.with_timezone(&Utc);
    }
    // Midnight falls into a DST gap in a few zones; the day starts an hour later
    let shifted = local + TimeDelta::hours(1);
    tz.from_local_datetime(&shifted)
        .earliest()
        .map_or_else(|| shifted.and_utc(), |resolved| resolved.with_timezone(&Utc))
}

/// Parse an IANA timezone name, UTC when missing or unknown
pub fn parse_timezone(name: Option<&str>) -> Tz {
    match name {
        Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            warn!("⚠️ [NUDGE] Unknown timezone '{name}', using UTC for period windows");
            Tz::UTC
        }),
        None => Tz::UTC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prague(y: i32, m: u32, d: u32, h: u32) -> DateTime<Tz> {
        chrono_tz::Europe::Prague
            .with_ymd_and_hms(y, m, d, h, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_daily_window_starts_at_local_midnight() {
        // 2025-03-13 is a Thursday, CET = UTC+1
        let start = window_start(Period::Daily, &prague(2025, 3, 13, 14));
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 12, 23, 0, 0).unwrap());
    }

    #[test]
    fn test_weekly_window_starts_on_monday() {
        let start = window_start(Period::Weekly, &prague(2025, 3, 13, 14));
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 9, 23, 0, 0).unwrap());

        // Monday itself stays
        let start = window_start(Period::Weekly, &prague(2025, 3, 10, 0));
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 9, 23, 0, 0).unwrap());
    }

    #[test]
    fn test_monthly_and_yearly_windows_truncate() {
        // CEST = UTC+2 in July
        let now = prague(2025, 7, 19, 8);
        assert_eq!(
            window_start(Period::Monthly, &now),
            Utc.with_ymd_and_hms(2025, 6, 30, 22, 0, 0).unwrap()
        );
        assert_eq!(
            window_start(Period::Yearly, &now),
            Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_utc_window() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 18, 0, 0).unwrap();
        assert_eq!(
            window_start(Period::Monthly, &now),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone(Some("Europe/Prague")), chrono_tz::Europe::Prague);
        assert_eq!(parse_timezone(Some("Mars/Olympus")), Tz::UTC);
        assert_eq!(parse_timezone(None), Tz::UTC);
    }
}

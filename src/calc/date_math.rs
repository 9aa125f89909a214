use crate::calc::compare::is_same_or_between;
use crate::data::model::WeekStart;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Absolute lower bound used when no minimum date is configured.
pub fn absolute_min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Absolute upper bound used when no maximum date is configured.
pub fn absolute_max_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2154, 12, 31).unwrap_or(NaiveDate::MAX)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    match (
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
        NaiveDate::from_ymd_opt(year, month, 1),
    ) {
        (Some(next), Some(first)) => next.signed_duration_since(first).num_days() as u32,
        _ => 31,
    }
}

pub fn date_without_time(value: NaiveDateTime) -> NaiveDateTime {
    value.date().and_time(NaiveTime::MIN)
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

pub fn add_days_in_range(
    date: NaiveDate,
    days: i64,
    min: Option<NaiveDate>,
    max: Option<NaiveDate>,
) -> NaiveDate {
    date_same_or_between(add_days(date, days), min, max)
}

/// Sets the day of month, clamped to the last day of that month.
pub fn change_day(date: NaiveDate, day: u32) -> NaiveDate {
    let last = days_in_month(date.year(), date.month());
    NaiveDate::from_ymd_opt(date.year(), date.month(), day.clamp(1, last)).unwrap_or(date)
}

/// Moves `date` by whole months, keeping the day of month when it exists in the
/// target month and clamping to the month end otherwise.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.month() as i32 - 1 + months;
    let new_month = (total.rem_euclid(12) + 1) as u32;
    let new_year = date.year() + total.div_euclid(12);
    match NaiveDate::from_ymd_opt(new_year, new_month, 1) {
        Some(first) => change_day(first, date.day()),
        None => date,
    }
}

pub fn add_months_in_range(
    date: NaiveDate,
    months: i32,
    min: Option<NaiveDate>,
    max: Option<NaiveDate>,
) -> NaiveDate {
    date_same_or_between(add_months(date, months), min, max)
}

/// Feb 29 moved into a non-leap year lands on Feb 28.
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    add_months(date, years.saturating_mul(12))
}

pub fn add_years_in_range(
    date: NaiveDate,
    years: i32,
    min: Option<NaiveDate>,
    max: Option<NaiveDate>,
) -> NaiveDate {
    date_same_or_between(add_years(date, years), min, max)
}

/// Returns `date` when it lies within the inclusive bounds, otherwise the bound
/// closest to it. Equal distances resolve to `max`.
pub fn date_same_or_between(date: NaiveDate, min: Option<NaiveDate>, max: Option<NaiveDate>) -> NaiveDate {
    if is_same_or_between(date, min, max) {
        return date;
    }
    let distance = |bound: Option<NaiveDate>| {
        bound.map(|b| (date - b).num_days().unsigned_abs()).unwrap_or(u64::MAX)
    };
    match (min, max) {
        (Some(lo), _) if distance(min) < distance(max) => lo,
        (_, Some(hi)) => hi,
        (Some(lo), None) => lo,
        (None, None) => date,
    }
}

/// Position of `date` within its week, 0 for the configured first day.
pub fn week_day_offset(date: NaiveDate, week_start: WeekStart) -> u32 {
    (date.weekday().num_days_from_sunday() + 6 - week_start.offset()) % 7
}

pub fn week_start_date(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    add_days(date, -(week_day_offset(date, week_start) as i64))
}

pub fn week_end_date(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    add_days(date, 6 - week_day_offset(date, week_start) as i64)
}

/// Week number anchored on the Thursday of the week containing `date`.
/// With a Monday week start this is the ISO-8601 week number; weeks at the
/// start of January can belong to the previous year (52 or 53).
pub fn week_of_year(date: NaiveDate, week_start: WeekStart) -> u32 {
    let day_of_week = week_day_offset(date, week_start) as i64 + 1;
    let nearest_thursday = add_days(date, 4 - day_of_week);
    let jan_first = first_date_in_year(nearest_thursday);
    let days = (nearest_thursday - jan_first).num_days();
    1 + (days / 7) as u32
}

pub fn first_date_in_month(date: NaiveDate) -> NaiveDate {
    change_day(date, 1)
}

pub fn last_date_in_month(date: NaiveDate) -> NaiveDate {
    change_day(date, 31)
}

pub fn first_date_in_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// First day of the month following `date`.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    first_date_in_month(add_months(first_date_in_month(date), 1))
}

/// Last day of the month preceding `date`.
pub fn previous_month(date: NaiveDate) -> NaiveDate {
    add_days(first_date_in_month(date), -1)
}

pub fn min_date<T: Ord>(first: Option<T>, second: Option<T>) -> Option<T> {
    match (first, second) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

pub fn max_date<T: Ord>(first: Option<T>, second: Option<T>) -> Option<T> {
    match (first, second) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Weekdays in display order for the given week start.
pub fn days_of_week(week_start: WeekStart) -> [Weekday; 7] {
    let mut day = Weekday::Mon;
    for _ in 0..week_start.offset() {
        day = day.succ();
    }
    let mut days = [day; 7];
    for slot in days.iter_mut().skip(1) {
        day = day.succ();
        *slot = day;
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // ── days_in_month tests ───────────────────────────────────────────────────

    #[test]
    fn test_days_in_month_february() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }

    #[test]
    fn test_days_in_month_long_and_short() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    // ── add_* tests ───────────────────────────────────────────────────────────

    #[test]
    fn test_add_days_crosses_month() {
        assert_eq!(add_days(d(2022, 3, 31), 1), d(2022, 4, 1));
        assert_eq!(add_days(d(2022, 3, 1), -1), d(2022, 2, 28));
    }

    #[test]
    fn test_add_days_in_range_clamps() {
        let min = Some(d(2022, 3, 10));
        let max = Some(d(2022, 3, 20));
        assert_eq!(add_days_in_range(d(2022, 3, 12), -7, min, max), d(2022, 3, 10));
        assert_eq!(add_days_in_range(d(2022, 3, 18), 7, min, max), d(2022, 3, 20));
        assert_eq!(add_days_in_range(d(2022, 3, 12), 1, min, max), d(2022, 3, 13));
    }

    #[test]
    fn test_change_day_clamps_to_month_end() {
        assert_eq!(change_day(d(2023, 2, 1), 31), d(2023, 2, 28));
        assert_eq!(change_day(d(2024, 2, 1), 30), d(2024, 2, 29));
        assert_eq!(change_day(d(2024, 4, 30), 15), d(2024, 4, 15));
    }

    #[test]
    fn test_add_months_clamps_month_end() {
        assert_eq!(add_months(d(2025, 1, 31), 1), d(2025, 2, 28));
        assert_eq!(add_months(d(2024, 1, 31), 1), d(2024, 2, 29));
        assert_eq!(add_months(d(2025, 3, 31), -1), d(2025, 2, 28));
    }

    #[test]
    fn test_add_months_across_year() {
        assert_eq!(add_months(d(2025, 11, 15), 3), d(2026, 2, 15));
        assert_eq!(add_months(d(2025, 2, 15), -3), d(2024, 11, 15));
        assert_eq!(add_months(d(2022, 3, 26), 1), d(2022, 4, 26));
    }

    #[test]
    fn test_add_months_in_range_picks_closer_bound() {
        let min = Some(d(2022, 1, 1));
        let max = Some(d(2022, 6, 30));
        assert_eq!(add_months_in_range(d(2022, 6, 15), 1, min, max), d(2022, 6, 30));
        assert_eq!(add_months_in_range(d(2022, 1, 15), -1, min, max), d(2022, 1, 1));
    }

    #[test]
    fn test_add_years_leap_day_clamps() {
        assert_eq!(add_years(d(2024, 2, 29), 1), d(2025, 2, 28));
        assert_eq!(add_years(d(2024, 2, 29), 4), d(2028, 2, 29));
    }

    #[test]
    fn test_add_years_in_range_clamps_to_max() {
        let max = Some(d(2030, 12, 31));
        assert_eq!(add_years_in_range(d(2029, 5, 5), 3, None, max), d(2030, 12, 31));
    }

    // ── date_same_or_between tests ────────────────────────────────────────────

    #[test]
    fn test_date_same_or_between_inside_returns_date() {
        let date = d(2022, 3, 15);
        assert_eq!(date_same_or_between(date, Some(d(2022, 3, 1)), Some(d(2022, 3, 31))), date);
        assert_eq!(date_same_or_between(date, None, None), date);
    }

    #[test]
    fn test_date_same_or_between_open_bounds() {
        assert_eq!(date_same_or_between(d(2020, 1, 1), Some(d(2021, 1, 1)), None), d(2021, 1, 1));
        assert_eq!(date_same_or_between(d(2023, 1, 1), None, Some(d(2021, 1, 1))), d(2021, 1, 1));
    }

    #[test]
    fn test_date_same_or_between_tie_goes_to_max() {
        // min after max: both bounds violated, equal distance
        let date = d(2022, 1, 10);
        assert_eq!(date_same_or_between(date, Some(d(2022, 1, 15)), Some(d(2022, 1, 5))), d(2022, 1, 5));
    }

    // ── week helper tests ─────────────────────────────────────────────────────

    #[test]
    fn test_week_day_offset_per_week_start() {
        // 2022-03-26 is a Saturday
        let sat = d(2022, 3, 26);
        assert_eq!(week_day_offset(sat, WeekStart::Monday), 5);
        assert_eq!(week_day_offset(sat, WeekStart::Saturday), 0);
        assert_eq!(week_day_offset(sat, WeekStart::Sunday), 6);
    }

    #[test]
    fn test_week_start_and_end() {
        let sat = d(2022, 3, 26);
        assert_eq!(week_start_date(sat, WeekStart::Monday), d(2022, 3, 21));
        assert_eq!(week_end_date(sat, WeekStart::Monday), d(2022, 3, 27));
        assert_eq!(week_start_date(sat, WeekStart::Sunday), d(2022, 3, 20));
        assert_eq!(week_end_date(sat, WeekStart::Sunday), d(2022, 3, 26));
        assert_eq!(week_start_date(sat, WeekStart::Saturday), sat);
        assert_eq!(week_end_date(sat, WeekStart::Saturday), d(2022, 4, 1));
    }

    #[test]
    fn test_week_of_year_iso_examples() {
        assert_eq!(week_of_year(d(2021, 1, 1), WeekStart::Monday), 53);
        assert_eq!(week_of_year(d(2022, 1, 2), WeekStart::Monday), 52);
        assert_eq!(week_of_year(d(2022, 1, 3), WeekStart::Monday), 1);
        assert_eq!(week_of_year(d(2020, 12, 31), WeekStart::Monday), 53);
        assert_eq!(week_of_year(d(2024, 12, 30), WeekStart::Monday), 1);
        assert_eq!(week_of_year(d(2022, 3, 26), WeekStart::Monday), 12);
    }

    #[test]
    fn test_month_boundaries() {
        assert_eq!(first_date_in_month(d(2022, 3, 26)), d(2022, 3, 1));
        assert_eq!(last_date_in_month(d(2022, 2, 10)), d(2022, 2, 28));
        assert_eq!(first_date_in_year(d(2022, 3, 26)), d(2022, 1, 1));
    }

    #[test]
    fn test_next_and_previous_month() {
        assert_eq!(next_month(d(2022, 3, 26)), d(2022, 4, 1));
        assert_eq!(next_month(d(2022, 12, 31)), d(2023, 1, 1));
        assert_eq!(previous_month(d(2022, 3, 26)), d(2022, 2, 28));
        assert_eq!(previous_month(d(2022, 1, 10)), d(2021, 12, 31));
    }

    #[test]
    fn test_min_max_date_option_aware() {
        assert_eq!(min_date(Some(d(2022, 1, 1)), Some(d(2021, 1, 1))), Some(d(2021, 1, 1)));
        assert_eq!(min_date(None, Some(d(2021, 1, 1))), Some(d(2021, 1, 1)));
        assert_eq!(max_date(Some(d(2022, 1, 1)), None), Some(d(2022, 1, 1)));
        assert_eq!(max_date::<NaiveDate>(None, None), None);
    }

    #[test]
    fn test_date_without_time() {
        let dt = d(2022, 3, 26).and_hms_milli_opt(13, 45, 10, 250).unwrap();
        assert_eq!(date_without_time(dt), d(2022, 3, 26).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_days_of_week_order() {
        assert_eq!(days_of_week(WeekStart::Monday)[0], Weekday::Mon);
        assert_eq!(days_of_week(WeekStart::Sunday)[0], Weekday::Sun);
        assert_eq!(days_of_week(WeekStart::Sunday)[6], Weekday::Sat);
        assert_eq!(days_of_week(WeekStart::Saturday)[1], Weekday::Sun);
    }

    #[test]
    fn test_absolute_bounds() {
        assert_eq!(absolute_min_date(), d(1900, 1, 1));
        assert_eq!(absolute_max_date(), d(2154, 12, 31));
    }

    // ── properties ────────────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn prop_add_days_round_trip(offset in 0i64..80_000, n in -5_000i64..5_000) {
            let date = add_days(d(1900, 1, 1), offset);
            prop_assert_eq!(add_days(add_days(date, n), -n), date);
        }

        #[test]
        fn prop_add_months_in_range_stays_in_bounds(
            start in 0i64..40_000,
            span in 0i64..3_000,
            at in 0i64..40_000,
            months in -400i32..400,
        ) {
            let min = add_days(d(1950, 1, 1), start);
            let max = add_days(min, span);
            let date = add_days(d(1950, 1, 1), at);
            let result = add_months_in_range(date, months, Some(min), Some(max));
            prop_assert!(min <= result && result <= max);
        }

        #[test]
        fn prop_add_years_in_range_stays_in_bounds(
            start in 0i64..40_000,
            span in 0i64..3_000,
            at in 0i64..40_000,
            years in -60i32..60,
        ) {
            let min = add_days(d(1950, 1, 1), start);
            let max = add_days(min, span);
            let date = add_days(d(1950, 1, 1), at);
            let result = add_years_in_range(date, years, Some(min), Some(max));
            prop_assert!(min <= result && result <= max);
        }

        #[test]
        fn prop_add_months_never_overflows(offset in 0i64..60_000, months in -300i32..300) {
            let date = add_days(d(1900, 1, 1), offset);
            let result = add_months(date, months);
            let expected_total = date.year() * 12 + date.month() as i32 - 1 + months;
            prop_assert_eq!(result.year() * 12 + result.month() as i32 - 1, expected_total);
            prop_assert!(result.day() <= date.day());
        }

        #[test]
        fn prop_week_of_year_matches_iso(offset in 0i64..60_000) {
            let date = add_days(d(1900, 1, 1), offset);
            prop_assert_eq!(week_of_year(date, WeekStart::Monday), date.iso_week().week());
        }
    }
}

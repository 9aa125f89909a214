use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub fn compare_year(first: NaiveDate, second: NaiveDate) -> Ordering {
    first.year().cmp(&second.year())
}

pub fn compare_month(first: NaiveDate, second: NaiveDate) -> Ordering {
    compare_year(first, second).then(first.month().cmp(&second.month()))
}

pub fn compare_date(first: NaiveDate, second: NaiveDate) -> Ordering {
    compare_month(first, second).then(first.day().cmp(&second.day()))
}

pub fn is_same_date(current: NaiveDate, other: Option<NaiveDate>) -> bool {
    other.is_some_and(|o| compare_date(current, o).is_eq())
}

pub fn is_same_month(current: NaiveDate, other: Option<NaiveDate>) -> bool {
    other.is_some_and(|o| compare_month(current, o).is_eq())
}

pub fn is_same_year(current: NaiveDate, other: Option<NaiveDate>) -> bool {
    other.is_some_and(|o| compare_year(current, o).is_eq())
}

/// `from <= current <= to` at day granularity; a missing bound is open.
pub fn is_same_or_between(current: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    same_or_between_by(compare_date, current, from, to)
}

pub fn is_same_or_between_month(current: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    same_or_between_by(compare_month, current, from, to)
}

pub fn is_same_or_between_years(current: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    same_or_between_by(compare_year, current, from, to)
}

/// `from < current < to` at day granularity; a missing bound is open.
pub fn is_between(current: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    between_by(compare_date, current, from, to)
}

pub fn is_between_month(current: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    between_by(compare_month, current, from, to)
}

pub fn is_between_years(current: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    between_by(compare_year, current, from, to)
}

pub fn is_after(current: NaiveDate, other: NaiveDate) -> bool {
    compare_date(current, other).is_gt()
}

pub fn is_after_month(current: NaiveDate, other: NaiveDate) -> bool {
    compare_month(current, other).is_gt()
}

pub fn is_after_year(current: NaiveDate, other: NaiveDate) -> bool {
    compare_year(current, other).is_gt()
}

pub fn is_same_or_before(current: NaiveDate, other: NaiveDate) -> bool {
    compare_date(current, other).is_le()
}

pub fn is_same_or_before_month(current: NaiveDate, other: NaiveDate) -> bool {
    compare_month(current, other).is_le()
}

pub fn is_same_or_before_year(current: NaiveDate, other: NaiveDate) -> bool {
    compare_year(current, other).is_le()
}

pub fn is_another_month_or_year(current: NaiveDate, other: NaiveDate) -> bool {
    compare_month(current, other).is_ne()
}

fn same_or_between_by(
    cmp: fn(NaiveDate, NaiveDate) -> Ordering,
    current: NaiveDate,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> bool {
    from.is_none_or(|f| cmp(f, current).is_le()) && to.is_none_or(|t| cmp(current, t).is_le())
}

fn between_by(
    cmp: fn(NaiveDate, NaiveDate) -> Ordering,
    current: NaiveDate,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> bool {
    from.is_none_or(|f| cmp(current, f).is_gt()) && to.is_none_or(|t| cmp(current, t).is_lt())
}

/// Date comparison normalised to the granularity of the active calendar view.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompareAdapter {
    #[default]
    Day,
    Month,
    Year,
}

impl CompareAdapter {
    fn cmp(self) -> fn(NaiveDate, NaiveDate) -> Ordering {
        match self {
            CompareAdapter::Day => compare_date,
            CompareAdapter::Month => compare_month,
            CompareAdapter::Year => compare_year,
        }
    }

    pub fn is_after(self, current: NaiveDate, other: NaiveDate) -> bool {
        self.cmp()(current, other).is_gt()
    }

    pub fn is_between(self, current: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
        between_by(self.cmp(), current, from, to)
    }

    pub fn is_equal(self, current: NaiveDate, other: Option<NaiveDate>) -> bool {
        other.is_some_and(|o| self.cmp()(current, o).is_eq())
    }

    pub fn is_equal_or_before(self, current: NaiveDate, other: NaiveDate) -> bool {
        self.cmp()(current, other).is_le()
    }

    pub fn is_equal_or_between(self, current: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
        same_or_between_by(self.cmp(), current, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_compare_granularity() {
        assert_eq!(compare_date(d(2022, 3, 1), d(2022, 3, 2)), Ordering::Less);
        assert_eq!(compare_month(d(2022, 3, 1), d(2022, 3, 31)), Ordering::Equal);
        assert_eq!(compare_month(d(2022, 4, 1), d(2022, 3, 31)), Ordering::Greater);
        assert_eq!(compare_year(d(2022, 1, 1), d(2022, 12, 31)), Ordering::Equal);
    }

    #[test]
    fn test_same_helpers_with_missing_other() {
        assert!(is_same_date(d(2022, 3, 1), Some(d(2022, 3, 1))));
        assert!(!is_same_date(d(2022, 3, 1), None));
        assert!(is_same_month(d(2022, 3, 1), Some(d(2022, 3, 20))));
        assert!(is_same_year(d(2022, 3, 1), Some(d(2022, 11, 20))));
    }

    #[test]
    fn test_same_or_between_is_inclusive() {
        let from = Some(d(2022, 3, 10));
        let to = Some(d(2022, 3, 20));
        assert!(is_same_or_between(d(2022, 3, 10), from, to));
        assert!(is_same_or_between(d(2022, 3, 20), from, to));
        assert!(!is_same_or_between(d(2022, 3, 21), from, to));
        assert!(is_same_or_between(d(1800, 1, 1), None, to));
    }

    #[test]
    fn test_between_is_exclusive() {
        let from = Some(d(2022, 3, 10));
        let to = Some(d(2022, 3, 20));
        assert!(!is_between(d(2022, 3, 10), from, to));
        assert!(is_between(d(2022, 3, 11), from, to));
        assert!(!is_between(d(2022, 3, 20), from, to));
        assert!(is_between(d(2022, 3, 20), from, None));
    }

    #[test]
    fn test_month_and_year_between() {
        assert!(is_between_month(d(2022, 4, 15), Some(d(2022, 3, 31)), Some(d(2022, 5, 1))));
        assert!(!is_between_month(d(2022, 3, 15), Some(d(2022, 3, 31)), None));
        assert!(is_same_or_between_month(d(2022, 3, 1), Some(d(2022, 3, 31)), None));
        assert!(is_between_years(d(2022, 1, 1), Some(d(2021, 12, 31)), Some(d(2023, 1, 1))));
        assert!(is_same_or_between_years(d(2021, 1, 1), Some(d(2021, 12, 31)), None));
    }

    #[test]
    fn test_after_and_same_or_before() {
        assert!(is_after(d(2022, 3, 2), d(2022, 3, 1)));
        assert!(!is_after_month(d(2022, 3, 31), d(2022, 3, 1)));
        assert!(is_after_year(d(2023, 1, 1), d(2022, 12, 31)));
        assert!(is_same_or_before(d(2022, 3, 1), d(2022, 3, 1)));
        assert!(is_same_or_before_month(d(2022, 3, 31), d(2022, 3, 1)));
        assert!(is_same_or_before_year(d(2022, 12, 31), d(2022, 1, 1)));
        assert!(!is_same_or_before_year(d(2023, 1, 1), d(2022, 12, 31)));
    }

    #[test]
    fn test_another_month_or_year() {
        assert!(is_another_month_or_year(d(2022, 3, 1), d(2023, 3, 1)));
        assert!(is_another_month_or_year(d(2022, 3, 1), d(2022, 4, 1)));
        assert!(!is_another_month_or_year(d(2022, 3, 1), d(2022, 3, 31)));
    }

    #[test]
    fn test_adapter_day() {
        let a = CompareAdapter::Day;
        assert!(a.is_equal(d(2022, 3, 1), Some(d(2022, 3, 1))));
        assert!(!a.is_equal(d(2022, 3, 1), Some(d(2022, 3, 2))));
        assert!(a.is_between(d(2022, 3, 2), Some(d(2022, 3, 1)), Some(d(2022, 3, 3))));
    }

    #[test]
    fn test_adapter_month_ignores_day() {
        let a = CompareAdapter::Month;
        assert!(a.is_equal(d(2022, 3, 1), Some(d(2022, 3, 31))));
        assert!(a.is_equal_or_before(d(2022, 3, 31), d(2022, 3, 1)));
        assert!(!a.is_after(d(2022, 3, 31), d(2022, 3, 1)));
        assert!(a.is_equal_or_between(d(2022, 3, 15), Some(d(2022, 3, 31)), Some(d(2022, 3, 1))));
    }

    #[test]
    fn test_adapter_year_uses_year_granularity() {
        let a = CompareAdapter::Year;
        assert!(a.is_equal(d(2022, 1, 1), Some(d(2022, 12, 31))));
        assert!(a.is_equal_or_before(d(2022, 12, 31), d(2022, 1, 1)));
        assert!(a.is_after(d(2023, 1, 1), d(2022, 12, 31)));
        assert!(!a.is_between(d(2022, 6, 1), Some(d(2022, 1, 1)), Some(d(2024, 1, 1))));
        assert!(!a.is_equal(d(2022, 1, 1), None));
    }
}

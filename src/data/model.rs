use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// First day of a calendar week.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Saturday,
    Sunday,
}

impl WeekStart {
    /// Offset of this week start relative to Monday in ISO order.
    pub fn offset(self) -> u32 {
        match self {
            WeekStart::Monday => 0,
            WeekStart::Saturday => 5,
            WeekStart::Sunday => 6,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "monday" | "mon" => Some(WeekStart::Monday),
            "saturday" | "sat" => Some(WeekStart::Saturday),
            "sunday" | "sun" => Some(WeekStart::Sunday),
            _ => None,
        }
    }
}

/// Which range endpoint the next click sets.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RangeType {
    Start,
    End,
}

/// The calendar view currently displayed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Day,
    Month,
    Year,
}

/// A possibly half-open date range.
///
/// When both ends are set `start <= end` holds after every commit done by the
/// datepicker; the type itself does not enforce it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        DateRange { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_week_start_offsets() {
        assert_eq!(WeekStart::Monday.offset(), 0);
        assert_eq!(WeekStart::Saturday.offset(), 5);
        assert_eq!(WeekStart::Sunday.offset(), 6);
    }

    #[test]
    fn test_week_start_parse() {
        assert_eq!(WeekStart::parse("Sunday"), Some(WeekStart::Sunday));
        assert_eq!(WeekStart::parse(" sat "), Some(WeekStart::Saturday));
        assert_eq!(WeekStart::parse("friday"), None);
    }

    #[test]
    fn test_week_start_yaml_lowercase() {
        let yaml = serde_norway::to_string(&WeekStart::Sunday).unwrap();
        assert_eq!(yaml.trim(), "sunday");
    }

    #[test]
    fn test_range_type_json_uppercase() {
        let json = serde_json::to_string(&RangeType::End).unwrap();
        assert_eq!(json, "\"END\"");
    }

    #[test]
    fn test_date_range_flags() {
        let dt = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(DateRange::default().is_empty());
        assert!(!DateRange::new(Some(dt), None).is_complete());
        assert!(DateRange::new(Some(dt), Some(dt)).is_complete());
    }
}

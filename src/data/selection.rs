use crate::data::model::DateRange;
use crate::data::persistence::Persistable;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Last value committed from the interactive picker, stored in selection.json.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct SavedSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
    #[serde(default)]
    pub disabled_time: bool,
}

impl Persistable for SavedSelection {
    fn filename() -> &'static str {
        "selection.json"
    }
    fn is_json() -> bool {
        true
    }
}

impl SavedSelection {
    pub fn single(date: Option<NaiveDateTime>, disabled_time: bool) -> Self {
        SavedSelection {
            date,
            range: None,
            disabled_time,
        }
    }

    pub fn range(range: DateRange, disabled_time: bool) -> Self {
        SavedSelection {
            date: None,
            range: Some(range),
            disabled_time,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.range.is_none_or(|r| r.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn dt(y: i32, m: u32, day: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, day)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_single_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let saved = SavedSelection::single(Some(dt(2022, 3, 26, 14)), false);
        saved.save_to(tmp.path()).unwrap();
        let loaded = SavedSelection::load_from(tmp.path()).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_range_roundtrip_with_open_end() {
        let tmp = TempDir::new().unwrap();
        let saved = SavedSelection::range(DateRange::new(Some(dt(2022, 3, 1, 0)), None), true);
        saved.save_to(tmp.path()).unwrap();
        let loaded = SavedSelection::load_from(tmp.path()).unwrap();
        assert_eq!(loaded.range, Some(DateRange::new(Some(dt(2022, 3, 1, 0)), None)));
        assert!(loaded.disabled_time);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let loaded = SavedSelection::load_from(tmp.path()).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let saved = SavedSelection::single(Some(dt(2022, 3, 26, 0)), false);
        let json = serde_json::to_string(&saved).unwrap();
        assert!(!json.contains("range"));
        assert!(json.contains("2022-03-26T00:00:00"));
    }
}

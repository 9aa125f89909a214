use crate::data::locale::Locale;
use crate::data::model::WeekStart;
use crate::data::persistence::Persistable;
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Datepicker behaviour read from the `datepicker` key of config.yaml.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DatepickerConfig {
    pub locale: String,
    /// Falls back to the locale's first day of week when unset.
    pub week_start_day: Option<WeekStart>,
    pub hide_week_numbers: bool,
    pub show_time: bool,
    pub show_seconds: bool,
    pub show_milliseconds: bool,
    pub disabled_time: bool,
    pub mandatory_time: bool,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub enable_date_range: bool,
    pub enable_two_month_date_range: bool,
    pub enable_time_validation: bool,
    pub only_month_selection: bool,
    pub date_format: Option<String>,
    pub date_time_format: Option<String>,
    pub time_12h: Option<bool>,
    pub rtl: bool,
}

impl Default for DatepickerConfig {
    fn default() -> Self {
        DatepickerConfig {
            locale: "en".to_string(),
            week_start_day: None,
            hide_week_numbers: false,
            show_time: false,
            show_seconds: false,
            show_milliseconds: false,
            disabled_time: false,
            mandatory_time: false,
            min_date: None,
            max_date: None,
            enable_date_range: false,
            enable_two_month_date_range: false,
            enable_time_validation: false,
            only_month_selection: false,
            date_format: None,
            date_time_format: None,
            time_12h: None,
            rtl: false,
        }
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
struct ConfigWrapper {
    #[serde(default)]
    datepicker: DatepickerConfig,
}

impl Persistable for ConfigWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl DatepickerConfig {
    pub fn load() -> Result<Self> {
        Ok(ConfigWrapper::load()?.datepicker)
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        Ok(ConfigWrapper::load_from(dir)?.datepicker)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        ConfigWrapper {
            datepicker: self.clone(),
        }
        .save_to(dir)
    }

    pub fn resolved_locale(&self) -> &'static Locale {
        Locale::resolve(&self.locale)
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start_day
            .unwrap_or(self.resolved_locale().first_day_of_week)
    }

    /// Whether the time sub-control shows a meridian. Defaults to the
    /// locale's short time pattern.
    pub fn uses_12h_clock(&self) -> bool {
        self.time_12h
            .unwrap_or_else(|| self.resolved_locale().uses_12h_clock())
    }

    /// Range mode is implied by the two-month layout.
    pub fn is_range(&self) -> bool {
        self.enable_date_range || self.enable_two_month_date_range
    }
}

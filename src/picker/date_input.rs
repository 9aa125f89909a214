use crate::calc::date_math::{absolute_max_date, absolute_min_date};
use crate::calc::parse::{format_date, named_format, parse_date};
use crate::data::config::DatepickerConfig;
use crate::data::locale::Locale;
use crate::data::model::DateRange;
use crate::data::validation::ValidationError;
use chrono::{NaiveDateTime, NaiveTime};
use tracing::debug;

/// Resolves the pattern used to display and parse typed values.
///
/// A configured `date_format`/`date_time_format` wins; otherwise the locale's
/// `shortDate`, `short` or `medium` pattern is used. Two-digit years are
/// widened to four digits and, for month-only selection, day tokens are
/// removed together with their separator.
pub fn datepicker_format(locale: &Locale, config: &DatepickerConfig, time_when_disabled: bool) -> String {
    let custom = if config.show_time && !config.disabled_time {
        config.date_time_format.as_deref()
    } else {
        config.date_format.as_deref()
    };
    let mut format = match custom.filter(|f| !f.is_empty()) {
        Some(format) => format.to_string(),
        None => {
            let named = if config.show_time && (!config.disabled_time || time_when_disabled) {
                if config.show_seconds { "medium" } else { "short" }
            } else {
                "shortDate"
            };
            named_format(locale, named).unwrap_or_else(|| locale.short_date.to_string())
        }
    };

    if !format.contains("yyyy") {
        format = format.replacen("yy", "yyyy", 1);
    }
    if config.only_month_selection && format.contains('d') {
        format = strip_day_tokens(&format);
    }
    format
}

// Quoted literals are swapped for private-use placeholders while day tokens
// are stripped.
const LITERAL_BASE: u32 = 0xE000;

fn mask_literals(format: &str) -> (String, Vec<String>) {
    let mut masked = String::with_capacity(format.len());
    let mut literals = Vec::new();
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\'' {
            masked.push(c);
            continue;
        }
        let mut literal = String::from(c);
        while let Some(next) = chars.next() {
            literal.push(next);
            if next == '\'' {
                if chars.peek() == Some(&'\'') && literal.len() > 2 {
                    literal.push('\'');
                    chars.next();
                    continue;
                }
                break;
            }
        }
        let slot = LITERAL_BASE + literals.len() as u32;
        masked.push(char::from_u32(slot).unwrap_or(char::REPLACEMENT_CHARACTER));
        literals.push(literal);
    }
    (masked, literals)
}

fn strip_day_tokens(format: &str) -> String {
    let (masked, literals) = mask_literals(format);
    let chars: Vec<char> = masked.chars().collect();
    let mut out = masked.clone();
    if let Some(i) = chars
        .windows(2)
        .position(|w| w[0].is_whitespace() && w[1] == 'd')
    {
        out = chars[..i].iter().chain(&chars[i + 2..]).collect();
    }
    out = out.replacen("/d", "", 1).replace('d', "");
    let mut restored = String::with_capacity(format.len());
    for c in out.trim_start_matches(['.', '/', '-', ' ']).chars() {
        match (c as u32).checked_sub(LITERAL_BASE).and_then(|k| literals.get(k as usize)) {
            Some(literal) => restored.push_str(literal),
            None => restored.push(c),
        }
    }
    restored
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

/// Text field bound to a single date value.
///
/// The typed text is kept as-is while it does not parse so the user can fix
/// it; `validate` then reports `dateFormat`. Limits default to 1900-01-01
/// and 2154-12-31.
#[derive(Clone, Debug)]
pub struct DateInput {
    config: DatepickerConfig,
    locale: &'static Locale,
    format: String,
    text: String,
    value: Option<NaiveDateTime>,
    invalid_format: bool,
}

impl DateInput {
    pub fn new(config: DatepickerConfig) -> Self {
        let locale = config.resolved_locale();
        let format = datepicker_format(locale, &config, false);
        DateInput {
            config,
            locale,
            format,
            text: String::new(),
            value: None,
            invalid_format: false,
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn display_value(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> Option<NaiveDateTime> {
        self.value
    }

    pub fn config(&self) -> &DatepickerConfig {
        &self.config
    }

    /// Text typed by the user.
    pub fn write_str(&mut self, text: &str) -> Option<NaiveDateTime> {
        text.clone_into(&mut self.text);
        match parse_date(text, &self.format, self.locale) {
            Ok(value) => {
                self.value = value;
                self.invalid_format = false;
            }
            Err(e) => {
                debug!(input = text, format = %self.format, error = %e, "unparseable date input");
                self.value = None;
                self.invalid_format = true;
            }
        }
        self.value
    }

    /// Value set programmatically, e.g. picked in the calendar.
    pub fn write_value(&mut self, value: Option<NaiveDateTime>) {
        self.value = value;
        self.invalid_format = false;
        self.render();
    }

    pub fn set_config(&mut self, config: DatepickerConfig) {
        let locale = config.resolved_locale();
        let format = datepicker_format(locale, &config, false);
        self.config = config;
        self.locale = locale;
        if format != self.format {
            self.format = format;
            if self.value.is_some() {
                self.render();
            }
        }
    }

    /// Follows the picker's ignore-time switch; the value is re-rendered in
    /// the new format.
    pub fn set_disabled_time(&mut self, disabled_time: bool) {
        let mut config = self.config.clone();
        config.disabled_time = disabled_time;
        self.set_config(config);
        self.render();
    }

    fn render(&mut self) {
        self.text = self
            .value
            .map(|v| format_date(v, &self.format, self.locale))
            .unwrap_or_default();
    }

    /// Format, minimum and maximum checks, in that order. Limits compare the
    /// full date-time when time is shown and the calendar day otherwise.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.invalid_format {
            errors.push(ValidationError::DateFormat {
                format: self.format.clone(),
            });
        }
        let Some(actual) = self.value else {
            return errors;
        };
        let with_time = self.config.show_time;
        let min_day = self.config.min_date.unwrap_or_else(absolute_min_date);
        let max_day = self.config.max_date.unwrap_or_else(absolute_max_date);
        let min = min_day.and_time(NaiveTime::MIN);
        let max = max_day.and_time(NaiveTime::MIN);

        let below = if with_time { actual < min } else { actual.date() < min_day };
        if below {
            errors.push(ValidationError::MinDate { min, actual });
        }
        let above = if with_time {
            actual > max_day.and_time(end_of_day())
        } else {
            actual.date() > max_day
        };
        if above {
            errors.push(ValidationError::MaxDate { max, actual });
        }
        errors
    }
}

/// Start and end inputs of a range field.
#[derive(Clone, Debug)]
pub struct RangeInput {
    pub start: DateInput,
    pub end: DateInput,
}

impl RangeInput {
    pub fn new(config: DatepickerConfig) -> Self {
        RangeInput {
            start: DateInput::new(config.clone()),
            end: DateInput::new(config),
        }
    }

    pub fn value(&self) -> DateRange {
        DateRange::new(self.start.value(), self.end.value())
    }

    pub fn write_value(&mut self, range: DateRange) {
        self.start.write_value(range.start);
        self.end.write_value(range.end);
    }

    pub fn set_disabled_time(&mut self, disabled_time: bool) {
        self.start.set_disabled_time(disabled_time);
        self.end.set_disabled_time(disabled_time);
    }

    /// `endBeforeStart` followed by the child errors translated to their
    /// range keys. Each key is reported at most once.
    pub fn validate(&self) -> Vec<ValidationError> {
        let range = self.value();
        let mut errors = Vec::new();
        if let (Some(start), Some(end)) = (range.start, range.end)
            && end < start
        {
            errors.push(ValidationError::EndBeforeStart { start, end });
        }

        let mut push = |error: ValidationError| {
            if !errors.iter().any(|e| e.key() == error.key()) {
                errors.push(error);
            }
        };
        for (is_start, input) in [(true, &self.start), (false, &self.end)] {
            for error in input.validate() {
                match error {
                    ValidationError::DateFormat { format } if is_start => {
                        push(ValidationError::InvalidStartDateFormat { format })
                    }
                    ValidationError::DateFormat { format } => {
                        push(ValidationError::InvalidEndDateFormat { format })
                    }
                    ValidationError::MinDate { min, .. } => push(ValidationError::RangeBeforeMinDate {
                        min,
                        start: range.start,
                        end: range.end,
                    }),
                    ValidationError::MaxDate { max, .. } => push(ValidationError::RangeAfterMaxDate {
                        max,
                        start: range.start,
                        end: range.end,
                    }),
                    other => push(other),
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::locale::{DE, EN, EN_GB};
    use crate::data::validation::errors_to_json;
    use chrono::NaiveDate;
    use serde_json::json;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dt(y: i32, m: u32, day: u32, h: u32, min: u32) -> NaiveDateTime {
        d(y, m, day).and_hms_opt(h, min, 0).unwrap()
    }

    // ── format tests ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_defaults_to_short_date_with_full_year() {
        let config = DatepickerConfig::default();
        assert_eq!(datepicker_format(&EN, &config, false), "M/d/yyyy");
        assert_eq!(datepicker_format(&DE, &config, false), "dd.MM.yyyy");
        assert_eq!(datepicker_format(&EN_GB, &config, false), "dd/MM/y");
    }

    #[test]
    fn test_format_with_time() {
        let mut config = DatepickerConfig {
            show_time: true,
            ..DatepickerConfig::default()
        };
        assert_eq!(datepicker_format(&EN, &config, false), "M/d/yyyy, h:mm a");
        config.show_seconds = true;
        assert_eq!(datepicker_format(&DE, &config, false), "dd.MM.yyyy, HH:mm:ss");
        config.disabled_time = true;
        assert_eq!(datepicker_format(&DE, &config, false), "dd.MM.yyyy");
        assert_eq!(datepicker_format(&DE, &config, true), "dd.MM.yyyy, HH:mm:ss");
    }

    #[test]
    fn test_custom_format_wins() {
        let config = DatepickerConfig {
            show_time: true,
            date_format: Some("dd-MM-yyyy".to_string()),
            date_time_format: Some("dd-MM-yy HH:mm".to_string()),
            ..DatepickerConfig::default()
        };
        assert_eq!(datepicker_format(&EN, &config, false), "dd-MM-yyyy HH:mm");
        let config = DatepickerConfig {
            disabled_time: true,
            ..config
        };
        assert_eq!(datepicker_format(&EN, &config, false), "dd-MM-yyyy");
    }

    #[test]
    fn test_month_only_format_strips_day() {
        let config = DatepickerConfig {
            only_month_selection: true,
            ..DatepickerConfig::default()
        };
        assert_eq!(datepicker_format(&EN, &config, false), "M/yyyy");
        assert_eq!(datepicker_format(&DE, &config, false), "MM.yyyy");
        assert_eq!(datepicker_format(&EN_GB, &config, false), "MM/y");
        let config = DatepickerConfig {
            date_format: Some("MMM d yyyy".to_string()),
            ..config
        };
        assert_eq!(datepicker_format(&EN, &config, false), "MMM yyyy");
    }

    #[test]
    fn test_month_only_format_keeps_quoted_literals() {
        assert_eq!(strip_day_tokens("'day' d MMM yyyy"), "'day' MMM yyyy");
        assert_eq!(strip_day_tokens("d 'de' MMMM 'de' yyyy"), "'de' MMMM 'de' yyyy");
        assert_eq!(strip_day_tokens("MM/dd/yyyy 'o''clock'"), "MM/yyyy 'o''clock'");
        let config = DatepickerConfig {
            only_month_selection: true,
            date_format: Some("MMMM 'd' yyyy".to_string()),
            ..DatepickerConfig::default()
        };
        assert_eq!(datepicker_format(&EN, &config, false), "MMMM 'd' yyyy");
    }

    // ── input tests ──────────────────────────────────────────────────────────

    #[test]
    fn test_write_value_renders_format() {
        let mut input = DateInput::new(DatepickerConfig {
            show_time: true,
            ..DatepickerConfig::default()
        });
        input.write_value(Some(dt(2022, 3, 26, 14, 30)));
        assert_eq!(input.display_value(), "3/26/2022, 2:30 PM");
        input.write_value(None);
        assert_eq!(input.display_value(), "");
    }

    #[test]
    fn test_write_str_parses_and_keeps_text() {
        let mut input = DateInput::new(DatepickerConfig::default());
        assert_eq!(input.write_str("3/26/2022"), Some(dt(2022, 3, 26, 0, 0)));
        assert!(input.validate().is_empty());
        assert_eq!(input.write_str("13/40/2022"), None);
        assert_eq!(input.display_value(), "13/40/2022");
        assert_eq!(
            input.validate(),
            vec![ValidationError::DateFormat {
                format: "M/d/yyyy".to_string()
            }]
        );
        assert_eq!(input.write_str("  "), None);
        assert!(input.validate().is_empty());
    }

    #[test]
    fn test_disabled_time_rerenders_without_time() {
        let mut input = DateInput::new(DatepickerConfig {
            show_time: true,
            locale: "de".to_string(),
            ..DatepickerConfig::default()
        });
        input.write_value(Some(dt(2022, 3, 26, 14, 30)));
        assert_eq!(input.display_value(), "26.03.2022, 14:30");
        input.set_disabled_time(true);
        assert_eq!(input.format(), "dd.MM.yyyy");
        assert_eq!(input.display_value(), "26.03.2022");
    }

    #[test]
    fn test_min_max_by_day() {
        let mut input = DateInput::new(DatepickerConfig {
            min_date: Some(d(2022, 3, 10)),
            max_date: Some(d(2022, 3, 20)),
            ..DatepickerConfig::default()
        });
        input.write_value(Some(dt(2022, 3, 20, 18, 0)));
        assert!(input.validate().is_empty());
        input.write_value(Some(dt(2022, 3, 9, 23, 0)));
        assert_eq!(
            input.validate(),
            vec![ValidationError::MinDate {
                min: dt(2022, 3, 10, 0, 0),
                actual: dt(2022, 3, 9, 23, 0)
            }]
        );
    }

    #[test]
    fn test_absolute_limits_apply_without_config() {
        let mut input = DateInput::new(DatepickerConfig::default());
        input.write_value(Some(dt(1899, 12, 31, 0, 0)));
        assert_eq!(input.validate()[0].key(), "minDate");
        input.write_value(Some(dt(2155, 1, 1, 0, 0)));
        assert_eq!(input.validate()[0].key(), "maxDate");
    }

    #[test]
    fn test_min_with_time_compares_full_value() {
        let mut input = DateInput::new(DatepickerConfig {
            show_time: true,
            min_date: Some(d(2022, 3, 10)),
            ..DatepickerConfig::default()
        });
        input.write_value(Some(dt(2022, 3, 10, 0, 0)));
        assert!(input.validate().is_empty());
    }

    // ── range tests ──────────────────────────────────────────────────────────

    #[test]
    fn test_range_end_before_start() {
        let mut range = RangeInput::new(DatepickerConfig::default());
        range.write_value(DateRange::new(Some(dt(2022, 3, 10, 0, 0)), Some(dt(2022, 3, 1, 0, 0))));
        assert_eq!(
            errors_to_json(&range.validate()),
            json!({"endBeforeStart": {"start": "2022-03-10T00:00:00", "end": "2022-03-01T00:00:00"}})
        );
    }

    #[test]
    fn test_range_child_format_errors() {
        let config = DatepickerConfig {
            date_format: Some("dd-MM-yyyy".to_string()),
            ..DatepickerConfig::default()
        };
        let mut range = RangeInput::new(config);
        range.start.write_str("INVALID DATE");
        assert_eq!(
            errors_to_json(&range.validate()),
            json!({"invalidStartDateFormat": {"format": "dd-MM-yyyy"}})
        );
        range.start.write_str("");
        range.end.write_str("INVALID DATE");
        assert_eq!(range.validate()[0].key(), "invalidEndDateFormat");
    }

    #[test]
    fn test_range_child_min_error() {
        let config = DatepickerConfig {
            date_format: Some("dd-MM-yyyy".to_string()),
            min_date: Some(d(2023, 2, 1)),
            ..DatepickerConfig::default()
        };
        let mut range = RangeInput::new(config);
        range.end.write_str("01-01-2023");
        assert_eq!(
            range.validate(),
            vec![ValidationError::RangeBeforeMinDate {
                min: dt(2023, 2, 1, 0, 0),
                start: None,
                end: Some(dt(2023, 1, 1, 0, 0)),
            }]
        );
    }

    #[test]
    fn test_range_reports_each_key_once() {
        let config = DatepickerConfig {
            max_date: Some(d(2023, 1, 1)),
            ..DatepickerConfig::default()
        };
        let mut range = RangeInput::new(config);
        range.write_value(DateRange::new(Some(dt(2023, 2, 1, 0, 0)), Some(dt(2023, 3, 1, 0, 0))));
        let errors = range.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].key(), "rangeAfterMaxDate");
    }
}

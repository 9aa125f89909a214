use crate::data::config::DatepickerConfig;
use crate::data::validation::{errors_to_json, ValidationError};
use crate::picker::{DateInput, RangeInput};
use anyhow::Result;
use serde_json::{json, Value};
use std::io::Write;

/// Parses `input` (and `end` for a range) the way the date field would and
/// prints the value with its validation errors as JSON.
pub fn run(config: &DatepickerConfig, input: &str, end: Option<&str>) -> Result<()> {
    let config = config.clone();
    let report = match end {
        Some(end) => parse_range(config, input, end),
        None => parse_single(config, input),
    };
    write_report(&report, &mut std::io::stdout())
}

pub(crate) fn parse_single(config: DatepickerConfig, input: &str) -> Value {
    let mut field = DateInput::new(config);
    field.write_str(input);
    report(json!(field.value()), field.format(), &field.validate())
}

pub(crate) fn parse_range(config: DatepickerConfig, start: &str, end: &str) -> Value {
    let mut field = RangeInput::new(config);
    field.start.write_str(start);
    field.end.write_str(end);
    let format = field.start.format().to_string();
    report(json!(field.value()), &format, &field.validate())
}

fn report(value: Value, format: &str, errors: &[ValidationError]) -> Value {
    json!({
        "value": value,
        "format": format,
        "valid": errors.is_empty(),
        "errors": errors_to_json(errors),
    })
}

pub(crate) fn write_report<W: Write>(report: &Value, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_single_valid() {
        let report = parse_single(DatepickerConfig::default(), "3/15/2022");
        assert_eq!(report["value"], "2022-03-15T00:00:00");
        assert_eq!(report["format"], "M/d/yyyy");
        assert_eq!(report["valid"], true);
        assert_eq!(report["errors"], json!({}));
    }

    #[test]
    fn test_parse_single_bad_format() {
        let report = parse_single(DatepickerConfig::default(), "hello");
        assert!(report["value"].is_null());
        assert_eq!(report["valid"], false);
        assert_eq!(report["errors"]["dateFormat"]["format"], "M/d/yyyy");
    }

    #[test]
    fn test_parse_single_below_min() {
        let config = DatepickerConfig {
            min_date: Some(d(2022, 3, 20)),
            ..DatepickerConfig::default()
        };
        let report = parse_single(config, "3/15/2022");
        assert_eq!(report["errors"]["minDate"]["min"], "2022-03-20T00:00:00");
        assert_eq!(report["errors"]["minDate"]["actual"], "2022-03-15T00:00:00");
    }

    #[test]
    fn test_parse_empty_is_valid() {
        let report = parse_single(DatepickerConfig::default(), "");
        assert!(report["value"].is_null());
        assert_eq!(report["valid"], true);
    }

    #[test]
    fn test_parse_range_end_before_start() {
        let report = parse_range(DatepickerConfig::default(), "3/15/2022", "3/10/2022");
        assert_eq!(report["value"]["start"], "2022-03-15T00:00:00");
        assert_eq!(report["value"]["end"], "2022-03-10T00:00:00");
        assert!(report["errors"].get("endBeforeStart").is_some());
    }

    #[test]
    fn test_parse_range_invalid_end() {
        let report = parse_range(DatepickerConfig::default(), "3/15/2022", "nope");
        assert!(report["errors"].get("invalidEndDateFormat").is_some());
        assert!(report["errors"].get("invalidStartDateFormat").is_none());
    }

    #[test]
    fn test_write_report_is_pretty_json() {
        let report = parse_single(DatepickerConfig::default(), "3/15/2022");
        let mut buf = Vec::new();
        write_report(&report, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("\"format\": \"M/d/yyyy\""));
        assert!(out.ends_with("}\n"));
    }
}

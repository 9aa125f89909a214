use crate::calc::date_math::{week_end_date, week_of_year, week_start_date};
use crate::data::config::DatepickerConfig;
use crate::data::model::WeekStart;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::io::Write;

pub fn run(config: &DatepickerConfig, date: Option<NaiveDate>) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    write_week(date, config.week_start(), &mut std::io::stdout())
}

/// Prints the week number of `date` and the first and last day of its week.
pub(crate) fn write_week<W: Write>(date: NaiveDate, week_start: WeekStart, out: &mut W) -> Result<()> {
    writeln!(out, "{:<14} {}", "Date:", date)?;
    writeln!(out, "{:<14} {}", "Week:", week_of_year(date, week_start))?;
    writeln!(out, "{:<14} {}", "Week start:", week_start_date(date, week_start))?;
    writeln!(out, "{:<14} {}", "Week end:", week_end_date(date, week_start))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn render(date: NaiveDate, week_start: WeekStart) -> String {
        let mut buf = Vec::new();
        write_week(date, week_start, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_monday_week() {
        let out = render(d(2022, 3, 16), WeekStart::Monday);
        assert!(out.contains("Week:          11"));
        assert!(out.contains("Week start:    2022-03-14"));
        assert!(out.contains("Week end:      2022-03-20"));
    }

    #[test]
    fn test_early_january_belongs_to_previous_year() {
        let out = render(d(2021, 1, 1), WeekStart::Monday);
        assert!(out.contains("Week:          53"));
        assert!(out.contains("Week start:    2020-12-28"));
    }

    #[test]
    fn test_sunday_week_bounds() {
        let out = render(d(2022, 3, 16), WeekStart::Sunday);
        assert!(out.contains("Week start:    2022-03-13"));
        assert!(out.contains("Week end:      2022-03-19"));
    }
}

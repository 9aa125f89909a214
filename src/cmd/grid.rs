use crate::calendar::{CalendarView, DayView, Grid, MonthView, ViewBounds, YearView};
use crate::data::config::DatepickerConfig;
use crate::data::model::ViewKind;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::io::Write;

/// A rendered calendar page, the JSON shape printed by `grid --json`.
#[derive(Serialize, Debug)]
pub(crate) struct GridPage {
    pub view: ViewKind,
    pub header: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_numbers: Option<Vec<String>>,
    pub rows: Grid,
}

pub fn run(config: &DatepickerConfig, view: ViewKind, date: Option<NaiveDate>, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let page = build_page(config, view, date.unwrap_or(today), today);
    let mut out = std::io::stdout();
    if json {
        serde_json::to_writer_pretty(&mut out, &page)?;
        writeln!(out)?;
        Ok(())
    } else {
        write_page(&page, &mut out)
    }
}

pub(crate) fn build_page(config: &DatepickerConfig, view: ViewKind, focused: NaiveDate, today: NaiveDate) -> GridPage {
    let bounds = ViewBounds::new(config.min_date, config.max_date);
    let locale = config.resolved_locale();
    let range = config.is_range();
    let calendar: Box<dyn CalendarView> = match view {
        ViewKind::Day => {
            let mut day = DayView::new(focused, range, bounds, config.week_start(), today, locale);
            day.hide_week_numbers = config.hide_week_numbers;
            day.rebuild();
            Box::new(day)
        }
        ViewKind::Month => Box::new(MonthView::new(focused, range, bounds, today, locale)),
        ViewKind::Year => Box::new(YearView::new(focused, range, bounds, today)),
    };
    GridPage {
        view,
        header: calendar.header_label(),
        week_numbers: calendar.body().row_labels.clone(),
        rows: calendar.rows().clone(),
    }
}

/// Plain-text grid. Adjacent-month days are shown in parentheses, disabled
/// cells are replaced with `--` and today is marked with `*`.
pub(crate) fn write_page<W: Write>(page: &GridPage, out: &mut W) -> Result<()> {
    let width = match page.view {
        ViewKind::Day => 4,
        ViewKind::Month => 12,
        ViewKind::Year => 7,
    };
    writeln!(out, "{}", page.header)?;
    writeln!(out, "---")?;
    for (r, row) in page.rows.iter().enumerate() {
        if let Some(label) = page.week_numbers.as_ref().and_then(|l| l.get(r)) {
            write!(out, "{label:>2} | ")?;
        }
        for cell in row {
            let mut text = if cell.disabled {
                "--".to_string()
            } else if cell.is_preview {
                format!("({})", cell.display_value)
            } else {
                cell.display_value.clone()
            };
            if cell.is_today {
                text.push('*');
            }
            write!(out, "{text:<width$}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

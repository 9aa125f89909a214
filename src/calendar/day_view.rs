use crate::calc::compare::{
    is_after_month, is_another_month_or_year, is_same_date, is_same_month, is_same_or_between,
};
use crate::calc::date_math::{
    add_days, add_days_in_range, add_months_in_range, date_same_or_between, first_date_in_month,
    last_date_in_month, week_end_date, week_of_year, week_start_date,
};
use crate::calc::parse::format_date;
use crate::calc::selection::SelectionStrategy;
use crate::calendar::body::CalendarBody;
use crate::calendar::cell::{into_rows, Cell, Grid};
use crate::calendar::{CalendarEvent, CalendarView, NavKey, ViewBounds};
use crate::data::locale::Locale;
use crate::data::model::WeekStart;
use chrono::{Datelike, NaiveDate};
use tracing::trace;

pub const DAY_COLUMNS: usize = 7;
pub const DAY_ROWS: usize = 6;

pub struct DayGridParams<'a> {
    pub focused_date: NaiveDate,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub week_start: WeekStart,
    pub today: NaiveDate,
    pub locale: &'a Locale,
}

/// Builds the six-week grid for the month of `focused_date`, starting on the
/// configured first day of the week that contains the 1st.
pub fn build_day_grid(p: &DayGridParams) -> Grid {
    let month_start = first_date_in_month(p.focused_date);
    let month_end = last_date_in_month(p.focused_date);
    let first = week_start_date(month_start, p.week_start);
    let cells = (0..(DAY_ROWS * DAY_COLUMNS) as i64)
        .map(|i| {
            let date = add_days(first, i);
            let active_month = is_same_or_between(date, Some(month_start), Some(month_end));
            Cell {
                value: date.day(),
                disabled: !is_same_or_between(date, p.min_date, p.max_date),
                aria_label: format_date(date.and_time(chrono::NaiveTime::MIN), p.locale.full_date, p.locale),
                display_value: date.day().to_string(),
                is_preview: !active_month,
                is_today: is_same_date(date, Some(p.today)),
                value_raw: date,
                classes: vec!["day", if active_month { "current-month" } else { "adjacent-month" }],
            }
        })
        .collect();
    into_rows(cells, DAY_COLUMNS)
}

/// Week numbers for each grid row, taken from the row's first day.
pub fn week_numbers(grid: &Grid, week_start: WeekStart) -> Vec<String> {
    grid.iter()
        .filter_map(|row| row.first())
        .map(|cell| week_of_year(cell.value_raw, week_start).to_string())
        .collect()
}

/// Month calendar with day granularity.
pub struct DayView {
    body: CalendarBody,
    bounds: ViewBounds,
    pub week_start: WeekStart,
    pub hide_week_numbers: bool,
    pub today: NaiveDate,
    locale: &'static Locale,
}

impl DayView {
    pub fn new(
        focused_date: NaiveDate,
        range_selection: bool,
        bounds: ViewBounds,
        week_start: WeekStart,
        today: NaiveDate,
        locale: &'static Locale,
    ) -> Self {
        let selection = SelectionStrategy::new(range_selection, crate::calc::CompareAdapter::Day);
        let mut view = DayView {
            body: CalendarBody::new(focused_date, selection),
            bounds,
            week_start,
            hide_week_numbers: false,
            today,
            locale,
        };
        view.rebuild();
        view
    }

    pub fn weekday_headers(&self) -> Vec<&'static str> {
        self.locale.weekday_headers(self.week_start)
    }

    pub fn is_today_disabled(&self) -> bool {
        is_same_month(self.today, Some(self.body.focused_date))
    }

    pub fn go_to_today(&mut self) -> Vec<CalendarEvent> {
        self.update_focused_date(self.today)
    }

    /// Pointer focus on a cell. Disabled and adjacent-month cells are ignored.
    pub fn activate(&mut self, date: NaiveDate) -> Vec<CalendarEvent> {
        let cell = self
            .body
            .rows
            .iter()
            .flatten()
            .find(|c| c.value_raw == date)
            .cloned();
        match cell {
            Some(cell) if self.body.activate_cell(&cell) => vec![CalendarEvent::FocusChanged(date)],
            _ => Vec::new(),
        }
    }

    fn update_by_day(&mut self, offset: i64) -> Vec<CalendarEvent> {
        let b = self.bounds;
        self.update_focused_date(add_days_in_range(self.body.focused_date, offset, b.nav_min(), b.nav_max()))
    }

    fn update_by_month(&mut self, offset: i32) -> Vec<CalendarEvent> {
        let b = self.bounds;
        self.update_focused_date(add_months_in_range(self.body.focused_date, offset, b.nav_min(), b.nav_max()))
    }

    fn update_focused_date(&mut self, new_date: NaiveDate) -> Vec<CalendarEvent> {
        let prev = self.body.focused_date;
        if is_same_date(prev, Some(new_date)) {
            return Vec::new();
        }
        trace!(from = %prev, to = %new_date, "day view focus moved");
        self.body.focused_date = new_date;
        let mut events = vec![CalendarEvent::FocusChanged(new_date)];
        if is_another_month_or_year(new_date, prev) {
            self.rebuild();
            events.push(CalendarEvent::ActiveMonthChanged(new_date));
        }
        self.body.track_focus();
        events
    }

    fn set_month_offset(&mut self, offset: i32) -> Vec<CalendarEvent> {
        let b = self.bounds;
        let target = add_months_in_range(self.body.focused_date, offset, b.nav_min(), b.nav_max());
        self.body.focused_date = target;
        self.rebuild();
        vec![CalendarEvent::FocusChanged(target), CalendarEvent::ActiveMonthChanged(target)]
    }
}

impl CalendarView for DayView {
    fn body(&self) -> &CalendarBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut CalendarBody {
        &mut self.body
    }

    fn bounds_mut(&mut self) -> &mut ViewBounds {
        &mut self.bounds
    }

    fn rebuild(&mut self) -> Vec<CalendarEvent> {
        self.body.rows = build_day_grid(&DayGridParams {
            focused_date: self.body.focused_date,
            min_date: self.bounds.min_date,
            max_date: self.bounds.max_date,
            week_start: self.week_start,
            today: self.today,
            locale: self.locale,
        });
        self.body.row_labels = if self.hide_week_numbers {
            None
        } else {
            Some(week_numbers(&self.body.rows, self.week_start))
        };
        Vec::new()
    }

    fn handle_key(&mut self, key: NavKey, rtl: bool) -> Vec<CalendarEvent> {
        match key {
            NavKey::Left => self.update_by_day(if rtl { 1 } else { -1 }),
            NavKey::Right => self.update_by_day(if rtl { -1 } else { 1 }),
            NavKey::Up => self.update_by_day(-7),
            NavKey::Down => self.update_by_day(7),
            NavKey::Home => {
                let b = self.bounds;
                let target = week_start_date(self.body.focused_date, self.week_start);
                self.update_focused_date(date_same_or_between(target, b.nav_min(), b.nav_max()))
            }
            NavKey::End => {
                let b = self.bounds;
                let target = week_end_date(self.body.focused_date, self.week_start);
                self.update_focused_date(date_same_or_between(target, b.nav_min(), b.nav_max()))
            }
            NavKey::PageUp => self.update_by_month(-1),
            NavKey::PageDown => self.update_by_month(1),
            NavKey::Select => self
                .body
                .select_focused()
                .map(CalendarEvent::Selected)
                .into_iter()
                .collect(),
            NavKey::Escape => Vec::new(),
        }
    }

    fn previous(&mut self) -> Vec<CalendarEvent> {
        self.set_month_offset(-1)
    }

    fn next(&mut self) -> Vec<CalendarEvent> {
        self.set_month_offset(1)
    }

    fn is_previous_disabled(&self) -> bool {
        let focused = self.body.focused_date;
        self.bounds
            .nav_min()
            .is_some_and(|min| is_same_month(focused, Some(min)) || is_after_month(min, focused))
    }

    fn is_next_disabled(&self) -> bool {
        let focused = self.body.focused_date;
        self.bounds
            .nav_max()
            .is_some_and(|max| is_same_month(focused, Some(max)) || is_after_month(focused, max))
    }

    fn header_label(&self) -> String {
        let focused = self.body.focused_date;
        format!("{} {}", self.locale.month_name(focused.month()), focused.year())
    }
}

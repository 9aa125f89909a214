use crate::calc::compare::{is_same_year, CompareAdapter};
use crate::calc::date_math::add_years_in_range;
use crate::calc::selection::SelectionStrategy;
use crate::calendar::body::CalendarBody;
use crate::calendar::cell::{into_rows, Cell, Grid};
use crate::calendar::{CalendarEvent, CalendarView, NavKey, ViewBounds};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, trace};

pub const YEAR_COLUMNS: usize = 3;
pub const YEAR_SPAN: i32 = 18;

/// The block of years shown by the year view, inclusive on both ends.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearWindow {
    pub from: i32,
    pub to: i32,
}

impl YearWindow {
    /// Window of `YEAR_SPAN` years from `from`, kept inside the years chrono
    /// can represent.
    fn starting(from: i32) -> Self {
        let from = from.clamp(NaiveDate::MIN.year(), NaiveDate::MAX.year() - YEAR_SPAN + 1);
        YearWindow {
            from,
            to: from + YEAR_SPAN - 1,
        }
    }

    /// Window placing `year` in the tenth slot.
    pub fn around(year: i32) -> Self {
        YearWindow::starting(year - 9)
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.from..=self.to).contains(&year)
    }

    /// Shifts `previous` by whole windows until `year` is inside it. Returns
    /// the window and whether it differs from `previous`.
    pub fn resolve(previous: Option<YearWindow>, year: i32) -> (YearWindow, bool) {
        let Some(prev) = previous else {
            return (YearWindow::around(year), true);
        };
        let from = if year > prev.to {
            prev.from + (year - prev.from).abs() / YEAR_SPAN * YEAR_SPAN
        } else if year < prev.from {
            let distance = (prev.from - year).abs();
            prev.from - (distance + YEAR_SPAN - 1) / YEAR_SPAN * YEAR_SPAN
        } else {
            prev.from
        };
        let window = YearWindow::starting(from);
        (window, window != prev)
    }
}

/// Eighteen cells for `window`, three per row.
pub fn build_year_grid(window: YearWindow, bounds: &ViewBounds, today: NaiveDate) -> Grid {
    let (min, max) = (bounds.nav_min(), bounds.nav_max());
    let cells = (window.from..=window.to)
        .filter_map(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .map(|date| {
            let label = date.year().to_string();
            Cell {
                value: date.year().unsigned_abs(),
                disabled: !CompareAdapter::Year.is_equal_or_between(date, min, max),
                aria_label: label.clone(),
                display_value: label,
                is_preview: false,
                is_today: is_same_year(date, Some(today)),
                value_raw: date,
                classes: vec!["year"],
            }
        })
        .collect();
    into_rows(cells, YEAR_COLUMNS)
}

pub struct YearView {
    body: CalendarBody,
    bounds: ViewBounds,
    window: YearWindow,
    pub today: NaiveDate,
}

impl YearView {
    pub fn new(focused_date: NaiveDate, range_selection: bool, bounds: ViewBounds, today: NaiveDate) -> Self {
        let selection = SelectionStrategy::new(range_selection, CompareAdapter::Year);
        let mut view = YearView {
            body: CalendarBody::new(focused_date, selection),
            bounds,
            window: YearWindow::around(focused_date.year()),
            today,
        };
        view.rebuild();
        view
    }

    pub fn window(&self) -> YearWindow {
        self.window
    }

    /// Starts over with a window around the focused year, as when the view
    /// is opened.
    pub fn recenter(&mut self) {
        self.window = YearWindow::around(self.body.focused_date.year());
    }

    /// Moves the focus by whole windows (`direction` of ±1).
    pub fn change_visible_year_range(&mut self, direction: i32) -> Vec<CalendarEvent> {
        self.update_by_year(direction * YEAR_SPAN)
    }

    /// Pointer activation of a year cell.
    pub fn activate(&mut self, year: NaiveDate) -> Vec<CalendarEvent> {
        let enabled = self
            .body
            .rows
            .iter()
            .flatten()
            .any(|c| is_same_year(c.value_raw, Some(year)) && !c.disabled);
        if !enabled {
            return Vec::new();
        }
        let offset = year.year() - self.body.focused_date.year();
        self.update_by_year(offset)
    }

    fn update_by_year(&mut self, offset: i32) -> Vec<CalendarEvent> {
        let b = self.bounds;
        let prev = self.body.focused_date;
        let target = add_years_in_range(prev, offset, b.nav_min(), b.nav_max());
        if is_same_year(prev, Some(target)) {
            self.body.focused_date = target;
            return Vec::new();
        }
        trace!(from = %prev, to = %target, "year view focus moved");
        self.body.focused_date = target;
        let mut events = vec![CalendarEvent::FocusChanged(target)];
        events.extend(self.rebuild());
        self.body.track_focus();
        events
    }
}

impl CalendarView for YearView {
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
        let (window, changed) = YearWindow::resolve(Some(self.window), self.body.focused_date.year());
        self.window = window;
        self.body.rows = build_year_grid(window, &self.bounds, self.today);
        self.body.row_labels = None;
        if changed {
            debug!(from = window.from, to = window.to, "year window changed");
            vec![CalendarEvent::YearRangeChanged {
                from: window.from,
                to: window.to,
            }]
        } else {
            Vec::new()
        }
    }

    fn handle_key(&mut self, key: NavKey, rtl: bool) -> Vec<CalendarEvent> {
        let focused_year = self.body.focused_date.year();
        match key {
            NavKey::Left => self.update_by_year(if rtl { 1 } else { -1 }),
            NavKey::Right => self.update_by_year(if rtl { -1 } else { 1 }),
            NavKey::Up => self.update_by_year(-(YEAR_COLUMNS as i32)),
            NavKey::Down => self.update_by_year(YEAR_COLUMNS as i32),
            NavKey::PageUp => self.update_by_year(-(focused_year - self.window.from)),
            NavKey::PageDown => self.update_by_year(self.window.to - focused_year),
            NavKey::Home | NavKey::End => Vec::new(),
            NavKey::Select => self
                .body
                .select_focused()
                .map(CalendarEvent::Selected)
                .into_iter()
                .collect(),
            NavKey::Escape => vec![CalendarEvent::Cancelled],
        }
    }

    fn previous(&mut self) -> Vec<CalendarEvent> {
        self.change_visible_year_range(-1)
    }

    fn next(&mut self) -> Vec<CalendarEvent> {
        self.change_visible_year_range(1)
    }

    fn is_previous_disabled(&self) -> bool {
        self.bounds
            .nav_min()
            .is_some_and(|min| min.year() >= self.window.from)
    }

    fn is_next_disabled(&self) -> bool {
        self.bounds
            .nav_max()
            .is_some_and(|max| max.year() <= self.window.to)
    }

    fn header_label(&self) -> String {
        format!("{} - {}", self.window.from, self.window.to)
    }
}

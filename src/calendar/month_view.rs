use crate::calc::compare::{is_after_year, is_same_date, is_same_month, is_same_year, CompareAdapter};
use crate::calc::date_math::{
    add_months, add_months_in_range, add_years_in_range, change_day, first_date_in_year,
};
use crate::calc::selection::SelectionStrategy;
use crate::calendar::body::CalendarBody;
use crate::calendar::cell::{into_rows, Cell, Grid};
use crate::calendar::{CalendarEvent, CalendarView, NavKey, ViewBounds};
use crate::data::locale::Locale;
use chrono::{Datelike, NaiveDate};
use tracing::trace;

pub const MONTH_COLUMNS: usize = 2;

/// Twelve cells, one per month of the focused year, laid out in two columns.
/// A month is disabled when it falls outside the navigable month range.
pub fn build_month_grid(
    focused_date: NaiveDate,
    bounds: &ViewBounds,
    today: NaiveDate,
    locale: &Locale,
) -> Grid {
    let january = first_date_in_year(focused_date);
    let (min, max) = (bounds.nav_min(), bounds.nav_max());
    let cells = (0..12)
        .map(|i| {
            let date = add_months(january, i);
            Cell {
                value: date.month(),
                disabled: !CompareAdapter::Month.is_equal_or_between(date, min, max),
                aria_label: format!("{} {}", locale.month_name(date.month()), date.year()),
                display_value: locale.month_name(date.month()).to_string(),
                is_preview: false,
                is_today: is_same_month(date, Some(today)),
                value_raw: date,
                classes: vec!["month"],
            }
        })
        .collect();
    into_rows(cells, MONTH_COLUMNS)
}

/// Year-at-a-glance view used to pick a month.
pub struct MonthView {
    body: CalendarBody,
    bounds: ViewBounds,
    pub today: NaiveDate,
    locale: &'static Locale,
}

impl MonthView {
    pub fn new(
        focused_date: NaiveDate,
        range_selection: bool,
        bounds: ViewBounds,
        today: NaiveDate,
        locale: &'static Locale,
    ) -> Self {
        let selection = SelectionStrategy::new(range_selection, CompareAdapter::Month);
        let mut view = MonthView {
            body: CalendarBody::new(focused_date, selection),
            bounds,
            today,
            locale,
        };
        view.rebuild();
        view
    }

    /// Pointer activation of a month cell. The focused day of month is kept
    /// and clamped to the target month.
    pub fn activate(&mut self, month: NaiveDate) -> Vec<CalendarEvent> {
        let target = change_day(month, self.body.focused_date.day());
        match self.body.rows.iter().flatten().find(|c| is_same_month(c.value_raw, Some(month))) {
            Some(cell) if !cell.disabled => {
                self.body.focused_date = target;
                self.body.track_focus();
                vec![CalendarEvent::FocusChanged(target)]
            }
            _ => Vec::new(),
        }
    }

    fn update_by_month(&mut self, offset: i32) -> Vec<CalendarEvent> {
        let b = self.bounds;
        let target = add_months_in_range(self.body.focused_date, offset, b.nav_min(), b.nav_max());
        self.update_focused_date(target)
    }

    fn update_by_year(&mut self, offset: i32) -> Vec<CalendarEvent> {
        let b = self.bounds;
        let target = add_years_in_range(self.body.focused_date, offset, b.nav_min(), b.nav_max());
        self.update_focused_date(target)
    }

    fn update_focused_date(&mut self, new_date: NaiveDate) -> Vec<CalendarEvent> {
        let prev = self.body.focused_date;
        if is_same_month(prev, Some(new_date)) {
            if !is_same_date(prev, Some(new_date)) {
                self.body.focused_date = new_date;
            }
            return Vec::new();
        }
        trace!(from = %prev, to = %new_date, "month view focus moved");
        self.body.focused_date = new_date;
        let mut events = vec![CalendarEvent::FocusChanged(new_date)];
        if !is_same_year(prev, Some(new_date)) {
            self.rebuild();
            events.push(CalendarEvent::ActiveMonthChanged(new_date));
        }
        self.body.track_focus();
        events
    }

    fn set_year_offset(&mut self, offset: i32) -> Vec<CalendarEvent> {
        let b = self.bounds;
        let target = add_years_in_range(self.body.focused_date, offset, b.nav_min(), b.nav_max());
        self.body.focused_date = target;
        self.rebuild();
        vec![CalendarEvent::FocusChanged(target), CalendarEvent::ActiveMonthChanged(target)]
    }
}

impl CalendarView for MonthView {
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
        self.body.rows = build_month_grid(self.body.focused_date, &self.bounds, self.today, self.locale);
        self.body.row_labels = None;
        Vec::new()
    }

    fn handle_key(&mut self, key: NavKey, rtl: bool) -> Vec<CalendarEvent> {
        match key {
            NavKey::Left => self.update_by_month(if rtl { 1 } else { -1 }),
            NavKey::Right => self.update_by_month(if rtl { -1 } else { 1 }),
            NavKey::Up => self.update_by_month(-(MONTH_COLUMNS as i32)),
            NavKey::Down => self.update_by_month(MONTH_COLUMNS as i32),
            NavKey::PageUp => self.update_by_year(-1),
            NavKey::PageDown => self.update_by_year(1),
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
        self.set_year_offset(-1)
    }

    fn next(&mut self) -> Vec<CalendarEvent> {
        self.set_year_offset(1)
    }

    fn is_previous_disabled(&self) -> bool {
        let focused = self.body.focused_date;
        self.bounds
            .nav_min()
            .is_some_and(|min| is_same_year(focused, Some(min)) || is_after_year(min, focused))
    }

    fn is_next_disabled(&self) -> bool {
        let focused = self.body.focused_date;
        self.bounds
            .nav_max()
            .is_some_and(|max| is_same_year(focused, Some(max)) || is_after_year(focused, max))
    }

    fn header_label(&self) -> String {
        self.body.focused_date.year().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::locale::{DE, EN};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn view(focused: NaiveDate, bounds: ViewBounds) -> MonthView {
        MonthView::new(focused, false, bounds, d(2022, 3, 15), &EN)
    }

    #[test]
    fn test_month_grid_has_twelve_cells_in_two_columns() {
        let grid = build_month_grid(d(2022, 3, 26), &ViewBounds::default(), d(2022, 3, 15), &EN);
        assert_eq!(grid.len(), 6);
        assert!(grid.iter().all(|r| r.len() == 2));
        assert_eq!(grid[0][0].value_raw, d(2022, 1, 1));
        assert_eq!(grid[5][1].value_raw, d(2022, 12, 1));
        assert_eq!(grid[1][0].aria_label, "March 2022");
        assert_eq!(grid[1][0].display_value, "March");
        assert!(grid[1][0].is_today);
        assert_eq!(grid[1][0].classes, vec!["month"]);
    }

    #[test]
    fn test_month_grid_disables_outside_bounds() {
        let bounds = ViewBounds::new(Some(d(2022, 3, 20)), Some(d(2022, 10, 2)));
        let grid = build_month_grid(d(2022, 6, 1), &bounds, d(2022, 3, 15), &EN);
        let flat: Vec<&Cell> = grid.iter().flatten().collect();
        assert!(flat[1].disabled);
        assert!(!flat[2].disabled);
        assert!(!flat[9].disabled);
        assert!(flat[10].disabled);
    }

    #[test]
    fn test_month_grid_uses_locale_names() {
        let grid = build_month_grid(d(2022, 3, 26), &ViewBounds::default(), d(2022, 3, 15), &DE);
        assert_eq!(grid[1][0].display_value, "März");
    }

    #[test]
    fn test_arrows_move_by_month_and_columns() {
        let mut v = view(d(2022, 3, 26), ViewBounds::default());
        assert_eq!(v.handle_key(NavKey::Right, false), vec![CalendarEvent::FocusChanged(d(2022, 4, 26))]);
        v.handle_key(NavKey::Down, false);
        assert_eq!(v.focused_date(), d(2022, 6, 26));
        v.handle_key(NavKey::Up, false);
        v.handle_key(NavKey::Left, true);
        assert_eq!(v.focused_date(), d(2022, 5, 26));
    }

    #[test]
    fn test_crossing_year_emits_active_month_change() {
        let mut v = view(d(2022, 12, 31), ViewBounds::default());
        let events = v.handle_key(NavKey::Right, false);
        assert_eq!(
            events,
            vec![
                CalendarEvent::FocusChanged(d(2023, 1, 31)),
                CalendarEvent::ActiveMonthChanged(d(2023, 1, 31))
            ]
        );
        assert_eq!(v.rows()[0][0].value_raw, d(2023, 1, 1));
    }

    #[test]
    fn test_page_keys_move_by_year() {
        let mut v = view(d(2022, 3, 26), ViewBounds::default());
        v.handle_key(NavKey::PageDown, false);
        assert_eq!(v.focused_date(), d(2023, 3, 26));
        v.handle_key(NavKey::PageUp, false);
        v.handle_key(NavKey::PageUp, false);
        assert_eq!(v.focused_date(), d(2021, 3, 26));
    }

    #[test]
    fn test_navigation_clamps_to_month_bounds() {
        let bounds = ViewBounds {
            max_month: Some(d(2022, 5, 31)),
            ..ViewBounds::default()
        };
        let mut v = view(d(2022, 4, 10), bounds);
        v.handle_key(NavKey::Down, false);
        assert_eq!(v.focused_date(), d(2022, 5, 31));
        assert!(v.is_next_disabled());
    }

    #[test]
    fn test_escape_cancels() {
        let mut v = view(d(2022, 3, 26), ViewBounds::default());
        assert_eq!(v.handle_key(NavKey::Escape, false), vec![CalendarEvent::Cancelled]);
        assert!(v.handle_key(NavKey::Home, false).is_empty());
    }

    #[test]
    fn test_select_focused_month() {
        let mut v = view(d(2022, 3, 26), ViewBounds::default());
        assert_eq!(v.handle_key(NavKey::Select, false), vec![CalendarEvent::Selected(d(2022, 3, 1))]);
    }

    #[test]
    fn test_activate_keeps_day_of_month() {
        let mut v = view(d(2022, 1, 31), ViewBounds::default());
        assert_eq!(v.activate(d(2022, 2, 1)), vec![CalendarEvent::FocusChanged(d(2022, 2, 28))]);
        assert_eq!(v.focused_date(), d(2022, 2, 28));
    }

    #[test]
    fn test_previous_next_header() {
        let bounds = ViewBounds::new(Some(d(2021, 6, 1)), Some(d(2023, 2, 1)));
        let mut v = view(d(2022, 3, 26), bounds);
        assert_eq!(v.header_label(), "2022");
        assert!(!v.is_previous_disabled());
        let events = v.previous();
        assert!(events.contains(&CalendarEvent::ActiveMonthChanged(d(2021, 6, 1))));
        assert!(v.is_previous_disabled());
        v.next();
        v.next();
        assert_eq!(v.focused_date(), d(2023, 2, 1));
        assert!(v.is_next_disabled());
    }
}

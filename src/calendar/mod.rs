pub mod body;
pub mod cell;
pub mod day_view;
pub mod month_view;
pub mod year_view;

pub use body::{CalendarBody, CellState};
pub use cell::{Cell, Grid};
pub use day_view::DayView;
pub use month_view::MonthView;
pub use year_view::{YearView, YearWindow};

use crate::calc::date_math::{max_date, min_date};
use chrono::NaiveDate;

/// Selectable and navigable limits of a calendar view.
///
/// `min_date`/`max_date` decide which cells are selectable; `min_month`/
/// `max_month` additionally restrict how far a calendar can be scrolled when
/// two calendars are shown next to each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewBounds {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub min_month: Option<NaiveDate>,
    pub max_month: Option<NaiveDate>,
}

impl ViewBounds {
    pub fn new(min_date: Option<NaiveDate>, max_date: Option<NaiveDate>) -> Self {
        ViewBounds {
            min_date,
            max_date,
            ..Default::default()
        }
    }

    /// The tighter of the two lower limits.
    pub fn nav_min(&self) -> Option<NaiveDate> {
        max_date(self.min_date, self.min_month)
    }

    /// The tighter of the two upper limits.
    pub fn nav_max(&self) -> Option<NaiveDate> {
        min_date(self.max_date, self.max_month)
    }
}

/// Keyboard intents understood by the calendar views.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Select,
    Escape,
}

/// Notifications emitted by a view in response to input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarEvent {
    FocusChanged(NaiveDate),
    /// Focus crossed into another month (day view) or year (month view).
    ActiveMonthChanged(NaiveDate),
    YearRangeChanged { from: i32, to: i32 },
    Selected(NaiveDate),
    /// Escape in the month or year view.
    Cancelled,
}

/// Common surface of the day, month and year views used by the datepicker.
pub trait CalendarView {
    fn body(&self) -> &CalendarBody;
    fn body_mut(&mut self) -> &mut CalendarBody;
    fn bounds_mut(&mut self) -> &mut ViewBounds;
    /// Rebuilds the grid from the current focus, bounds and selection.
    fn rebuild(&mut self) -> Vec<CalendarEvent>;
    fn handle_key(&mut self, key: NavKey, rtl: bool) -> Vec<CalendarEvent>;
    fn previous(&mut self) -> Vec<CalendarEvent>;
    fn next(&mut self) -> Vec<CalendarEvent>;
    fn is_previous_disabled(&self) -> bool;
    fn is_next_disabled(&self) -> bool;
    fn header_label(&self) -> String;

    fn focused_date(&self) -> NaiveDate {
        self.body().focused_date
    }

    fn rows(&self) -> &Grid {
        &self.body().rows
    }
}

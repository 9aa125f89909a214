use crate::calc::date_math::{next_month, previous_month};
use crate::calendar::NavKey;
use crate::data::config::DatepickerConfig;
use crate::data::model::{DateRange, RangeType, ViewKind};
use crate::picker::datepicker::Datepicker;
use crate::picker::time_input::TimePart;
use crate::picker::PickerEvent;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Two calendars side by side editing one range.
///
/// The first calendar owns the start, the second the end. Each calendar
/// limits how far the other can scroll, so the second always shows a later
/// period than the first.
pub struct DateRangePicker {
    only_month: bool,
    calendars: [Datepicker; 2],
    active: usize,
    range: DateRange,
    range_type: Option<RangeType>,
}

/// Range type a fresh picker continues with: finish an open range,
/// otherwise start a new one.
pub fn initial_range_type(range: &DateRange) -> RangeType {
    if range.start.is_some() && range.end.is_none() {
        RangeType::End
    } else {
        RangeType::Start
    }
}

/// Earliest period the second calendar may show once the first one
/// focuses `focused`.
fn min_month_after(only_month: bool, focused: NaiveDate) -> NaiveDate {
    if only_month {
        NaiveDate::from_ymd_opt(focused.year() + 1, 1, 1).unwrap_or(focused)
    } else {
        next_month(focused)
    }
}

fn max_month_before(only_month: bool, focused: NaiveDate) -> NaiveDate {
    if only_month {
        NaiveDate::from_ymd_opt(focused.year() - 1, 12, 31).unwrap_or(focused)
    } else {
        previous_month(focused)
    }
}

impl DateRangePicker {
    pub fn new(config: DatepickerConfig, now: NaiveDateTime) -> Self {
        let only_month = config.only_month_selection;
        let config = DatepickerConfig {
            enable_date_range: true,
            ..config
        };
        let mut first = Datepicker::new(config.clone(), now);
        first.set_role(Some(RangeType::Start));
        let mut second = Datepicker::new(config, now);
        second.set_role(Some(RangeType::End));
        DateRangePicker {
            only_month,
            calendars: [first, second],
            active: 0,
            range: DateRange::default(),
            range_type: None,
        }
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
        for calendar in &mut self.calendars {
            calendar.set_date_range_input(range);
        }
    }

    /// Resolves the range type and lays both calendars out next to each
    /// other.
    pub fn init(&mut self) {
        let range_type = initial_range_type(&self.range);
        self.range_type = Some(range_type);
        let [first, second] = &mut self.calendars;
        first.set_range_type(Some(range_type));
        second.set_range_type(Some(range_type));
        first.init();
        second.set_min_month(Some(min_month_after(self.only_month, first.focused_date())));
        second.init();
        first.set_max_month(Some(max_month_before(self.only_month, second.focused_date())));
        debug!(
            first = %first.focused_date(),
            second = %second.focused_date(),
            ?range_type,
            "range picker initialised"
        );
    }

    pub fn first(&self) -> &Datepicker {
        &self.calendars[0]
    }

    pub fn second(&self) -> &Datepicker {
        &self.calendars[1]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Datepicker {
        &self.calendars[self.active]
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn range_type(&self) -> Option<RangeType> {
        self.range_type
    }

    /// Moves keyboard focus to the other calendar. The hover moves along.
    pub fn switch_calendar(&mut self) {
        let hover = self.calendars[self.active].active_hover();
        self.active = 1 - self.active;
        self.calendars[self.active].set_active_hover(hover);
    }

    pub fn handle_key(&mut self, key: NavKey) -> Vec<PickerEvent> {
        self.with_active(|picker| picker.handle_key(key))
    }

    pub fn previous(&mut self) -> Vec<PickerEvent> {
        self.with_active(Datepicker::previous)
    }

    pub fn next(&mut self) -> Vec<PickerEvent> {
        self.with_active(Datepicker::next)
    }

    pub fn go_to_today(&mut self) -> Vec<PickerEvent> {
        self.with_active(Datepicker::go_to_today)
    }

    pub fn switch_view(&mut self, view: ViewKind) -> Vec<PickerEvent> {
        self.with_active(|picker| picker.switch_view(view))
    }

    pub fn step_time(&mut self, part: TimePart, up: bool) -> Vec<PickerEvent> {
        self.with_active(|picker| picker.step_time(part, up))
    }

    pub fn toggle_meridian(&mut self) -> Vec<PickerEvent> {
        self.with_active(Datepicker::toggle_meridian)
    }

    pub fn type_time_part(&mut self, part: TimePart, text: &str) -> Vec<PickerEvent> {
        self.with_active(|picker| picker.type_time_part(part, text))
    }

    /// Pointer over a cell of calendar `index`. Both calendars share the
    /// hover so the preview spans the two grids.
    pub fn hover_at(&mut self, index: usize, row: usize, col: usize) {
        let Some(calendar) = self.calendars.get_mut(index) else {
            return;
        };
        calendar.hover_at(row, col);
        let hover = calendar.active_hover();
        self.calendars[1 - index].set_active_hover(hover);
    }

    pub fn clear_hover(&mut self) {
        for calendar in &mut self.calendars {
            calendar.clear_hover();
        }
    }

    /// A click also moves the keyboard focus to the clicked calendar.
    pub fn click_at(&mut self, index: usize, row: usize, col: usize) -> Vec<PickerEvent> {
        if index >= self.calendars.len() {
            return Vec::new();
        }
        self.active = index;
        self.with_active(|picker| picker.click_at(row, col))
    }

    /// Both calendars follow the ignore-time switch.
    pub fn toggle_disabled_time(&mut self) -> Vec<PickerEvent> {
        let events = self.calendars[0].toggle_disabled_time();
        self.calendars[1].toggle_disabled_time();
        events
    }

    /// Runs `op` on the active calendar, then shares the resulting range,
    /// range type and hover with the other one and re-wires the month
    /// limits if the focus moved.
    fn with_active<F>(&mut self, op: F) -> Vec<PickerEvent>
    where
        F: FnOnce(&mut Datepicker) -> Vec<PickerEvent>,
    {
        let index = self.active;
        let before = self.calendars[index].focused_date();
        let events = op(&mut self.calendars[index]);

        let active = &self.calendars[index];
        let (range, range_type, hover) = (active.date_range(), active.range_type(), active.active_hover());
        let focused = active.focused_date();
        self.range = range;
        self.range_type = range_type;
        let other = &mut self.calendars[1 - index];
        other.sync_range(range, range_type);
        other.set_active_hover(hover);

        if before != focused {
            if index == 0 {
                let min = min_month_after(self.only_month, focused);
                self.calendars[1].set_min_month(Some(min));
            } else {
                let max = max_month_before(self.only_month, focused);
                self.calendars[0].set_max_month(Some(max));
            }
        }
        events
    }
}

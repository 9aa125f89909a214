use crate::calc::compare::{is_after, is_same_date, is_same_or_between};
use crate::calc::date_math::{change_day, date_same_or_between, date_without_time};
use crate::calendar::{
    CalendarEvent, CalendarView, Cell, CellState, DayView, Grid, MonthView, NavKey, ViewBounds,
    YearView,
};
use crate::data::config::DatepickerConfig;
use crate::data::locale::Locale;
use crate::data::model::{DateRange, RangeType, ViewKind};
use crate::picker::time_input::{TimeInput, TimePart};
use crate::picker::PickerEvent;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tracing::{debug, trace};

/// Top-level picker state machine.
///
/// Owns the committed value (`date` or `date_range`), the navigational focus
/// and the time of day, and drives whichever of the day, month or year view
/// is active. Views only ever see a copy of this state pushed in by `sync`.
pub struct Datepicker {
    config: DatepickerConfig,
    locale: &'static Locale,
    now: NaiveDateTime,
    view: ViewKind,
    month_view_switch_to: ViewKind,
    year_view_switch_to: ViewKind,
    day: DayView,
    month: MonthView,
    year: YearView,
    focused_date: NaiveDate,
    date: Option<NaiveDateTime>,
    date_range: DateRange,
    range_type: Option<RangeType>,
    date_range_role: Option<RangeType>,
    min_month: Option<NaiveDate>,
    max_month: Option<NaiveDate>,
    time: Option<NaiveTime>,
    previous_time: Option<NaiveTime>,
    disabled_time: bool,
    time_invalid: bool,
    time_input: TimeInput,
    value_initialized: bool,
}

/// Local wall-clock time of UTC midnight on `date`.
///
/// Used as the "time" reported when time is switched off, so the value
/// reads 00:00:00 in UTC rather than in local time.
fn utc_midnight_as_local(date: NaiveDate) -> NaiveTime {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .with_timezone(&Local)
        .time()
}

impl Datepicker {
    pub fn new(mut config: DatepickerConfig, now: NaiveDateTime) -> Self {
        if config.mandatory_time {
            config.disabled_time = false;
        }
        let locale = config.resolved_locale();
        let today = now.date();
        let range = config.is_range();
        let bounds = ViewBounds::new(config.min_date, config.max_date);
        let mut day = DayView::new(today, range, bounds, config.week_start(), today, locale);
        day.hide_week_numbers = config.hide_week_numbers;
        let month = MonthView::new(today, range, bounds, today, locale);
        let year = YearView::new(today, range, bounds, today);
        let (view, month_view_switch_to, year_view_switch_to) = if config.only_month_selection {
            (ViewKind::Month, ViewKind::Month, ViewKind::Month)
        } else {
            (ViewKind::Day, ViewKind::Day, ViewKind::Day)
        };
        let time_input = TimeInput::new(
            config.uses_12h_clock(),
            config.show_seconds,
            config.show_milliseconds,
        );
        let mut picker = Datepicker {
            disabled_time: config.disabled_time,
            config,
            locale,
            now,
            view,
            month_view_switch_to,
            year_view_switch_to,
            day,
            month,
            year,
            focused_date: today,
            date: None,
            date_range: DateRange::default(),
            range_type: None,
            date_range_role: None,
            min_month: None,
            max_month: None,
            time: None,
            previous_time: None,
            time_invalid: false,
            time_input,
            value_initialized: false,
        };
        picker.sync();
        picker
    }

    // ── Inputs ───────────────────────────────────────────────────────────────

    pub fn set_role(&mut self, role: Option<RangeType>) {
        self.date_range_role = role;
    }

    pub fn set_range_type(&mut self, range_type: Option<RangeType>) {
        self.range_type = range_type;
        self.sync();
    }

    /// New value from the host in single-date mode. The focus follows it.
    pub fn set_date_input(&mut self, value: Option<NaiveDateTime>) {
        if self.config.is_range() {
            return;
        }
        self.date = value;
        if let Some(value) = value {
            if !self.value_initialized {
                self.previous_time = Some(value.time());
                self.value_initialized = true;
            }
            self.time = Some(value.time());
            self.focused_date = value.date();
        }
        self.sync();
    }

    /// New range from the host. Without a role the focus follows whichever
    /// endpoint changed, the start taking precedence.
    pub fn set_date_range_input(&mut self, range: DateRange) {
        let previous = self.date_range;
        self.date_range = range;
        match self.date_range_role {
            None => {
                if let Some(end) = range.end
                    && !is_same_date(end.date(), previous.end.map(|e| e.date()))
                {
                    self.focused_date = end.date();
                }
                if let Some(start) = range.start
                    && !is_same_date(start.date(), previous.start.map(|s| s.date()))
                {
                    self.focused_date = start.date();
                }
            }
            Some(role) => {
                let value = match role {
                    RangeType::Start => range.start,
                    RangeType::End => range.end,
                };
                if let Some(value) = value
                    && !self.value_initialized
                {
                    self.previous_time = Some(value.time());
                    self.time = Some(value.time());
                    self.value_initialized = true;
                }
            }
        }
        self.sync();
    }

    /// Keeps the shared range of a two-calendar picker in step without moving
    /// the focus.
    pub fn sync_range(&mut self, range: DateRange, range_type: Option<RangeType>) {
        self.date_range = range;
        self.range_type = range_type;
        self.sync();
    }

    pub fn set_min_month(&mut self, min_month: Option<NaiveDate>) {
        self.min_month = min_month;
        if let Some(min) = min_month
            && is_after(min, self.focused_date)
        {
            self.focused_date = min;
        }
        self.sync();
    }

    pub fn set_max_month(&mut self, max_month: Option<NaiveDate>) {
        self.max_month = max_month;
        if let Some(max) = max_month
            && is_after(self.focused_date, max)
        {
            self.focused_date = max;
        }
        self.sync();
    }

    /// Resolves the initial focus from the value, the range role and the
    /// configured limits.
    pub fn init(&mut self) {
        let c = &self.config;
        let range = c.is_range();
        let focused = self.focused_date;
        self.focused_date = match (self.date_range_role, self.date_range.end) {
            (None, Some(end)) if range && self.range_type == Some(RangeType::End) => end.date(),
            (Some(RangeType::Start), _) if range => {
                let max = if c.only_month_selection { self.max_month } else { c.max_date };
                let start = self.date_range.start.map(|s| s.date()).unwrap_or(focused);
                date_same_or_between(start, c.min_date, max)
            }
            (Some(RangeType::End), end) if range => {
                let min = if c.only_month_selection { self.min_month } else { c.min_date };
                let end = end.map(|e| e.date()).unwrap_or(focused);
                date_same_or_between(end, min, c.max_date)
            }
            _ => {
                let start = self.start_date().map(|s| s.date()).unwrap_or(focused);
                date_same_or_between(start, c.min_date, c.max_date)
            }
        };
        debug!(focused = %self.focused_date, role = ?self.date_range_role, "datepicker initialised");
        self.sync();
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn config(&self) -> &DatepickerConfig {
        &self.config
    }

    pub fn locale(&self) -> &'static Locale {
        self.locale
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn focused_date(&self) -> NaiveDate {
        self.focused_date
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        self.date
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn range_type(&self) -> Option<RangeType> {
        self.range_type
    }

    pub fn role(&self) -> Option<RangeType> {
        self.date_range_role
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    pub fn disabled_time(&self) -> bool {
        self.disabled_time
    }

    pub fn time_invalid(&self) -> bool {
        self.time_invalid
    }

    pub fn time_input(&self) -> &TimeInput {
        &self.time_input
    }

    /// Time controls are shown for day-granular selection only.
    pub fn shows_time(&self) -> bool {
        self.config.show_time && !self.config.only_month_selection
    }

    pub fn rows(&self) -> &Grid {
        self.active_view().rows()
    }

    pub fn week_labels(&self) -> Option<&[String]> {
        match self.view {
            ViewKind::Day => self.day.body().row_labels.as_deref(),
            _ => None,
        }
    }

    pub fn weekday_headers(&self) -> Vec<&'static str> {
        self.day.weekday_headers()
    }

    pub fn header_label(&self) -> String {
        self.active_view().header_label()
    }

    pub fn cell_state(&self, cell: &Cell) -> CellState {
        self.active_view().body().cell_state(cell)
    }

    pub fn focus_active_cell(&self) -> Option<(usize, usize)> {
        self.active_view().body().focus_active_cell()
    }

    pub fn is_previous_disabled(&self) -> bool {
        self.active_view().is_previous_disabled()
    }

    pub fn is_next_disabled(&self) -> bool {
        self.active_view().is_next_disabled()
    }

    pub fn is_today_disabled(&self) -> bool {
        self.view != ViewKind::Day || self.day.is_today_disabled()
    }

    pub fn active_hover(&self) -> Option<Cell> {
        self.active_view().body().active_hover.clone()
    }

    pub fn set_active_hover(&mut self, cell: Option<Cell>) {
        self.active_view_mut().body_mut().active_hover = cell;
    }

    // ── Pointer ──────────────────────────────────────────────────────────────

    /// Pointer over the cell at `row`, `col` of the active grid. Anything
    /// outside the grid clears the hover.
    pub fn hover_at(&mut self, row: usize, col: usize) {
        let cell = self.rows().get(row).and_then(|r| r.get(col)).cloned();
        let body = self.active_view_mut().body_mut();
        match cell {
            Some(cell) => body.hover(&cell),
            None => body.clear_hover(),
        }
    }

    /// Pointer left the grid.
    pub fn clear_hover(&mut self) {
        self.active_view_mut().body_mut().clear_hover();
    }

    /// Pointer click: focuses the cell, then selects it if it took the focus.
    pub fn click_at(&mut self, row: usize, col: usize) -> Vec<PickerEvent> {
        let Some(cell) = self.rows().get(row).and_then(|r| r.get(col)).cloned() else {
            return Vec::new();
        };
        let date = cell.value_raw;
        let view_events = match self.view {
            ViewKind::Day => self.day.activate(date),
            ViewKind::Month => self.month.activate(date),
            ViewKind::Year => self.year.activate(date),
        };
        self.focused_date = self.active_view().focused_date();
        let mut events = self.apply(view_events);
        if !cell.disabled && !cell.is_preview && self.active_view().body().is_active(&cell) {
            events.extend(self.handle_key(NavKey::Select));
        } else {
            events.extend(self.sync());
        }
        events
    }

    fn active_view(&self) -> &dyn CalendarView {
        match self.view {
            ViewKind::Day => &self.day,
            ViewKind::Month => &self.month,
            ViewKind::Year => &self.year,
        }
    }

    fn active_view_mut(&mut self) -> &mut dyn CalendarView {
        match self.view {
            ViewKind::Day => &mut self.day,
            ViewKind::Month => &mut self.month,
            ViewKind::Year => &mut self.year,
        }
    }

    fn start_date(&self) -> Option<NaiveDateTime> {
        if self.config.is_range() {
            self.date_range.start
        } else {
            self.date
        }
    }

    /// Which range endpoint a time change applies to. A two-calendar picker
    /// edits its own endpoint; a single calendar edits the endpoint picked
    /// last.
    fn time_target(&self) -> RangeType {
        self.date_range_role.unwrap_or(match self.range_type {
            Some(RangeType::End) => RangeType::Start,
            _ => RangeType::End,
        })
    }

    fn relevant_date(&self) -> Option<NaiveDateTime> {
        if !self.config.is_range() {
            return self.date;
        }
        match self.time_target() {
            RangeType::Start => self.date_range.start,
            RangeType::End => self.date_range.end,
        }
    }

    // ── Navigation ───────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: NavKey) -> Vec<PickerEvent> {
        let rtl = self.config.rtl;
        let view_before = self.view;
        let view_events = self.active_view_mut().handle_key(key, rtl);
        self.focused_date = self.active_view().focused_date();
        let mut events = self.apply(view_events);
        if key == NavKey::Escape && view_before == ViewKind::Day {
            events.push(PickerEvent::Dismissed);
        }
        events.extend(self.sync());
        events
    }

    pub fn previous(&mut self) -> Vec<PickerEvent> {
        let view_events = self.active_view_mut().previous();
        self.focused_date = self.active_view().focused_date();
        let mut events = self.apply(view_events);
        events.extend(self.sync());
        events
    }

    pub fn next(&mut self) -> Vec<PickerEvent> {
        let view_events = self.active_view_mut().next();
        self.focused_date = self.active_view().focused_date();
        let mut events = self.apply(view_events);
        events.extend(self.sync());
        events
    }

    pub fn go_to_today(&mut self) -> Vec<PickerEvent> {
        if self.view != ViewKind::Day {
            return Vec::new();
        }
        let view_events = self.day.go_to_today();
        self.focused_date = self.day.focused_date();
        let mut events = self.apply(view_events);
        events.extend(self.sync());
        events
    }

    pub fn switch_view(&mut self, view: ViewKind) -> Vec<PickerEvent> {
        if view == self.view || (view == ViewKind::Day && self.config.only_month_selection) {
            return Vec::new();
        }
        debug!(from = ?self.view, to = ?view, "switching view");
        self.clear_hover();
        self.view = view;
        if view == ViewKind::Year {
            self.year.body_mut().focused_date = self.focused_date;
            self.year.recenter();
        }
        let mut events = vec![PickerEvent::ViewChanged(view)];
        events.extend(self.sync());
        events
    }

    fn apply(&mut self, view_events: Vec<CalendarEvent>) -> Vec<PickerEvent> {
        let mut events = Vec::new();
        for event in view_events {
            match event {
                CalendarEvent::FocusChanged(date) => events.push(PickerEvent::FocusChanged(date)),
                CalendarEvent::ActiveMonthChanged(date) => {
                    trace!(%date, "active period changed");
                }
                CalendarEvent::YearRangeChanged { from, to } => {
                    events.push(PickerEvent::YearRangeChanged { from, to })
                }
                CalendarEvent::Selected(date) => match self.view {
                    ViewKind::Day => events.extend(self.selection_change(date)),
                    ViewKind::Month => events.extend(self.active_month_change(Some(date))),
                    ViewKind::Year => events.extend(self.active_year_change(Some(date))),
                },
                CalendarEvent::Cancelled => match self.view {
                    ViewKind::Month if self.config.only_month_selection => {
                        events.push(PickerEvent::Dismissed)
                    }
                    ViewKind::Month => events.extend(self.active_month_change(None)),
                    ViewKind::Year => events.extend(self.active_year_change(None)),
                    ViewKind::Day => {}
                },
            }
        }
        events
    }

    /// Pushes the picker state into the active view and rebuilds its grid.
    fn sync(&mut self) -> Vec<PickerEvent> {
        let bounds = ViewBounds {
            min_date: self.config.min_date,
            max_date: self.config.max_date,
            min_month: self.min_month,
            max_month: self.max_month,
        };
        let (start, end) = if self.config.is_range() {
            (
                self.date_range.start.map(|s| s.date()),
                self.date_range.end.map(|e| e.date()),
            )
        } else {
            (self.date.map(|d| d.date()), None)
        };
        let preview = self.config.is_range() && self.range_type == Some(RangeType::End);
        let focused = self.focused_date;
        if self.time_input.value() != self.time {
            self.time_input.write_value(self.time);
        }
        let view = self.active_view_mut();
        *view.bounds_mut() = bounds;
        let body = view.body_mut();
        body.focused_date = focused;
        body.start = start;
        body.end = end;
        body.preview_range = preview;
        view.rebuild()
            .into_iter()
            .filter_map(|event| match event {
                CalendarEvent::YearRangeChanged { from, to } => {
                    Some(PickerEvent::YearRangeChanged { from, to })
                }
                _ => None,
            })
            .collect()
    }

    // ── Selection ────────────────────────────────────────────────────────────

    /// Commits a day. In range mode this follows the start/end protocol:
    /// a pick before the current start restarts the range there.
    pub fn selection_change(&mut self, selection: NaiveDate) -> Vec<PickerEvent> {
        let new_date = selection.and_time(self.time.unwrap_or(NaiveTime::MIN));
        if !self.config.is_range() {
            self.focused_date = selection;
            return self.set_date(new_date);
        }

        let starting = self.range_type != Some(RangeType::End);
        let mut range = if starting {
            DateRange::new(Some(new_date), None)
        } else {
            DateRange::new(self.date_range.start, Some(new_date))
        };
        let mut new_range_type = if starting { RangeType::Start } else { RangeType::End };

        if let (Some(start), Some(end)) = (range.start, range.end)
            && end < start
        {
            range = DateRange::new(Some(end), None);
            new_range_type = RangeType::Start;
        }
        if new_range_type == RangeType::Start {
            range.end = None;
        }

        if !self.set_date_range(range) {
            return Vec::new();
        }
        let next = match new_range_type {
            RangeType::Start => RangeType::End,
            RangeType::End => RangeType::Start,
        };
        self.range_type = Some(next);
        vec![PickerEvent::RangeChanged(range), PickerEvent::RangeTypeChanged(next)]
    }

    /// Result of the month view. Keeps the focused day of month; commits the
    /// month itself when only months are selectable. `None` is a cancel.
    pub fn active_month_change(&mut self, selection: Option<NaiveDate>) -> Vec<PickerEvent> {
        let mut events = Vec::new();
        if let Some(selection) = selection {
            self.focused_date = change_day(selection, self.focused_date.day());
            if self.config.only_month_selection {
                let first = change_day(selection, 1);
                if self.config.is_range() {
                    events.extend(self.selection_change(first));
                } else {
                    events.extend(self.set_date(first.and_time(NaiveTime::MIN)));
                }
            }
        }
        events.extend(self.switch_view(self.month_view_switch_to));
        events
    }

    /// Result of the year view. Keeps the focused month and day of month.
    /// `None` is a cancel.
    pub fn active_year_change(&mut self, selection: Option<NaiveDate>) -> Vec<PickerEvent> {
        if let Some(selection) = selection {
            let month = self.focused_date.month();
            if let Some(first) = NaiveDate::from_ymd_opt(selection.year(), month, 1) {
                self.focused_date = change_day(first, self.focused_date.day());
            }
        }
        self.switch_view(self.year_view_switch_to)
    }

    /// Validates and commits a single date. Limits are checked by calendar
    /// day, ignoring the time.
    fn set_date(&mut self, new_date: NaiveDateTime) -> Vec<PickerEvent> {
        let day = new_date.date();
        let valid_min = self.config.min_date.is_none_or(|min| day >= min);
        let valid_max = self.config.max_date.is_none_or(|max| day <= max);
        let mut events = Vec::new();
        if valid_min && valid_max {
            if self.date != Some(new_date) {
                self.date = Some(new_date);
                self.time = Some(new_date.time());
                self.focused_date = day;
                events.push(PickerEvent::DateChanged(new_date));
            }
        } else {
            debug!(%new_date, "date outside limits, keeping previous value");
        }
        self.validate_time(new_date);
        events
    }

    /// Commits a range if every present endpoint lies within the limits.
    fn set_date_range(&mut self, range: DateRange) -> bool {
        let (min, max) = (self.config.min_date, self.config.max_date);
        let valid = [range.start, range.end]
            .into_iter()
            .flatten()
            .all(|value| is_same_or_between(value.date(), min, max));
        if !valid {
            debug!(?range, "range outside limits, keeping previous value");
            return false;
        }
        self.date_range = range;
        true
    }

    // ── Time ─────────────────────────────────────────────────────────────────

    /// Combines the date part of the relevant value with `new_time`. With
    /// time disabled the value collapses to midnight.
    pub fn time_selected(&mut self, new_time: NaiveTime) -> Vec<PickerEvent> {
        if self.time == Some(new_time) {
            if let Some(value) = self.relevant_date() {
                self.validate_time(value);
            }
            return Vec::new();
        }
        self.previous_time = self.time;
        self.time = Some(new_time);

        let old = self.relevant_date().unwrap_or(self.now);
        let new_date = if self.disabled_time {
            let midnight = date_without_time(old);
            self.time = Some(midnight.time());
            midnight
        } else {
            old.date().and_time(new_time)
        };

        let events = if !self.config.is_range() {
            self.set_date(new_date)
        } else {
            let range = match self.time_target() {
                RangeType::Start => DateRange::new(Some(new_date), self.date_range.end),
                RangeType::End => DateRange::new(self.date_range.start, Some(new_date)),
            };
            if self.set_date_range(range) {
                vec![PickerEvent::RangeChanged(range)]
            } else {
                Vec::new()
            }
        };
        self.sync();
        events
    }

    /// Switches the time of day off (value at midnight) or back on
    /// (restoring the time used before). Mandatory time cannot be switched off.
    pub fn toggle_disabled_time(&mut self) -> Vec<PickerEvent> {
        if self.config.mandatory_time {
            return Vec::new();
        }
        self.disabled_time = !self.disabled_time;
        self.config.disabled_time = self.disabled_time;
        let mut events = vec![PickerEvent::DisabledTimeChanged(self.disabled_time)];
        if !self.config.is_range() {
            let time = if self.disabled_time {
                let date = self.date.unwrap_or(self.now).date();
                utc_midnight_as_local(date)
            } else {
                self.previous_time.unwrap_or(self.now.time())
            };
            events.extend(self.time_selected(time));
        }
        events
    }

    /// Steps one part of the time editor and applies the result.
    pub fn step_time(&mut self, part: TimePart, up: bool) -> Vec<PickerEvent> {
        if !self.shows_time() || self.disabled_time {
            return Vec::new();
        }
        match self.time_input.step(part, up) {
            Some(time) => self.time_selected(time),
            None => Vec::new(),
        }
    }

    /// Applies typed text to one part of the time editor. Text that does not
    /// form a valid time flags the part and keeps the committed value.
    pub fn type_time_part(&mut self, part: TimePart, text: &str) -> Vec<PickerEvent> {
        if !self.shows_time() || self.disabled_time {
            return Vec::new();
        }
        match self.time_input.set_part(part, text) {
            Some(time) => self.time_selected(time),
            None => {
                trace!(?part, text, "incomplete time");
                Vec::new()
            }
        }
    }

    pub fn toggle_meridian(&mut self) -> Vec<PickerEvent> {
        if !self.shows_time() || self.disabled_time || !self.time_input.use_12h {
            return Vec::new();
        }
        match self.time_input.toggle_meridian() {
            Some(time) => self.time_selected(time),
            None => Vec::new(),
        }
    }

    /// Flags the time editor when the full date-time lies outside the limits.
    /// The maximum date counts up to the end of its day.
    fn validate_time(&mut self, value: NaiveDateTime) {
        if !(self.config.enable_time_validation && self.shows_time()) {
            return;
        }
        let below = self
            .config
            .min_date
            .is_some_and(|min| value < min.and_time(NaiveTime::MIN));
        let above = self.config.max_date.is_some_and(|max| {
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
                .is_some_and(|end_of_day| value > max.and_time(end_of_day))
        });
        self.time_invalid = !self.disabled_time && (below || above);
        self.time_input.set_all_invalid(self.time_invalid);
    }
}

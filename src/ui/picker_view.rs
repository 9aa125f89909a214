use crate::calendar::{CellState, NavKey};
use crate::data::config::DatepickerConfig;
use crate::data::model::ViewKind;
use crate::data::selection::SavedSelection;
use crate::picker::range::initial_range_type;
use crate::picker::{DateInput, DateRangePicker, Datepicker, PickerEvent, RangeInput, TimePart};
use anyhow::Result;
use chrono::NaiveDateTime;
use crossterm::event::{
    self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::Stdout;
use std::time::Duration as StdDuration;
use tracing::{debug, trace};

// Range endpoints and the single selected value
const SELECTED_BG: Color = Color::Yellow;

// Hover preview of an open range
const PREVIEW_FG: Color = Color::Cyan;

const HEADER_BG: Color = Color::Rgb(40, 44, 52);

/// The calendar layout chosen from the configuration.
pub enum PickerKind {
    Single(Datepicker),
    Range(Datepicker),
    TwoMonth(DateRangePicker),
}

impl PickerKind {
    fn handle_key(&mut self, key: NavKey) -> Vec<PickerEvent> {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => p.handle_key(key),
            PickerKind::TwoMonth(p) => p.handle_key(key),
        }
    }

    fn previous(&mut self) -> Vec<PickerEvent> {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => p.previous(),
            PickerKind::TwoMonth(p) => p.previous(),
        }
    }

    fn next(&mut self) -> Vec<PickerEvent> {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => p.next(),
            PickerKind::TwoMonth(p) => p.next(),
        }
    }

    fn go_to_today(&mut self) -> Vec<PickerEvent> {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => p.go_to_today(),
            PickerKind::TwoMonth(p) => p.go_to_today(),
        }
    }

    fn switch_view(&mut self, view: ViewKind) -> Vec<PickerEvent> {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => p.switch_view(view),
            PickerKind::TwoMonth(p) => p.switch_view(view),
        }
    }

    fn step_time(&mut self, part: TimePart, up: bool) -> Vec<PickerEvent> {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => p.step_time(part, up),
            PickerKind::TwoMonth(p) => p.step_time(part, up),
        }
    }

    fn toggle_meridian(&mut self) -> Vec<PickerEvent> {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => p.toggle_meridian(),
            PickerKind::TwoMonth(p) => p.toggle_meridian(),
        }
    }

    fn toggle_disabled_time(&mut self) -> Vec<PickerEvent> {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => p.toggle_disabled_time(),
            PickerKind::TwoMonth(p) => p.toggle_disabled_time(),
        }
    }

    fn type_time_part(&mut self, part: TimePart, text: &str) -> Vec<PickerEvent> {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => p.type_time_part(part, text),
            PickerKind::TwoMonth(p) => p.type_time_part(part, text),
        }
    }

    fn hover_at(&mut self, index: usize, row: usize, col: usize) {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => p.hover_at(row, col),
            PickerKind::TwoMonth(p) => p.hover_at(index, row, col),
        }
    }

    fn clear_hover(&mut self) {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => p.clear_hover(),
            PickerKind::TwoMonth(p) => p.clear_hover(),
        }
    }

    fn click_at(&mut self, index: usize, row: usize, col: usize) -> Vec<PickerEvent> {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => p.click_at(row, col),
            PickerKind::TwoMonth(p) => p.click_at(index, row, col),
        }
    }

    /// The calendars to draw, each with whether it has keyboard focus.
    fn calendars(&self) -> Vec<(&Datepicker, bool)> {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => vec![(p, true)],
            PickerKind::TwoMonth(p) => vec![
                (p.first(), p.active_index() == 0),
                (p.second(), p.active_index() == 1),
            ],
        }
    }

    fn active(&self) -> &Datepicker {
        match self {
            PickerKind::Single(p) | PickerKind::Range(p) => p,
            PickerKind::TwoMonth(p) => p.active(),
        }
    }
}

pub struct App {
    picker: PickerKind,
    date_input: DateInput,
    range_input: RangeInput,
    /// Set by Ctrl+C: quit without committing.
    aborted: bool,
    /// Time part that typed digits go to.
    time_part: TimePart,
    time_buffer: String,
    /// Where each calendar was last drawn, for mapping mouse positions.
    calendar_areas: Vec<Rect>,
}

impl App {
    pub fn new(config: DatepickerConfig, now: NaiveDateTime, initial: &SavedSelection) -> Self {
        let mut config = config;
        config.disabled_time = (config.disabled_time || initial.disabled_time) && !config.mandatory_time;
        let range = initial.range.unwrap_or_default();

        let mut date_input = DateInput::new(config.clone());
        let mut range_input = RangeInput::new(config.clone());
        let picker = if config.enable_two_month_date_range {
            let mut p = DateRangePicker::new(config, now);
            p.set_range(range);
            p.init();
            range_input.write_value(range);
            PickerKind::TwoMonth(p)
        } else if config.enable_date_range {
            let mut p = Datepicker::new(config, now);
            p.set_date_range_input(range);
            p.set_range_type(Some(initial_range_type(&range)));
            p.init();
            range_input.write_value(range);
            PickerKind::Range(p)
        } else {
            let mut p = Datepicker::new(config, now);
            p.set_date_input(initial.date);
            p.init();
            date_input.write_value(initial.date);
            PickerKind::Single(p)
        };
        App {
            picker,
            date_input,
            range_input,
            aborted: false,
            time_part: TimePart::Hours,
            time_buffer: String::new(),
            calendar_areas: Vec::new(),
        }
    }

    pub fn aborted(&self) -> bool {
        self.aborted
    }

    /// The committed value in its persisted form.
    pub fn selection(&self) -> SavedSelection {
        match &self.picker {
            PickerKind::Single(p) => SavedSelection::single(p.date(), p.disabled_time()),
            PickerKind::Range(p) => SavedSelection::range(p.date_range(), p.disabled_time()),
            PickerKind::TwoMonth(p) => SavedSelection::range(p.range(), p.first().disabled_time()),
        }
    }

    /// The committed value as shown in the input field.
    pub fn display_value(&self) -> String {
        match &self.picker {
            PickerKind::Single(_) => self.date_input.display_value().to_string(),
            _ => format!(
                "{} - {}",
                self.range_input.start.display_value(),
                self.range_input.end.display_value()
            ),
        }
    }

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        trace!(?code, "key");
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.aborted = true;
            return true;
        }
        if !matches!(code, KeyCode::Char(c) if c.is_ascii_digit()) {
            self.time_buffer.clear();
        }
        let events = match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char(':') => {
                self.time_part = self.picker.active().time_input().next_part(self.time_part);
                return false;
            }
            KeyCode::Char(digit) if digit.is_ascii_digit() => {
                self.time_buffer.push(digit);
                let keep = if self.time_part == TimePart::Milliseconds { 3 } else { 2 };
                if self.time_buffer.len() > keep {
                    self.time_buffer.remove(0);
                }
                let text = self.time_buffer.clone();
                self.picker.type_time_part(self.time_part, &text)
            }
            KeyCode::Tab => {
                if let PickerKind::TwoMonth(p) = &mut self.picker {
                    p.switch_calendar();
                }
                return false;
            }
            KeyCode::Char('m') => self.picker.switch_view(ViewKind::Month),
            KeyCode::Char('y') => self.picker.switch_view(ViewKind::Year),
            KeyCode::Char('n') => self.picker.next(),
            KeyCode::Char('p') => self.picker.previous(),
            KeyCode::Char('t') => self.picker.go_to_today(),
            KeyCode::Char('+') => self.picker.step_time(TimePart::Hours, true),
            KeyCode::Char('-') => self.picker.step_time(TimePart::Hours, false),
            KeyCode::Char('>') => self.picker.step_time(TimePart::Minutes, true),
            KeyCode::Char('<') => self.picker.step_time(TimePart::Minutes, false),
            KeyCode::Char('a') => self.picker.toggle_meridian(),
            KeyCode::Char('x') => self.picker.toggle_disabled_time(),
            other => match nav_key(other) {
                Some(key) => self.picker.handle_key(key),
                None => return false,
            },
        };
        self.apply(events)
    }

    /// Mouse moves hover the cell under the pointer, a left click selects it.
    /// Returns true when the app should quit.
    pub fn handle_mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) -> bool {
        let target = self.cell_under(column, row);
        let events = match (kind, target) {
            (MouseEventKind::Moved, Some((index, r, c))) => {
                self.picker.hover_at(index, r, c);
                return false;
            }
            (MouseEventKind::Moved, None) => {
                self.picker.clear_hover();
                return false;
            }
            (MouseEventKind::Down(MouseButton::Left), Some((index, r, c))) => {
                self.picker.click_at(index, r, c)
            }
            _ => return false,
        };
        self.apply(events)
    }

    fn cell_under(&self, column: u16, row: u16) -> Option<(usize, usize, usize)> {
        self.picker
            .calendars()
            .into_iter()
            .zip(&self.calendar_areas)
            .enumerate()
            .find_map(|(index, ((picker, _), area))| {
                cell_at(picker, *area, column, row).map(|(r, c)| (index, r, c))
            })
    }

    /// What a range picker is waiting for, shown next to the value.
    fn range_hint(&self) -> Option<&'static str> {
        let range = self.selection().range?;
        if range.is_empty() {
            Some("select start")
        } else if !range.is_complete() {
            Some("select end")
        } else {
            None
        }
    }

    /// Mirrors picker events into the input fields. Returns true on dismiss.
    fn apply(&mut self, events: Vec<PickerEvent>) -> bool {
        let mut quit = false;
        for event in events {
            match event {
                PickerEvent::DateChanged(value) => self.date_input.write_value(Some(value)),
                PickerEvent::RangeChanged(range) => self.range_input.write_value(range),
                PickerEvent::DisabledTimeChanged(disabled) => {
                    self.date_input.set_disabled_time(disabled);
                    self.range_input.set_disabled_time(disabled);
                }
                PickerEvent::Dismissed => quit = true,
                other => debug!(?other, "picker event"),
            }
        }
        quit
    }

    pub fn render(&mut self, f: &mut Frame) {
        let size = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(10), // header + weekday row + 6 grid rows + borders
                Constraint::Length(1),  // time
                Constraint::Length(1),  // value
                Constraint::Min(4),     // help
            ])
            .split(size);

        let calendars = self.picker.calendars();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Length(36); calendars.len()])
            .split(chunks[0]);
        for (i, (picker, active)) in calendars.into_iter().enumerate() {
            render_calendar(f, columns[i], picker, active);
        }
        self.calendar_areas = columns.to_vec();

        f.render_widget(Paragraph::new(self.time_line()), chunks[1]);
        let mut value = vec![
            Span::styled("Value: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(self.display_value()),
        ];
        if let Some(hint) = self.range_hint() {
            value.push(Span::styled(format!("  ({hint})"), Style::default().fg(PREVIEW_FG)));
        }
        f.render_widget(Paragraph::new(Line::from(value)), chunks[2]);
        let mandatory_time = self.picker.active().config().mandatory_time;
        let help = Paragraph::new(help_lines(mandatory_time).into_iter().map(Line::from).collect::<Vec<_>>())
            .block(Block::default().borders(Borders::TOP).title("Keys"));
        f.render_widget(help, chunks[3]);
    }

    fn time_line(&self) -> Line<'static> {
        let picker = self.picker.active();
        if !picker.shows_time() {
            return Line::from("");
        }
        let input = picker.time_input();
        let mut spans = vec![Span::styled("Time:  ", Style::default().add_modifier(Modifier::BOLD))];
        if picker.disabled_time() {
            spans.push(Span::styled(input.display(), Style::default().add_modifier(Modifier::DIM)));
            spans.push(Span::styled(" (ignored)", Style::default().add_modifier(Modifier::DIM)));
            return Line::from(spans);
        }
        for part in input.visible_parts() {
            match part {
                TimePart::Hours => {}
                TimePart::Milliseconds => spans.push(Span::raw(".")),
                _ => spans.push(Span::raw(":")),
            }
            let mut style = Style::default();
            if input.is_part_invalid(part) {
                style = style.fg(Color::Red);
            }
            if part == self.time_part {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            let text = match input.part_text(part) {
                "" => "--".to_string(),
                text => text.to_string(),
            };
            spans.push(Span::styled(text, style));
        }
        if let Some(label) = input.meridian_label() {
            spans.push(Span::raw(format!(" {label}")));
        }
        if picker.time_invalid() {
            spans.push(Span::styled(" (out of range)", Style::default().fg(Color::Red)));
        }
        Line::from(spans)
    }
}

/// Key help. The ignore-time switch is hidden when time is mandatory.
fn help_lines(mandatory_time: bool) -> Vec<String> {
    let ignore = if mandatory_time { "" } else { "x ignore time  " };
    vec![
        "arrows move  Home/End week  PgUp/PgDn period  Enter select  Esc back".to_string(),
        "m month view  y year view  n/p next/previous  t today  Tab other calendar".to_string(),
        format!("+/- hour  >/< minute  : next part  0-9 type  a AM/PM  {ignore}q done  Ctrl+C abort"),
    ]
}

fn render_calendar(f: &mut Frame, area: Rect, picker: &Datepicker, active: bool) {
    let border = if active {
        Style::default().fg(Color::White)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    let widget = Paragraph::new(calendar_lines(picker))
        .block(Block::default().borders(Borders::ALL).border_style(border));
    f.render_widget(widget, area);
}

// ── Calendar helpers ──────────────────────────────────────────────────────────

/// Grid position under the terminal cell `column`, `row`, given the area a
/// calendar was drawn into. Mirrors the layout of `calendar_lines`.
pub(crate) fn cell_at(picker: &Datepicker, area: Rect, column: u16, row: u16) -> Option<(usize, usize)> {
    if column <= area.x || row <= area.y || column + 1 >= area.right() || row + 1 >= area.bottom() {
        return None;
    }
    let x = usize::from(column - area.x - 1);
    let y = usize::from(row - area.y - 1);
    let first_row = if picker.view() == ViewKind::Day { 2 } else { 1 };
    let r = y.checked_sub(first_row)?;
    let label_width = if picker.week_labels().is_some() { 5 } else { 0 };
    let c = x.checked_sub(label_width)? / (cell_width(picker.view()) + 1);
    let cells = picker.rows().get(r)?;
    (c < cells.len()).then_some((r, c))
}

pub(crate) fn nav_key(code: KeyCode) -> Option<NavKey> {
    match code {
        KeyCode::Left => Some(NavKey::Left),
        KeyCode::Right => Some(NavKey::Right),
        KeyCode::Up => Some(NavKey::Up),
        KeyCode::Down => Some(NavKey::Down),
        KeyCode::Home => Some(NavKey::Home),
        KeyCode::End => Some(NavKey::End),
        KeyCode::PageUp => Some(NavKey::PageUp),
        KeyCode::PageDown => Some(NavKey::PageDown),
        KeyCode::Enter | KeyCode::Char(' ') => Some(NavKey::Select),
        KeyCode::Esc => Some(NavKey::Escape),
        _ => None,
    }
}

/// Text lines for one calendar: the header with previous/next markers, the
/// weekday row in day view, then the grid with optional week numbers.
pub(crate) fn calendar_lines(picker: &Datepicker) -> Vec<Line<'static>> {
    let arrow = |label: &'static str, disabled: bool| {
        let style = if disabled {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default()
        };
        Span::styled(label, style)
    };
    let mut lines = vec![Line::from(vec![
        arrow("< ", picker.is_previous_disabled()),
        Span::styled(
            format!("{:^28}", picker.header_label()),
            Style::default().bg(HEADER_BG).add_modifier(Modifier::BOLD),
        ),
        arrow(" >", picker.is_next_disabled()),
    ])];

    let labels = picker.week_labels();
    let width = cell_width(picker.view());
    if picker.view() == ViewKind::Day {
        let mut header = String::from(if labels.is_some() { "     " } else { "" });
        for name in picker.weekday_headers() {
            let short: String = name.chars().take(2).collect();
            header.push_str(&format!("{short:>width$} "));
        }
        lines.push(Line::from(Span::styled(header, Style::default().add_modifier(Modifier::DIM))));
    }

    for (r, row) in picker.rows().iter().enumerate() {
        let mut spans = Vec::new();
        if let Some(label) = labels.and_then(|l| l.get(r)) {
            spans.push(Span::styled(
                format!("{label:>2} | "),
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        for cell in row {
            let text = if picker.view() == ViewKind::Day {
                format!("{:>width$}", cell.display_value)
            } else {
                format!("{:<width$}", cell.display_value)
            };
            spans.push(Span::styled(text, cell_style(picker.cell_state(cell))));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn cell_width(view: ViewKind) -> usize {
    match view {
        ViewKind::Day => 3,
        ViewKind::Month => 14,
        ViewKind::Year => 8,
    }
}

/// Determines the ratatui `Style` for a grid cell from its render flags.
pub(crate) fn cell_style(state: CellState) -> Style {
    let mut style = if state.disabled || state.adjacent {
        Style::default().add_modifier(Modifier::DIM)
    } else if state.selected || state.range_start || state.range_end {
        Style::default()
            .fg(Color::Black)
            .bg(SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    } else if state.in_range {
        Style::default().fg(SELECTED_BG)
    } else if state.preview {
        Style::default().fg(PREVIEW_FG).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default()
    };
    if state.today {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if state.active {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            let quit = match event::read()? {
                CEvent::Key(key) => key.kind == KeyEventKind::Press && app.handle_key(key.code, key.modifiers),
                CEvent::Mouse(mouse) => app.handle_mouse(mouse.kind, mouse.column, mouse.row),
                _ => false,
            };
            if quit {
                break;
            }
        }
    }
    Ok(())
}

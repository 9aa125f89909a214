use crate::calc::selection::SelectionStrategy;
use crate::calendar::cell::{find_cell, position_of, Cell, Grid};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::trace;

/// Render flags for a single cell, derived from the body's selection state.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellState {
    pub active: bool,
    pub selected: bool,
    pub in_range: bool,
    pub range_start: bool,
    pub range_end: bool,
    pub preview: bool,
    pub preview_end: bool,
    pub disabled: bool,
    pub adjacent: bool,
    pub today: bool,
}

/// The interactive grid shared by the day, month and year views.
///
/// Owns the logical focus and the transient hover cell; everything else is
/// pushed in by the owning view before each render.
#[derive(Clone, Debug)]
pub struct CalendarBody {
    pub focused_date: NaiveDate,
    pub rows: Grid,
    pub row_labels: Option<Vec<String>>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub selection: SelectionStrategy,
    /// Show the hover preview while the range end is still open.
    pub preview_range: bool,
    pub active_hover: Option<Cell>,
}

impl CalendarBody {
    pub fn new(focused_date: NaiveDate, selection: SelectionStrategy) -> Self {
        CalendarBody {
            focused_date,
            rows: Vec::new(),
            row_labels: None,
            start: None,
            end: None,
            selection,
            preview_range: true,
            active_hover: None,
        }
    }

    pub fn cell_at_focus(&self) -> Option<&Cell> {
        find_cell(&self.rows, self.focused_date, self.selection.adapter())
    }

    /// Grid position of the focused cell, the entry point for moving terminal
    /// or screen-reader focus onto the grid.
    pub fn focus_active_cell(&self) -> Option<(usize, usize)> {
        position_of(&self.rows, self.focused_date, self.selection.adapter())
    }

    pub fn is_active(&self, cell: &Cell) -> bool {
        self.selection
            .adapter()
            .is_equal(self.focused_date, Some(cell.value_raw))
    }

    /// Commits the focused cell. Disabled and adjacent-month cells are ignored.
    pub fn select_focused(&self) -> Option<NaiveDate> {
        let cell = self.cell_at_focus()?;
        if cell.is_preview {
            return None;
        }
        self.select_cell(cell)
    }

    pub fn select_cell(&self, cell: &Cell) -> Option<NaiveDate> {
        if cell.disabled {
            trace!(date = %cell.value_raw, "ignoring selection of disabled cell");
            return None;
        }
        Some(cell.value_raw)
    }

    /// Pointer hover. Only enabled cells of the active period are tracked and
    /// the focus is left untouched.
    pub fn hover(&mut self, cell: &Cell) {
        if !cell.disabled && !cell.is_preview {
            self.active_hover = Some(cell.clone());
        }
    }

    pub fn clear_hover(&mut self) {
        self.active_hover = None;
    }

    /// Moves the focus onto `cell` and keeps the hover in sync so that the
    /// range preview also follows keyboard navigation.
    pub fn activate_cell(&mut self, cell: &Cell) -> bool {
        if cell.disabled || cell.is_preview {
            return false;
        }
        self.active_hover = Some(cell.clone());
        self.focused_date = cell.value_raw;
        true
    }

    /// Refreshes the hover from the focused cell after a keyboard move.
    pub fn track_focus(&mut self) {
        if let Some(cell) = self.cell_at_focus().cloned() {
            if !cell.disabled && !cell.is_preview {
                self.active_hover = Some(cell);
            }
        }
    }

    pub fn cell_state(&self, cell: &Cell) -> CellState {
        let s = self.selection;
        let hover = self.active_hover.as_ref();
        let previewing = self.preview_range && self.end.is_none();
        CellState {
            active: self.is_active(cell),
            selected: s.is_selected(cell, self.start, self.end),
            in_range: s.in_range(cell, self.start, self.end),
            range_start: s.is_range_selected(cell, self.start),
            range_end: s.is_range_selected(cell, self.end),
            preview: previewing && s.preview_range_hover(cell, hover, self.start),
            preview_end: previewing && s.preview_range_hover_end(cell, hover, self.start),
            disabled: cell.disabled,
            adjacent: cell.is_preview,
            today: cell.is_today,
        }
    }
}

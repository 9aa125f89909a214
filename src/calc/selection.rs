use crate::calc::compare::CompareAdapter;
use crate::calendar::cell::Cell;
use chrono::NaiveDate;

/// Answers selection questions for a cell, for either a single value or a
/// start/end range, at the granularity of the wrapped adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionStrategy {
    Single(CompareAdapter),
    Range(CompareAdapter),
}

impl SelectionStrategy {
    pub fn new(range: bool, adapter: CompareAdapter) -> Self {
        if range {
            SelectionStrategy::Range(adapter)
        } else {
            SelectionStrategy::Single(adapter)
        }
    }

    pub fn adapter(self) -> CompareAdapter {
        match self {
            SelectionStrategy::Single(a) | SelectionStrategy::Range(a) => a,
        }
    }

    pub fn is_selected(self, cell: &Cell, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
        match self {
            SelectionStrategy::Single(a) => a.is_equal(cell.value_raw, start),
            SelectionStrategy::Range(a) => {
                a.is_equal(cell.value_raw, start) || a.is_equal(cell.value_raw, end)
            }
        }
    }

    /// `start < cell < end`; requires both ends.
    pub fn in_range(self, cell: &Cell, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
        match self {
            SelectionStrategy::Single(_) => false,
            SelectionStrategy::Range(a) => {
                start.is_some() && end.is_some() && a.is_between(cell.value_raw, start, end)
            }
        }
    }

    pub fn is_range_selected(self, cell: &Cell, date: Option<NaiveDate>) -> bool {
        match self {
            SelectionStrategy::Single(_) => false,
            SelectionStrategy::Range(a) => a.is_equal(cell.value_raw, date),
        }
    }

    /// `start < cell <= hover` for enabled cells while the end is not committed.
    pub fn preview_range_hover(self, cell: &Cell, hover: Option<&Cell>, start: Option<NaiveDate>) -> bool {
        match (self, hover, start) {
            (SelectionStrategy::Range(a), Some(hover), Some(start)) if !cell.disabled => {
                a.is_after(cell.value_raw, start) && a.is_equal_or_before(cell.value_raw, hover.value_raw)
            }
            _ => false,
        }
    }

    pub fn preview_range_hover_end(self, cell: &Cell, hover: Option<&Cell>, start: Option<NaiveDate>) -> bool {
        match (self, hover, start) {
            (SelectionStrategy::Range(a), Some(hover), Some(start)) if !cell.disabled => {
                a.is_after(cell.value_raw, start) && a.is_equal(cell.value_raw, Some(hover.value_raw))
            }
            _ => false,
        }
    }
}

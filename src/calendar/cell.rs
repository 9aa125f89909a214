use crate::calc::compare::CompareAdapter;
use chrono::NaiveDate;
use serde::Serialize;

/// One selectable entry of a calendar grid.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Cell {
    pub value: u32,
    pub disabled: bool,
    pub aria_label: String,
    pub display_value: String,
    /// Day view only: the day belongs to the previous or next month.
    pub is_preview: bool,
    pub is_today: bool,
    pub value_raw: NaiveDate,
    pub classes: Vec<&'static str>,
}

/// Rows of cells; every row has the same length.
pub type Grid = Vec<Vec<Cell>>;

/// Splits a flat cell list into rows of `columns` cells.
pub fn into_rows(cells: Vec<Cell>, columns: usize) -> Grid {
    let mut rows: Grid = Vec::with_capacity(cells.len().div_ceil(columns.max(1)));
    let mut row = Vec::with_capacity(columns);
    for cell in cells {
        row.push(cell);
        if row.len() == columns {
            rows.push(std::mem::take(&mut row));
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

/// Grid position (row, column) of the first cell matching `date` at the
/// adapter's granularity.
pub fn position_of(grid: &Grid, date: NaiveDate, adapter: CompareAdapter) -> Option<(usize, usize)> {
    grid.iter().enumerate().find_map(|(r, row)| {
        row.iter()
            .position(|cell| adapter.is_equal(cell.value_raw, Some(date)))
            .map(|c| (r, c))
    })
}

pub fn find_cell(grid: &Grid, date: NaiveDate, adapter: CompareAdapter) -> Option<&Cell> {
    position_of(grid, date, adapter).map(|(r, c)| &grid[r][c])
}

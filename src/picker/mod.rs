pub mod date_input;
pub mod datepicker;
pub mod range;
pub mod time_input;

pub use date_input::{datepicker_format, DateInput, RangeInput};
pub use datepicker::Datepicker;
pub use range::DateRangePicker;
pub use time_input::{TimeInput, TimePart};

use crate::data::model::{DateRange, RangeType, ViewKind};
use chrono::{NaiveDate, NaiveDateTime};

/// Notifications from a picker to its host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerEvent {
    FocusChanged(NaiveDate),
    /// Single-date mode committed a new value.
    DateChanged(NaiveDateTime),
    RangeChanged(DateRange),
    RangeTypeChanged(RangeType),
    ViewChanged(ViewKind),
    YearRangeChanged { from: i32, to: i32 },
    DisabledTimeChanged(bool),
    /// Escape on the top-level view; the host decides whether to close.
    Dismissed,
}

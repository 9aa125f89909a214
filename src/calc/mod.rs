pub mod compare;
pub mod date_math;
pub mod parse;
pub mod selection;

pub use compare::CompareAdapter;
pub use parse::{format_date, named_format, parse_date, DateParseError};
pub use selection::SelectionStrategy;

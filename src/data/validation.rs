use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

/// Structured validation result of the date inputs.
///
/// Serializes to the `{ "<key>": { ... } }` shape consumed by form layers,
/// e.g. `{"minDate":{"min":"2022-01-01T00:00:00","actual":"..."}}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Error)]
#[serde(rename_all = "camelCase")]
pub enum ValidationError {
    #[error("expected format {format}")]
    DateFormat { format: String },
    #[error("{actual} is before the earliest date {min}")]
    MinDate {
        min: NaiveDateTime,
        actual: NaiveDateTime,
    },
    #[error("{actual} is after the latest date {max}")]
    MaxDate {
        max: NaiveDateTime,
        actual: NaiveDateTime,
    },
    #[error("end {end} is before start {start}")]
    EndBeforeStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    #[error("start date: expected format {format}")]
    InvalidStartDateFormat { format: String },
    #[error("end date: expected format {format}")]
    InvalidEndDateFormat { format: String },
    #[error("range starts before {min}")]
    RangeBeforeMinDate {
        min: NaiveDateTime,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    },
    #[error("range ends after {max}")]
    RangeAfterMaxDate {
        max: NaiveDateTime,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    },
}

impl ValidationError {
    /// The key the error is reported under.
    pub fn key(&self) -> &'static str {
        match self {
            ValidationError::DateFormat { .. } => "dateFormat",
            ValidationError::MinDate { .. } => "minDate",
            ValidationError::MaxDate { .. } => "maxDate",
            ValidationError::EndBeforeStart { .. } => "endBeforeStart",
            ValidationError::InvalidStartDateFormat { .. } => "invalidStartDateFormat",
            ValidationError::InvalidEndDateFormat { .. } => "invalidEndDateFormat",
            ValidationError::RangeBeforeMinDate { .. } => "rangeBeforeMinDate",
            ValidationError::RangeAfterMaxDate { .. } => "rangeAfterMaxDate",
        }
    }
}

/// Collapses a list of errors into one JSON object keyed by error name, the
/// form the `parse` command prints.
pub fn errors_to_json(errors: &[ValidationError]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for error in errors {
        if let Ok(serde_json::Value::Object(entry)) = serde_json::to_value(error) {
            map.extend(entry);
        }
    }
    serde_json::Value::Object(map)
}

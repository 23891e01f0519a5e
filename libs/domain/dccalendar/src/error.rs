use chrono::{NaiveDate, Weekday};
use dcchrono::IntervalError;

// -----------------------------------------------------------------------------
// ErrorKind
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ErrorKind {
    InvalidConstruction,
    OutOfRange,
    InvalidArgument,
}

// -----------------------------------------------------------------------------
// CalendarError
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq, Hash)]
pub enum CalendarError {
    #[error("A week must start on Sunday but {date} is {weekday:?}")]
    NotSunday { date: NaiveDate, weekday: Weekday },
    #[error("The date {date} is out of the week [{first}, {last}]")]
    DateOutsideWeek {
        date: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },
    #[error("The index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("The date {date} is out of the covered range [{min}, {max}]")]
    OutOfRange {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },
    #[error("No entry is found for {date}")]
    NotFound { date: NaiveDate },
    #[error("The search depth must be 1 or greater: {depth}")]
    InvalidSearchDepth { depth: u32 },
    #[error("The month {year}-{month} can not be laid out")]
    InvalidMonth { year: i32, month: u32 },
    #[error(transparent)]
    Interval(#[from] IntervalError<NaiveDate>),
}

impl CalendarError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalendarError::InvalidMonth { .. } | CalendarError::Interval(_) => {
                ErrorKind::InvalidConstruction
            }
            CalendarError::IndexOutOfRange { .. }
            | CalendarError::OutOfRange { .. }
            | CalendarError::NotFound { .. } => ErrorKind::OutOfRange,
            CalendarError::NotSunday { .. }
            | CalendarError::DateOutsideWeek { .. }
            | CalendarError::InvalidSearchDepth { .. } => ErrorKind::InvalidArgument,
        }
    }
}

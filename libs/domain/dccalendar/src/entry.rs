use chrono::{Datelike, NaiveDate, Weekday};

// -----------------------------------------------------------------------------
// CalendarEntry
// -----------------------------------------------------------------------------
/// A day shown on a calendar grid.
///
/// Entries are immutable values.
/// Grids replace them with updated copies created by [`CalendarEntry::with_information`]
/// and [`CalendarEntry::with_mark`].
///
/// ```
/// use chrono::NaiveDate;
/// use dccalendar::{CalendarEntry, EntryMark};
///
/// let date = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
/// let entry = CalendarEntry::new(date)
///     .with_mark(&EntryMark::new().non_working_day(true))
///     .with_information("Children's Day");
///
/// assert!(entry.is_non_working_day());
/// assert!(!entry.is_scheduled_day());
/// assert_eq!(entry.information(), "Children's Day");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    schemars::JsonSchema,
)]
pub struct CalendarEntry {
    date: NaiveDate,
    #[serde(default)]
    information: String,
    #[serde(default)]
    is_outside_month: bool,
    #[serde(default)]
    is_non_working_day: bool,
    #[serde(default)]
    is_scheduled_day: bool,
}

//
// construction
//
impl CalendarEntry {
    /// A fresh entry without any text or flags.
    #[inline]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            information: String::new(),
            is_outside_month: false,
            is_non_working_day: false,
            is_scheduled_day: false,
        }
    }

    /// The placeholder held by grids which are not generated yet.
    #[inline]
    pub fn empty() -> Self {
        Self::new(NaiveDate::MIN)
    }

    #[inline]
    pub fn with_information(self, information: impl Into<String>) -> Self {
        Self {
            information: information.into(),
            ..self
        }
    }

    /// Copy of the entry with the fields set by the mark replaced.
    #[inline]
    pub fn with_mark(self, mark: &EntryMark) -> Self {
        Self {
            is_outside_month: mark.outside_month.unwrap_or(self.is_outside_month),
            is_non_working_day: mark.non_working_day.unwrap_or(self.is_non_working_day),
            is_scheduled_day: mark.scheduled_day.unwrap_or(self.is_scheduled_day),
            ..self
        }
    }

    /// Copy without marks and text, keeping the date and the outside-month flag.
    #[inline]
    pub(crate) fn cleared(self) -> Self {
        Self {
            information: String::new(),
            is_non_working_day: false,
            is_scheduled_day: false,
            ..self
        }
    }
}

impl Default for CalendarEntry {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

//
// accessors
//
impl CalendarEntry {
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[inline]
    pub fn information(&self) -> &str {
        &self.information
    }

    #[inline]
    pub fn is_outside_month(&self) -> bool {
        self.is_outside_month
    }

    /// Explicitly flagged as a holiday. Weekends are not flagged by themselves.
    #[inline]
    pub fn is_non_working_day(&self) -> bool {
        self.is_non_working_day
    }

    #[inline]
    pub fn is_scheduled_day(&self) -> bool {
        self.is_scheduled_day
    }

    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    #[inline]
    pub fn is_saturday(&self) -> bool {
        self.weekday() == Weekday::Sat
    }

    #[inline]
    pub fn is_sunday(&self) -> bool {
        self.weekday() == Weekday::Sun
    }

    /// Flagged as a holiday or falling on a weekend.
    #[inline]
    pub fn is_non_working(&self) -> bool {
        self.is_non_working_day || self.is_saturday() || self.is_sunday()
    }
}

// -----------------------------------------------------------------------------
// EntryMark
// -----------------------------------------------------------------------------
/// Selective update of the flags of an entry.
///
/// Each field is tri-state: [None] leaves the flag as it is,
/// `Some(true)` or `Some(false)` overwrites it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EntryMark {
    pub outside_month: Option<bool>,
    pub non_working_day: Option<bool>,
    pub scheduled_day: Option<bool>,
}

impl EntryMark {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn outside_month(self, value: bool) -> Self {
        Self {
            outside_month: Some(value),
            ..self
        }
    }

    #[inline]
    pub fn non_working_day(self, value: bool) -> Self {
        Self {
            non_working_day: Some(value),
            ..self
        }
    }

    #[inline]
    pub fn scheduled_day(self, value: bool) -> Self {
        Self {
            scheduled_day: Some(value),
            ..self
        }
    }

    /// No field is set, so applying the mark changes nothing.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.outside_month.is_none() && self.non_working_day.is_none() && self.scheduled_day.is_none()
    }
}

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use dcchrono::{timepoint::add_days, DateInterval};

use crate::{entry::EntryMark, error::CalendarError, month::MonthGrid};

// -----------------------------------------------------------------------------
// DisplayType
// -----------------------------------------------------------------------------
/// How the events of a source show up on the grid.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    schemars::JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DisplayType {
    /// Covered days are marked as scheduled.
    #[default]
    Events,
    /// Covered days are marked as holidays, with the event summary as information.
    NonWorkingDay,
    Hidden,
}

// -----------------------------------------------------------------------------
// EventTime
// -----------------------------------------------------------------------------
/// Boundary of an event. All-day boundaries are dates, timed ones are local date-times.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    schemars::JsonSchema,
)]
#[serde(untagged)]
pub enum EventTime {
    AllDay(NaiveDate),
    Timed(NaiveDateTime),
}

impl EventTime {
    /// Day on which the boundary falls.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::AllDay(d) => *d,
            EventTime::Timed(t) => t.date(),
        }
    }

    /// First day not touched when this is an exclusive end.
    fn exclusive_end(&self) -> Option<NaiveDate> {
        match self {
            EventTime::AllDay(d) => Some(*d),
            EventTime::Timed(t) if t.time() == NaiveTime::MIN => Some(t.date()),
            EventTime::Timed(t) => add_days(t.date(), 1),
        }
    }
}

impl From<NaiveDate> for EventTime {
    #[inline]
    fn from(value: NaiveDate) -> Self {
        EventTime::AllDay(value)
    }
}

impl From<NaiveDateTime> for EventTime {
    #[inline]
    fn from(value: NaiveDateTime) -> Self {
        EventTime::Timed(value)
    }
}

// -----------------------------------------------------------------------------
// ScheduleEvent
// -----------------------------------------------------------------------------
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
pub struct ScheduleEvent {
    #[serde(default)]
    pub summary: String,
    pub start: EventTime,
    /// Exclusive end.
    pub finish: EventTime,
}

impl ScheduleEvent {
    #[inline]
    pub fn new(summary: impl Into<String>, start: impl Into<EventTime>, finish: impl Into<EventTime>) -> Self {
        Self {
            summary: summary.into(),
            start: start.into(),
            finish: finish.into(),
        }
    }

    /// Days touched by the event as `[start, finish)`.
    ///
    /// A timed finish after midnight touches its own day as well.
    /// An event finishing on the day it starts, before any day is touched, is empty.
    ///
    /// # Errors
    /// [`CalendarError::Interval`] if the event finishes before it starts.
    pub fn interval(&self) -> Result<DateInterval, CalendarError> {
        let start = self.start.date();
        let finish = self.finish.exclusive_end().ok_or(CalendarError::OutOfRange {
            date: self.finish.date(),
            min: NaiveDate::MIN,
            max: NaiveDate::MAX,
        })?;
        if start == finish {
            return Ok(DateInterval::empty_at(start));
        }
        Ok(DateInterval::closed_open(start, finish)?)
    }
}

// -----------------------------------------------------------------------------
// ScheduleSource
// -----------------------------------------------------------------------------
/// A named calendar of events sharing one [`DisplayType`].
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    schemars::JsonSchema,
)]
pub struct ScheduleSource {
    pub name: String,
    #[serde(default)]
    pub display_type: DisplayType,
    #[serde(default)]
    pub events: Vec<ScheduleEvent>,
}

// -----------------------------------------------------------------------------
// apply_schedule
// -----------------------------------------------------------------------------
/// Replace the marks of `grid` by the ones implied by `sources`.
///
/// The grid is cleared first, then every day of every visible event
/// inside the buffered window is marked.
/// Events outside the window are ignored.
///
/// ```
/// use chrono::NaiveDate;
/// use dccalendar::{apply_schedule, DisplayType, MonthGrid, ScheduleEvent, ScheduleSource};
///
/// let ymd = |y: i32, m: u32, d: u32| {
///     NaiveDate::from_ymd_opt(y, m, d).unwrap()
/// };
///
/// let mut grid = MonthGrid::new(2025, 10).unwrap();
/// let holidays = ScheduleSource {
///     name: "holidays".to_owned(),
///     display_type: DisplayType::NonWorkingDay,
///     events: vec![ScheduleEvent::new("Sports Day", ymd(2025, 10, 13), ymd(2025, 10, 14))],
/// };
/// apply_schedule(&mut grid, &[holidays]).unwrap();
///
/// let entry = grid.get(ymd(2025, 10, 13)).unwrap();
/// assert!(entry.is_non_working_day());
/// assert_eq!(entry.information(), "Sports Day");
/// assert!(!grid.get(ymd(2025, 10, 14)).unwrap().is_non_working_day());
/// ```
///
/// # Errors
/// [`CalendarError::Interval`] if an event finishes before it starts.
/// Marks applied before the failing event are kept.
pub fn apply_schedule(grid: &mut MonthGrid, sources: &[ScheduleSource]) -> Result<(), CalendarError> {
    grid.clear();
    let window = grid.bounds().window()?;
    for source in sources {
        if source.display_type == DisplayType::Hidden {
            log::trace!("schedule '{}' is hidden", source.name);
            continue;
        }
        for event in &source.events {
            let covered = event.interval()?.intersect(&window);
            log::trace!(
                "schedule '{}': '{}' covers {covered}",
                source.name,
                event.summary
            );
            for date in covered.all_dates_in_range() {
                match source.display_type {
                    DisplayType::Events => {
                        grid.mark_entry(date, EntryMark::new().scheduled_day(true))?;
                    }
                    DisplayType::NonWorkingDay => {
                        grid.mark_entry(date, EntryMark::new().non_working_day(true))?;
                        grid.add_entry_information(date, event.summary.as_str())?;
                    }
                    DisplayType::Hidden => {}
                }
            }
        }
    }
    Ok(())
}

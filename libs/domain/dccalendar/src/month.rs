use chrono::{Datelike, NaiveDate};
use dcchrono::{
    timepoint::{add_days, preceding_sunday},
    DateInterval, DateProvider,
};
use strum::IntoEnumIterator;

use crate::{
    entry::{CalendarEntry, EntryMark},
    error::CalendarError,
    observer::{MonthObserver, ObserverId, Observers, WeekObserver},
    week::{WeekGrid, DAYS_IN_WEEK},
};

/// Weeks shown for a month.
pub const DISPLAYED_WEEKS: usize = 6;

/// Hidden weeks kept before and after the displayed ones.
pub const PADDING_WEEKS: usize = 4;

pub const BUFFERED_WEEKS: usize = DISPLAYED_WEEKS + 2 * PADDING_WEEKS;

// -----------------------------------------------------------------------------
// MonthProperty
// -----------------------------------------------------------------------------
/// Observable properties of a [`MonthGrid`], in notification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum MonthProperty {
    Year,
    Month,
    MinDate,
    StartDate,
    FirstDay,
    LastDay,
    FinishDate,
    MaxDate,
}

// -----------------------------------------------------------------------------
// MonthBounds
// -----------------------------------------------------------------------------
/// Key dates of a month laid out on Sunday-first weeks. All bounds are inclusive.
///
/// ```text
/// min_date .. (4 weeks) .. start_date <= first_day .. last_day <= finish_date .. (4 weeks) .. max_date
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, schemars::JsonSchema)]
pub struct MonthBounds {
    year: i32,
    month: u32,
    min_date: NaiveDate,
    start_date: NaiveDate,
    first_day: NaiveDate,
    last_day: NaiveDate,
    finish_date: NaiveDate,
    max_date: NaiveDate,
}

//
// construction
//
impl MonthBounds {
    /// # Errors
    /// [`CalendarError::InvalidMonth`] when `month` is not in `1..=12`
    /// or the buffered weeks are not representable.
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidMonth { year, month };
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last_day = next_first
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;
        // the 1st itself when it is a Sunday
        let start_date = preceding_sunday(first_day).ok_or_else(invalid)?;
        let finish_date =
            add_days(start_date, (DAYS_IN_WEEK * DISPLAYED_WEEKS) as i64 - 1).ok_or_else(invalid)?;
        let padding = (DAYS_IN_WEEK * PADDING_WEEKS) as i64;
        let min_date = add_days(start_date, -padding).ok_or_else(invalid)?;
        let max_date = add_days(finish_date, padding).ok_or_else(invalid)?;
        Ok(Self {
            year,
            month,
            min_date,
            start_date,
            first_day,
            last_day,
            finish_date,
            max_date,
        })
    }
}

//
// methods
//
impl MonthBounds {
    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// First buffered day.
    #[inline]
    pub fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    /// First displayed day, the Sunday on or before [`MonthBounds::first_day`].
    #[inline]
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    #[inline]
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    #[inline]
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Last displayed day.
    #[inline]
    pub fn finish_date(&self) -> NaiveDate {
        self.finish_date
    }

    /// Last buffered day.
    #[inline]
    pub fn max_date(&self) -> NaiveDate {
        self.max_date
    }

    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min_date <= date && date <= self.max_date
    }

    #[inline]
    pub fn is_in_month(&self, date: NaiveDate) -> bool {
        self.first_day <= date && date <= self.last_day
    }

    /// Every buffered day as an interval.
    #[inline]
    pub fn window(&self) -> Result<DateInterval, CalendarError> {
        Ok(DateInterval::closed(self.min_date, self.max_date)?)
    }

    /// Properties whose value differs from `other`, in notification order.
    pub fn changed_properties(&self, other: &Self) -> Vec<MonthProperty> {
        MonthProperty::iter()
            .filter(|p| match p {
                MonthProperty::Year => self.year != other.year,
                MonthProperty::Month => self.month != other.month,
                MonthProperty::MinDate => self.min_date != other.min_date,
                MonthProperty::StartDate => self.start_date != other.start_date,
                MonthProperty::FirstDay => self.first_day != other.first_day,
                MonthProperty::LastDay => self.last_day != other.last_day,
                MonthProperty::FinishDate => self.finish_date != other.finish_date,
                MonthProperty::MaxDate => self.max_date != other.max_date,
            })
            .collect()
    }

    /// Index of the buffered week holding `date`.
    #[inline]
    fn week_index(&self, date: NaiveDate) -> Option<usize> {
        self.contains(date)
            .then(|| (date - self.min_date).num_days() as usize / DAYS_IN_WEEK)
    }
}

// -----------------------------------------------------------------------------
// MonthGrid
// -----------------------------------------------------------------------------
/// Month calendar made of Sunday-first weeks.
///
/// # Overview
/// The grid owns a fixed ring of [`BUFFERED_WEEKS`] weeks allocated once.
/// [`DISPLAYED_WEEKS`] of them are shown and [`PADDING_WEEKS`] hidden weeks on each side
/// keep entries of neighboring months addressable, which schedules and the holiday detector use.
/// Navigation regenerates the weeks in place.
///
/// ```
/// use chrono::{NaiveDate, Weekday};
/// use dccalendar::{EntryMark, MonthGrid};
///
/// let ymd = |y: i32, m: u32, d: u32| {
///     NaiveDate::from_ymd_opt(y, m, d).unwrap()
/// };
///
/// // October 2025 starts on Wednesday
/// let mut grid = MonthGrid::new(2025, 10).unwrap();
/// assert_eq!(grid.bounds().start_date(), ymd(2025, 9, 28));
/// assert!(grid.get(ymd(2025, 9, 30)).unwrap().is_outside_month());
/// assert!(!grid.get(ymd(2025, 10, 1)).unwrap().is_outside_month());
///
/// grid.mark_entry(ymd(2025, 10, 13), EntryMark::new().non_working_day(true)).unwrap();
/// assert!(grid.get(ymd(2025, 10, 13)).unwrap().is_non_working_day());
///
/// grid.next().unwrap();
/// assert_eq!((grid.year(), grid.month()), (2025, 11));
/// assert_eq!(grid.week(0).unwrap().by_weekday(Weekday::Sat).date(), ymd(2025, 11, 1));
/// ```
#[derive(Debug)]
pub struct MonthGrid {
    bounds: MonthBounds,
    weeks: [WeekGrid; BUFFERED_WEEKS],
    observers: Observers<dyn MonthObserver>,
}

//
// construction
//
impl MonthGrid {
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        let mut grid = Self {
            bounds: MonthBounds::new(year, month)?,
            weeks: std::array::from_fn(|_| WeekGrid::new()),
            observers: Observers::default(),
        };
        grid.generate()?;
        Ok(grid)
    }

    /// Grid of the month containing today.
    #[inline]
    pub fn current(provider: &impl DateProvider) -> Result<Self, CalendarError> {
        let today = provider.today();
        Self::new(today.year(), today.month())
    }

    fn generate(&mut self) -> Result<(), CalendarError> {
        let bounds = self.bounds;
        for (i, week) in self.weeks.iter_mut().enumerate() {
            let sunday = add_days(bounds.min_date, (i * DAYS_IN_WEEK) as i64).ok_or(
                CalendarError::InvalidMonth {
                    year: bounds.year,
                    month: bounds.month,
                },
            )?;
            week.generate(sunday)?;
            if bounds.first_day <= week.first_date() && week.last_date() <= bounds.last_day {
                continue;
            }
            for day in 0..DAYS_IN_WEEK {
                if !bounds.is_in_month(week.get(day)?.date()) {
                    week.mark_entry_at(day, EntryMark::new().outside_month(true))?;
                }
            }
        }
        log::debug!(
            "Generated {}-{:02} over [{}, {}] for {} observers",
            bounds.year,
            bounds.month,
            bounds.min_date,
            bounds.max_date,
            self.observers.len(),
        );
        self.observers.notify(|o| o.on_generated(&bounds));
        Ok(())
    }

    pub fn subscribe(&mut self, observer: Box<dyn MonthObserver>) -> ObserverId {
        self.observers.subscribe(observer)
    }

    /// `true` if the observer was subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id).is_some()
    }

    /// Subscribe to the displayed week at `index`.
    /// The subscription follows the position, not the dates, across navigation.
    pub fn subscribe_week(
        &mut self,
        index: usize,
        observer: Box<dyn WeekObserver>,
    ) -> Result<ObserverId, CalendarError> {
        let week = self
            .weeks
            .get_mut(PADDING_WEEKS + index)
            .filter(|_| index < DISPLAYED_WEEKS)
            .ok_or(CalendarError::IndexOutOfRange {
                index,
                len: DISPLAYED_WEEKS,
            })?;
        Ok(week.subscribe(observer))
    }
}

//
// navigation
//
impl MonthGrid {
    #[inline]
    pub fn year(&self) -> i32 {
        self.bounds.year
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.bounds.month
    }

    #[inline]
    pub fn bounds(&self) -> &MonthBounds {
        &self.bounds
    }

    #[inline]
    pub fn next(&mut self) -> Result<(), CalendarError> {
        let (year, month) = match self.bounds.month {
            12 => (self.bounds.year + 1, 1),
            m => (self.bounds.year, m + 1),
        };
        self.jump_to(year, month, false).map(|_| ())
    }

    #[inline]
    pub fn previous(&mut self) -> Result<(), CalendarError> {
        let (year, month) = match self.bounds.month {
            1 => (self.bounds.year - 1, 12),
            m => (self.bounds.year, m - 1),
        };
        self.jump_to(year, month, false).map(|_| ())
    }

    /// Move to the given month.
    ///
    /// Nothing happens when the grid already shows that month, unless `force` is set.
    /// Returns whether the weeks have been regenerated.
    ///
    /// Observers receive `on_property_changing` for every property about to change,
    /// then `on_generated`, then `on_property_changed` for the same properties.
    pub fn jump_to(&mut self, year: i32, month: u32, force: bool) -> Result<bool, CalendarError> {
        if !force && self.bounds.year == year && self.bounds.month == month {
            return Ok(false);
        }
        let bounds = MonthBounds::new(year, month)?;
        let changed = self.bounds.changed_properties(&bounds);
        log::debug!(
            "Jump from {}-{:02} to {}-{:02} (force={}): {:?}",
            self.bounds.year,
            self.bounds.month,
            year,
            month,
            force,
            changed,
        );

        let old = self.bounds;
        for p in changed.iter().copied() {
            self.observers.notify(|o| o.on_property_changing(p, &old));
        }
        self.bounds = bounds;
        self.generate()?;
        for p in changed.iter().copied() {
            self.observers.notify(|o| o.on_property_changed(p, &bounds));
        }
        Ok(true)
    }
}

//
// read access
//
impl MonthGrid {
    /// Index in the buffer of the week holding `date`.
    ///
    /// # Errors
    /// [`CalendarError::OutOfRange`] outside `[min_date, max_date]`
    #[inline]
    pub fn lookup(&self, date: NaiveDate) -> Result<usize, CalendarError> {
        self.bounds
            .week_index(date)
            .ok_or(CalendarError::OutOfRange {
                date,
                min: self.bounds.min_date,
                max: self.bounds.max_date,
            })
    }

    /// # Errors
    /// [`CalendarError::NotFound`] outside the buffered weeks
    #[inline]
    pub fn get(&self, date: NaiveDate) -> Result<&CalendarEntry, CalendarError> {
        self.try_get(date).ok_or(CalendarError::NotFound { date })
    }

    #[inline]
    pub fn try_get(&self, date: NaiveDate) -> Option<&CalendarEntry> {
        let index = self.bounds.week_index(date)?;
        self.weeks[index].try_get(date)
    }

    /// The entry of `date`, or a fresh one when the date is not buffered.
    #[inline]
    pub fn entry_or_default(&self, date: NaiveDate) -> CalendarEntry {
        self.try_get(date)
            .cloned()
            .unwrap_or_else(|| CalendarEntry::new(date))
    }

    #[inline]
    pub fn contains_key(&self, date: NaiveDate) -> bool {
        self.bounds.contains(date)
    }

    /// Number of displayed weeks.
    #[inline]
    pub fn len(&self) -> usize {
        DISPLAYED_WEEKS
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The displayed week at `index`, `0` being the week of the first day.
    #[inline]
    pub fn week(&self, index: usize) -> Option<&WeekGrid> {
        self.weeks().get(index)
    }

    #[inline]
    pub fn weeks(&self) -> &[WeekGrid] {
        &self.weeks[PADDING_WEEKS..PADDING_WEEKS + DISPLAYED_WEEKS]
    }

    #[inline]
    pub fn buffered_weeks(&self) -> &[WeekGrid; BUFFERED_WEEKS] {
        &self.weeks
    }

    /// Dates of every buffered entry, ascending.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.weeks.iter().flat_map(WeekGrid::keys)
    }

    /// Every buffered entry, ascending.
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = &CalendarEntry> + '_ {
        self.weeks.iter().flat_map(WeekGrid::iter)
    }
}

//
// mutation
//
impl MonthGrid {
    pub fn mark_entry(&mut self, date: NaiveDate, mark: EntryMark) -> Result<(), CalendarError> {
        let week = self.lookup(date)?;
        self.weeks[week].mark_entry(date, mark)?;
        if !mark.is_noop() {
            self.notify_entry(week, date)?;
        }
        Ok(())
    }

    pub fn add_entry_information(
        &mut self,
        date: NaiveDate,
        information: impl Into<String>,
    ) -> Result<(), CalendarError> {
        let week = self.lookup(date)?;
        self.weeks[week].add_entry_information(date, information)?;
        self.notify_entry(week, date)
    }

    /// Mark by position in the buffer, `week < BUFFERED_WEEKS` and `day < 7`.
    pub fn mark_entry_at(
        &mut self,
        week: usize,
        day: usize,
        mark: EntryMark,
    ) -> Result<(), CalendarError> {
        self.buffered_week_mut(week)?.mark_entry_at(day, mark)?;
        if !mark.is_noop() {
            let date = self.weeks[week].get(day)?.date();
            self.notify_entry(week, date)?;
        }
        Ok(())
    }

    pub fn add_entry_information_at(
        &mut self,
        week: usize,
        day: usize,
        information: impl Into<String>,
    ) -> Result<(), CalendarError> {
        self.buffered_week_mut(week)?
            .add_entry_information_at(day, information)?;
        let date = self.weeks[week].get(day)?.date();
        self.notify_entry(week, date)
    }

    /// Drop marks and text of every buffered entry.
    pub fn clear(&mut self) {
        for week in self.weeks.iter_mut() {
            week.clear();
        }
    }

    #[inline]
    fn buffered_week_mut(&mut self, week: usize) -> Result<&mut WeekGrid, CalendarError> {
        self.weeks
            .get_mut(week)
            .ok_or(CalendarError::IndexOutOfRange {
                index: week,
                len: BUFFERED_WEEKS,
            })
    }

    fn notify_entry(&mut self, week: usize, date: NaiveDate) -> Result<(), CalendarError> {
        let entry = self.weeks[week].get_by_date(date)?;
        self.observers.notify(|o| o.on_entry_changed(week, entry));
        Ok(())
    }
}

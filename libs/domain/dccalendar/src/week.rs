use chrono::{Datelike, NaiveDate, Weekday};
use dcchrono::timepoint::{add_days, days_from_sunday, preceding_sunday};

use crate::{
    entry::{CalendarEntry, EntryMark},
    error::CalendarError,
    observer::{ObserverId, Observers, WeekObserver},
};

pub const DAYS_IN_WEEK: usize = 7;

// -----------------------------------------------------------------------------
// WeekGrid
// -----------------------------------------------------------------------------
/// Seven consecutive entries from Sunday to Saturday.
///
/// A grid is created empty, holding [`CalendarEntry::empty`] placeholders,
/// or for the week containing a date. [`WeekGrid::generate`] refills it in place,
/// so that subscribed observers survive regeneration.
///
/// ```
/// use chrono::{NaiveDate, Weekday};
/// use dccalendar::{EntryMark, WeekGrid};
///
/// let ymd = |y: i32, m: u32, d: u32| {
///     NaiveDate::from_ymd_opt(y, m, d).unwrap()
/// };
///
/// let mut week = WeekGrid::containing(ymd(2025, 5, 7)).unwrap();
/// assert_eq!(week.first_date(), ymd(2025, 5, 4));
/// assert_eq!(week.last_date(), ymd(2025, 5, 10));
///
/// week.mark_entry(ymd(2025, 5, 5), EntryMark::new().non_working_day(true)).unwrap();
/// assert!(week.by_weekday(Weekday::Mon).is_non_working_day());
///
/// // dates of other weeks are rejected
/// assert!(week.mark_entry(ymd(2025, 5, 11), EntryMark::new()).is_err());
/// ```
#[derive(Debug)]
pub struct WeekGrid {
    entries: [CalendarEntry; DAYS_IN_WEEK],
    observers: Observers<dyn WeekObserver>,
}

//
// construction
//
impl WeekGrid {
    /// A week of placeholders.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: std::array::from_fn(|_| CalendarEntry::empty()),
            observers: Observers::default(),
        }
    }

    /// The week from the Sunday on or before `date`.
    pub fn containing(date: NaiveDate) -> Result<Self, CalendarError> {
        let sunday = preceding_sunday(date).ok_or(CalendarError::OutOfRange {
            date,
            min: NaiveDate::MIN,
            max: NaiveDate::MAX,
        })?;
        let mut week = Self::new();
        week.generate(sunday)?;
        Ok(week)
    }

    /// Refill with fresh entries from `first_sunday`, then notify all seven positions.
    ///
    /// # Errors
    /// * [`CalendarError::NotSunday`]: `first_sunday` is another weekday
    /// * [`CalendarError::OutOfRange`]: the Saturday is not representable
    pub fn generate(&mut self, first_sunday: NaiveDate) -> Result<(), CalendarError> {
        if first_sunday.weekday() != Weekday::Sun {
            return Err(CalendarError::NotSunday {
                date: first_sunday,
                weekday: first_sunday.weekday(),
            });
        }
        let saturday = add_days(first_sunday, DAYS_IN_WEEK as i64 - 1).ok_or(
            CalendarError::OutOfRange {
                date: first_sunday,
                min: NaiveDate::MIN,
                max: NaiveDate::MAX,
            },
        )?;
        let mut date = first_sunday;
        for entry in self.entries.iter_mut() {
            *entry = CalendarEntry::new(date);
            date = date.succ_opt().unwrap_or(saturday);
        }
        self.notify_all();
        Ok(())
    }

    pub fn subscribe(&mut self, observer: Box<dyn WeekObserver>) -> ObserverId {
        self.observers.subscribe(observer)
    }

    /// `true` if the observer was subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id).is_some()
    }
}

impl Default for WeekGrid {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

//
// read access
//
impl WeekGrid {
    #[inline]
    pub fn first_date(&self) -> NaiveDate {
        self.entries[0].date()
    }

    #[inline]
    pub fn last_date(&self) -> NaiveDate {
        self.entries[DAYS_IN_WEEK - 1].date()
    }

    #[inline]
    pub fn len(&self) -> usize {
        DAYS_IN_WEEK
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn contains_key(&self, date: NaiveDate) -> bool {
        self.first_date() <= date && date <= self.last_date()
    }

    /// # Errors
    /// [`CalendarError::IndexOutOfRange`] for `index >= 7`
    #[inline]
    pub fn get(&self, index: usize) -> Result<&CalendarEntry, CalendarError> {
        self.entries.get(index).ok_or(CalendarError::IndexOutOfRange {
            index,
            len: DAYS_IN_WEEK,
        })
    }

    /// # Errors
    /// [`CalendarError::DateOutsideWeek`] for dates of other weeks
    #[inline]
    pub fn get_by_date(&self, date: NaiveDate) -> Result<&CalendarEntry, CalendarError> {
        let index = self.index_of(date)?;
        Ok(&self.entries[index])
    }

    #[inline]
    pub fn try_get(&self, date: NaiveDate) -> Option<&CalendarEntry> {
        self.get_by_date(date).ok()
    }

    #[inline]
    pub fn by_weekday(&self, weekday: Weekday) -> &CalendarEntry {
        &self.entries[days_from_sunday(weekday)]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, CalendarEntry> {
        self.entries.iter()
    }

    #[inline]
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.entries.iter().map(CalendarEntry::date)
    }

    fn index_of(&self, date: NaiveDate) -> Result<usize, CalendarError> {
        if !self.contains_key(date) {
            return Err(CalendarError::DateOutsideWeek {
                date,
                first: self.first_date(),
                last: self.last_date(),
            });
        }
        Ok((date - self.first_date()).num_days() as usize)
    }
}

impl<'a> IntoIterator for &'a WeekGrid {
    type Item = &'a CalendarEntry;
    type IntoIter = std::slice::Iter<'a, CalendarEntry>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//
// mutation
//
impl WeekGrid {
    /// Replace the flags set by `mark` on the entry of `date`.
    /// A mark without any field set changes nothing and notifies nobody.
    #[inline]
    pub fn mark_entry(&mut self, date: NaiveDate, mark: EntryMark) -> Result<(), CalendarError> {
        let index = self.index_of(date)?;
        self.mark_entry_at(index, mark)
    }

    pub fn mark_entry_at(&mut self, index: usize, mark: EntryMark) -> Result<(), CalendarError> {
        let entry = self.get(index)?;
        if mark.is_noop() {
            return Ok(());
        }
        let updated = entry.clone().with_mark(&mark);
        self.replace(index, updated);
        Ok(())
    }

    #[inline]
    pub fn mark_weekday(&mut self, weekday: Weekday, mark: EntryMark) {
        let index = days_from_sunday(weekday);
        if !mark.is_noop() {
            let updated = self.entries[index].clone().with_mark(&mark);
            self.replace(index, updated);
        }
    }

    #[inline]
    pub fn add_entry_information(
        &mut self,
        date: NaiveDate,
        information: impl Into<String>,
    ) -> Result<(), CalendarError> {
        let index = self.index_of(date)?;
        self.add_entry_information_at(index, information)
    }

    pub fn add_entry_information_at(
        &mut self,
        index: usize,
        information: impl Into<String>,
    ) -> Result<(), CalendarError> {
        let updated = self.get(index)?.clone().with_information(information);
        self.replace(index, updated);
        Ok(())
    }

    #[inline]
    pub fn add_entry_information_weekday(
        &mut self,
        weekday: Weekday,
        information: impl Into<String>,
    ) {
        let index = days_from_sunday(weekday);
        let updated = self.entries[index].clone().with_information(information);
        self.replace(index, updated);
    }

    /// Drop marks and text of every entry. Dates and outside-month flags are kept.
    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = std::mem::take(entry).cleared();
        }
        self.notify_all();
    }

    #[inline]
    fn replace(&mut self, index: usize, entry: CalendarEntry) {
        self.entries[index] = entry;
        let entry = &self.entries[index];
        self.observers.notify(|o| o.on_entry_changed(index, entry));
    }

    fn notify_all(&mut self) {
        let entries = &self.entries;
        self.observers.notify(|o| {
            for (index, entry) in entries.iter().enumerate() {
                o.on_entry_changed(index, entry);
            }
        });
    }
}

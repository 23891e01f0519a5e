use std::iter::FusedIterator;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

// -----------------------------------------------------------------------------
// functions
// -----------------------------------------------------------------------------
/// The instant at which the given date starts.
#[inline]
pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// The calendar day an instant falls on.
#[inline]
pub fn floor_to_date(instant: NaiveDateTime) -> NaiveDate {
    instant.date()
}

/// Position of the weekday in a Sunday-first week, `0` for Sunday and `6` for Saturday.
#[inline]
pub fn days_from_sunday(weekday: Weekday) -> usize {
    weekday.num_days_from_sunday() as usize
}

/// The Sunday on or before the given date.
///
/// [None] is returned only when that Sunday is not representable.
///
/// ```
/// use chrono::NaiveDate;
/// use dcchrono::timepoint::preceding_sunday;
///
/// let ymd = |y: i32, m: u32, d: u32| {
///     NaiveDate::from_ymd_opt(y, m, d).unwrap()
/// };
///
/// assert_eq!(preceding_sunday(ymd(2025, 10, 1)), Some(ymd(2025, 9, 28))); // Wed
/// assert_eq!(preceding_sunday(ymd(2025, 6, 1)), Some(ymd(2025, 6, 1))); // Sun
/// ```
#[inline]
pub fn preceding_sunday(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(days_from_sunday(date.weekday()) as u64))
}

/// Shift the date by signed number of days.
#[inline]
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days < 0 {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_add_days(Days::new(days as u64))
    }
}

// -----------------------------------------------------------------------------
// Dates
// -----------------------------------------------------------------------------
/// Iterator over consecutive dates between two inclusive ends.
///
/// The iterator is finite, double-ended and cheap to clone,
/// so that a clone restarts the enumeration from the current position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dates {
    front: NaiveDate,
    back: NaiveDate,
    exhausted: bool,
}

//
// construction
//
impl Dates {
    /// Dates from `first` to `last`, both inclusive.
    /// Nothing is yielded when `last < first`.
    #[inline]
    pub fn new(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            front: first,
            back: last,
            exhausted: last < first,
        }
    }

    #[inline]
    pub fn empty() -> Self {
        Self {
            front: NaiveDate::MIN,
            back: NaiveDate::MIN,
            exhausted: true,
        }
    }
}

impl Iterator for Dates {
    type Item = NaiveDate;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let ret = self.front;
        match ret.succ_opt() {
            Some(next) if ret < self.back => self.front = next,
            _ => self.exhausted = true,
        }
        Some(ret)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Dates {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let ret = self.back;
        match ret.pred_opt() {
            Some(prev) if self.front < ret => self.back = prev,
            _ => self.exhausted = true,
        }
        Some(ret)
    }
}

impl ExactSizeIterator for Dates {
    #[inline]
    fn len(&self) -> usize {
        if self.exhausted {
            0
        } else {
            (self.back - self.front).num_days() as usize + 1
        }
    }
}

impl FusedIterator for Dates {}

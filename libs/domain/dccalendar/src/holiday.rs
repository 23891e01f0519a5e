use std::fmt::Display;

use chrono::NaiveDate;
use dcchrono::timepoint::add_days;

use crate::{entry::CalendarEntry, error::CalendarError, month::MonthGrid, week::WeekGrid};

// -----------------------------------------------------------------------------
// EntrySource
// -----------------------------------------------------------------------------
/// Read access to entries over a contiguous range of dates.
pub trait EntrySource {
    /// First date with an entry.
    fn first_date(&self) -> NaiveDate;

    /// Last date with an entry.
    fn last_date(&self) -> NaiveDate;

    /// [None] outside `[first_date, last_date]`.
    fn entry(&self, date: NaiveDate) -> Option<&CalendarEntry>;
}

impl EntrySource for MonthGrid {
    #[inline]
    fn first_date(&self) -> NaiveDate {
        self.bounds().min_date()
    }

    #[inline]
    fn last_date(&self) -> NaiveDate {
        self.bounds().max_date()
    }

    #[inline]
    fn entry(&self, date: NaiveDate) -> Option<&CalendarEntry> {
        self.try_get(date)
    }
}

impl EntrySource for WeekGrid {
    #[inline]
    fn first_date(&self) -> NaiveDate {
        WeekGrid::first_date(self)
    }

    #[inline]
    fn last_date(&self) -> NaiveDate {
        WeekGrid::last_date(self)
    }

    #[inline]
    fn entry(&self, date: NaiveDate) -> Option<&CalendarEntry> {
        self.try_get(date)
    }
}

// -----------------------------------------------------------------------------
// HolidayRunInfo
// -----------------------------------------------------------------------------
/// A run of consecutive non-working days near a pivot date.
///
/// `start_in_days` is the offset of the first day of the run from the pivot,
/// negative when the run started before the pivot.
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
)]
pub struct HolidayRunInfo {
    pub total_days: u32,
    pub start_in_days: i32,
}

impl HolidayRunInfo {
    /// No run was found.
    pub const EMPTY: Self = Self {
        total_days: 0,
        start_in_days: 0,
    };

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_days == 0
    }

    #[inline]
    pub fn is_multi_day(&self) -> bool {
        self.total_days > 1
    }

    /// First day of the run seen from `pivot`.
    #[inline]
    pub fn start_date(&self, pivot: NaiveDate) -> Option<NaiveDate> {
        if self.is_empty() {
            return None;
        }
        add_days(pivot, self.start_in_days as i64)
    }

    /// Days of the run from the pivot onward, the pivot included.
    /// A run which has not started yet counts in full.
    #[inline]
    pub fn remaining_days(&self) -> u32 {
        if self.start_in_days < 0 {
            self.total_days
                .saturating_sub(self.start_in_days.unsigned_abs())
        } else {
            self.total_days
        }
    }
}

impl Display for HolidayRunInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.is_empty(), self.start_in_days) {
            (true, _) => write!(f, "no holidays ahead"),
            (false, 0) => write!(f, "{} days off from today", self.total_days),
            (false, s) if s < 0 => write!(
                f,
                "{} days off, {} left including today",
                self.total_days,
                self.remaining_days()
            ),
            (false, s) => write!(f, "{} days off in {} days", self.total_days, s),
        }
    }
}

// -----------------------------------------------------------------------------
// HolidayRunDetector
// -----------------------------------------------------------------------------
/// Finds the run of non-working days to announce for a pivot date.
///
/// # Overview
/// A day is non-working when it is flagged as such or falls on a weekend.
/// Days not covered by the source count as working days,
/// so no run extends beyond the source.
///
/// Ordinary weekends are not worth announcing and are suppressed:
/// a lone Saturday or Sunday, and a Saturday followed by a Sunday, unless one of them is flagged.
/// Runs of three days or more are never suppressed.
///
/// ```
/// use chrono::NaiveDate;
/// use dccalendar::{EntryMark, HolidayRunDetector, HolidayRunInfo, MonthGrid};
///
/// let ymd = |y: i32, m: u32, d: u32| {
///     NaiveDate::from_ymd_opt(y, m, d).unwrap()
/// };
///
/// let mut grid = MonthGrid::new(2025, 10).unwrap();
/// let friday = ymd(2025, 10, 10);
///
/// // a plain weekend is not announced
/// let info = HolidayRunDetector::new(&grid).run(friday, 3).unwrap();
/// assert_eq!(info, HolidayRunInfo::EMPTY);
///
/// // Monday is a holiday: three days off from tomorrow
/// grid.mark_entry(ymd(2025, 10, 13), EntryMark::new().non_working_day(true)).unwrap();
/// let info = HolidayRunDetector::new(&grid).run(friday, 3).unwrap();
/// assert_eq!(info, HolidayRunInfo { total_days: 3, start_in_days: 1 });
/// ```
#[derive(Debug)]
pub struct HolidayRunDetector<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: EntrySource + ?Sized> HolidayRunDetector<'a, S> {
    #[inline]
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Run of non-working days touching `pivot`, or else the first one starting
    /// within `search_depth - 1` days after it.
    ///
    /// A run touching the pivot is reported only when the day after the pivot is non-working,
    /// that is, when the pivot is not the last day off.
    ///
    /// # Errors
    /// * [`CalendarError::InvalidSearchDepth`]: `search_depth` is zero
    /// * [`CalendarError::OutOfRange`]: `pivot` is not covered by the source
    pub fn run(&self, pivot: NaiveDate, search_depth: u32) -> Result<HolidayRunInfo, CalendarError> {
        if search_depth < 1 {
            return Err(CalendarError::InvalidSearchDepth {
                depth: search_depth,
            });
        }
        if self.source.entry(pivot).is_none() {
            return Err(CalendarError::OutOfRange {
                date: pivot,
                min: self.source.first_date(),
                max: self.source.last_date(),
            });
        }

        if self.is_non_working(add_days(pivot, 1)) {
            if let Some(info) = self.run_containing(pivot) {
                log::trace!("{pivot}: run containing the pivot {info:?}");
                return Ok(info);
            }
        }
        let last = self.source.last_date();
        for offset in 1..search_depth {
            let candidate = add_days(pivot, offset as i64);
            // nothing past the source is non-working
            if candidate.map_or(true, |d| last < d) {
                break;
            }
            let total = self.run_length(candidate);
            if total == 0 {
                continue;
            }
            if candidate.map_or(false, |first| self.is_plain_weekend(first, total)) {
                log::trace!("{pivot}: plain weekend of {total} days at +{offset} suppressed");
                continue;
            }
            let info = HolidayRunInfo {
                total_days: total,
                start_in_days: offset as i32,
            };
            log::trace!("{pivot}: run ahead {info:?}");
            return Ok(info);
        }
        log::trace!("{pivot}: no run within {search_depth} days up to {last}");
        Ok(HolidayRunInfo::EMPTY)
    }

    fn run_containing(&self, pivot: NaiveDate) -> Option<HolidayRunInfo> {
        if !self.is_non_working(Some(pivot)) {
            return None;
        }
        let mut start_in_days = 0i32;
        while self.is_non_working(add_days(pivot, start_in_days as i64 - 1)) {
            start_in_days -= 1;
        }
        let total = start_in_days.unsigned_abs() + self.run_length(Some(pivot));
        let first = add_days(pivot, start_in_days as i64)?;
        if self.is_plain_weekend(first, total) {
            log::trace!("{pivot}: plain weekend of {total} days from {first} suppressed");
            return None;
        }
        Some(HolidayRunInfo {
            total_days: total,
            start_in_days,
        })
    }

    /// Number of consecutive non-working days from `first`.
    fn run_length(&self, first: Option<NaiveDate>) -> u32 {
        let mut total = 0;
        let mut day = first;
        while self.is_non_working(day) {
            total += 1;
            day = day.and_then(|d| d.succ_opt());
        }
        total
    }

    fn is_non_working(&self, date: Option<NaiveDate>) -> bool {
        date.and_then(|d| self.source.entry(d))
            .map_or(false, CalendarEntry::is_non_working)
    }

    fn is_flagged(&self, date: Option<NaiveDate>) -> bool {
        date.and_then(|d| self.source.entry(d))
            .map_or(false, CalendarEntry::is_non_working_day)
    }

    fn is_plain_weekend(&self, first: NaiveDate, total: u32) -> bool {
        let Some(entry) = self.source.entry(first) else {
            return false;
        };
        match total {
            1 => (entry.is_saturday() || entry.is_sunday()) && !entry.is_non_working_day(),
            2 => {
                entry.is_saturday()
                    && !entry.is_non_working_day()
                    && !self.is_flagged(first.succ_opt())
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, collections::BTreeMap};

    use chrono::{Datelike, Weekday};
    use maplit::btreemap;
    use rstest::rstest;

    use super::*;
    use crate::entry::EntryMark;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // October 2025: Fri 10, Sat 11, Sun 12, Mon 13
    fn oct(d: u32) -> NaiveDate {
        ymd(2025, 10, d)
    }

    fn grid_with_holidays(holidays: &[NaiveDate]) -> MonthGrid {
        let mut grid = MonthGrid::new(2025, 10).unwrap();
        for date in holidays {
            grid.mark_entry(*date, EntryMark::new().non_working_day(true))
                .unwrap();
        }
        grid
    }

    /// Entries keyed by date, days between the keys are missing.
    struct Sparse(BTreeMap<NaiveDate, CalendarEntry>);

    impl EntrySource for Sparse {
        fn first_date(&self) -> NaiveDate {
            *self.0.keys().next().unwrap()
        }

        fn last_date(&self) -> NaiveDate {
            *self.0.keys().next_back().unwrap()
        }

        fn entry(&self, date: NaiveDate) -> Option<&CalendarEntry> {
            self.0.get(&date)
        }
    }

    //
    // HolidayRunInfo
    //
    #[rstest]
    #[case::empty(HolidayRunInfo::EMPTY, false, 0, None)]
    #[case::single(HolidayRunInfo { total_days: 1, start_in_days: 0 }, false, 1, Some(oct(10)))]
    #[case::ahead(HolidayRunInfo { total_days: 3, start_in_days: 2 }, true, 3, Some(oct(12)))]
    #[case::ongoing(HolidayRunInfo { total_days: 5, start_in_days: -2 }, true, 3, Some(oct(8)))]
    fn test_info(
        #[case] info: HolidayRunInfo,
        #[case] multi: bool,
        #[case] remaining: u32,
        #[case] start: Option<NaiveDate>,
    ) {
        assert_eq!(info.is_multi_day(), multi);
        assert_eq!(info.remaining_days(), remaining);
        assert_eq!(info.start_date(oct(10)), start);
        assert_eq!(HolidayRunInfo::default(), HolidayRunInfo::EMPTY);
    }

    #[rstest]
    #[case::empty(HolidayRunInfo::EMPTY, "no holidays ahead")]
    #[case::today(HolidayRunInfo { total_days: 3, start_in_days: 0 }, "3 days off from today")]
    #[case::ahead(HolidayRunInfo { total_days: 3, start_in_days: 1 }, "3 days off in 1 days")]
    #[case::ongoing(HolidayRunInfo { total_days: 4, start_in_days: -1 }, "4 days off, 3 left including today")]
    fn test_info_display(#[case] info: HolidayRunInfo, #[case] expected: &str) {
        assert_eq!(info.to_string(), expected);
    }

    //
    // arguments
    //
    #[test]
    fn test_invalid_depth() {
        let grid = grid_with_holidays(&[]);

        assert_eq!(
            HolidayRunDetector::new(&grid).run(oct(10), 0),
            Err(CalendarError::InvalidSearchDepth { depth: 0 })
        );
    }

    #[test]
    fn test_pivot_out_of_range() {
        let grid = grid_with_holidays(&[]);
        let pivot = ymd(2026, 3, 1);

        assert_eq!(
            HolidayRunDetector::new(&grid).run(pivot, 3),
            Err(CalendarError::OutOfRange {
                date: pivot,
                min: grid.bounds().min_date(),
                max: grid.bounds().max_date(),
            })
        );
    }

    //
    // scenarios
    //
    #[rstest]
    // plain weekend ahead
    #[case::friday_plain(&[], oct(10), 3, HolidayRunInfo::EMPTY)]
    #[case::thursday_plain(&[], oct(9), 3, HolidayRunInfo::EMPTY)]
    // Monday holiday
    #[case::friday_long(&[oct(13)], oct(10), 3, HolidayRunInfo { total_days: 3, start_in_days: 1 })]
    #[case::thursday_long(&[oct(13)], oct(9), 3, HolidayRunInfo { total_days: 3, start_in_days: 2 })]
    #[case::thursday_too_far(&[oct(13)], oct(9), 2, HolidayRunInfo::EMPTY)]
    #[case::saturday_long(&[oct(13)], oct(11), 3, HolidayRunInfo { total_days: 3, start_in_days: 0 })]
    #[case::sunday_long(&[oct(13)], oct(12), 3, HolidayRunInfo { total_days: 3, start_in_days: -1 })]
    // the last day off looks ahead
    #[case::monday_last(&[oct(13)], oct(13), 3, HolidayRunInfo::EMPTY)]
    // Friday holiday
    #[case::friday_holiday(&[oct(10)], oct(10), 3, HolidayRunInfo { total_days: 3, start_in_days: 0 })]
    #[case::thursday_before(&[oct(10)], oct(9), 1, HolidayRunInfo::EMPTY)]
    #[case::thursday_before_depth(&[oct(10)], oct(9), 2, HolidayRunInfo { total_days: 3, start_in_days: 1 })]
    // a flagged weekday alone
    #[case::wednesday_holiday(&[oct(15)], oct(14), 3, HolidayRunInfo { total_days: 1, start_in_days: 1 })]
    #[case::wednesday_today(&[oct(15)], oct(15), 3, HolidayRunInfo::EMPTY)]
    // flagged Saturday makes the weekend announceable
    #[case::flagged_saturday(&[oct(11)], oct(10), 3, HolidayRunInfo { total_days: 2, start_in_days: 1 })]
    // a flagged Sunday is announced along with its Saturday
    #[case::flagged_sunday(&[oct(12)], oct(11), 3, HolidayRunInfo { total_days: 2, start_in_days: 0 })]
    // weekend plus holiday a day later is two runs
    #[case::split(&[oct(14)], oct(10), 3, HolidayRunInfo::EMPTY)]
    // a long run of flagged weekdays
    #[case::golden_week(
        &[oct(13), oct(14), oct(15), oct(16), oct(17)],
        oct(15),
        3,
        HolidayRunInfo { total_days: 9, start_in_days: -4 }
    )]
    fn test_run(
        #[case] holidays: &[NaiveDate],
        #[case] pivot: NaiveDate,
        #[case] depth: u32,
        #[case] expected: HolidayRunInfo,
    ) {
        let grid = grid_with_holidays(holidays);

        let info = HolidayRunDetector::new(&grid).run(pivot, depth).unwrap();

        assert_eq!(info, expected);
    }

    #[test]
    fn test_containing_run_preferred_over_longer_one() {
        // Fri holiday then weekend (3 days), and a later week-long run
        let grid = grid_with_holidays(&[
            oct(10),
            oct(14),
            oct(15),
            oct(16),
            oct(17),
        ]);

        let info = HolidayRunDetector::new(&grid).run(oct(11), 5).unwrap();

        assert_eq!(
            info,
            HolidayRunInfo {
                total_days: 3,
                start_in_days: -1
            }
        );
    }

    #[test]
    fn test_week_source_stops_at_edge() {
        // Sun 2025-10-05 .. Sat 2025-10-11
        let mut week = WeekGrid::containing(oct(7)).unwrap();
        week.mark_weekday(Weekday::Fri, EntryMark::new().non_working_day(true));

        let info = HolidayRunDetector::new(&week).run(oct(9), 3).unwrap();

        // Sunday the 12th is outside of the week
        assert_eq!(
            info,
            HolidayRunInfo {
                total_days: 2,
                start_in_days: 1
            }
        );
        // Saturday is the last covered day: nothing after it
        assert_eq!(
            HolidayRunDetector::new(&week).run(oct(11), 3).unwrap(),
            HolidayRunInfo::EMPTY
        );
    }

    #[test]
    fn test_missing_days_are_working() {
        let source = Sparse(btreemap! {
            oct(9) => CalendarEntry::new(oct(9)),
            oct(10) => CalendarEntry::new(oct(10)).with_mark(&EntryMark::new().non_working_day(true)),
            oct(12) => CalendarEntry::new(oct(12)),
        });
        assert_eq!(oct(12).weekday(), Weekday::Sun);

        let info = HolidayRunDetector::new(&source).run(oct(9), 3).unwrap();

        assert_eq!(
            info,
            HolidayRunInfo {
                total_days: 1,
                start_in_days: 1
            }
        );
    }

    #[test]
    fn test_week_source_flagged_lone_saturday() {
        // Sun 2025-10-05 .. Sat 2025-10-11, Sunday the 12th is not covered
        let mut week = WeekGrid::containing(oct(7)).unwrap();
        week.mark_weekday(Weekday::Sat, EntryMark::new().non_working_day(true));

        let info = HolidayRunDetector::new(&week).run(oct(9), 3).unwrap();

        assert_eq!(
            info,
            HolidayRunInfo {
                total_days: 1,
                start_in_days: 2
            }
        );
    }

    /// Counts entry lookups of the wrapped grid.
    struct Counting<'a> {
        grid: &'a MonthGrid,
        lookups: Cell<usize>,
    }

    impl EntrySource for Counting<'_> {
        fn first_date(&self) -> NaiveDate {
            EntrySource::first_date(self.grid)
        }

        fn last_date(&self) -> NaiveDate {
            EntrySource::last_date(self.grid)
        }

        fn entry(&self, date: NaiveDate) -> Option<&CalendarEntry> {
            self.lookups.set(self.lookups.get() + 1);
            self.grid.try_get(date)
        }
    }

    #[rstest]
    #[case::large(1_000_000)]
    #[case::max(u32::MAX)]
    fn test_scan_stops_at_source_end(#[case] depth: u32) {
        let grid = grid_with_holidays(&[]);
        let source = Counting {
            grid: &grid,
            lookups: Cell::new(0),
        };

        let info = HolidayRunDetector::new(&source).run(oct(15), depth).unwrap();

        assert_eq!(info, HolidayRunInfo::EMPTY);
        // at most a few lookups per covered day
        assert!(source.lookups.get() < 5 * 98, "{} lookups", source.lookups.get());
    }

    #[test]
    fn test_scan_finds_run_at_source_end() {
        // Fri 2025-12-05 flagged, Sat 2025-12-06 is the last buffered day
        let grid = grid_with_holidays(&[ymd(2025, 12, 5)]);

        let info = HolidayRunDetector::new(&grid).run(ymd(2025, 12, 1), u32::MAX).unwrap();

        assert_eq!(
            info,
            HolidayRunInfo {
                total_days: 2,
                start_in_days: 4
            }
        );
    }

    #[test]
    fn test_dyn_source() {
        let grid = grid_with_holidays(&[oct(13)]);
        let source: &dyn EntrySource = &grid;

        let info = HolidayRunDetector::new(source).run(oct(10), 3).unwrap();

        assert_eq!(info.total_days, 3);
    }
}

use std::fmt::Display;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use smallvec::SmallVec;

use super::{Fragments, IntervalError, IntervalRange};
use crate::timepoint::{floor_to_date, midnight, Dates};

// -----------------------------------------------------------------------------
// DateInterval
// -----------------------------------------------------------------------------
/// Interval of calendar days.
///
/// Each date stands for its midnight instant, so `[2025-01-01, 2025-01-03)` covers
/// the instants of the 1st and the 2nd.
/// All set operations are delegated to [`IntervalRange<NaiveDateTime>`]
/// and their results are floored back to dates.
///
/// ```
/// use chrono::NaiveDate;
/// use dcchrono::DateInterval;
///
/// let ymd = |y: i32, m: u32, d: u32| {
///     NaiveDate::from_ymd_opt(y, m, d).unwrap()
/// };
///
/// let week = DateInterval::closed(ymd(2025, 1, 5), ymd(2025, 1, 11)).unwrap();
/// let trip = DateInterval::closed_open(ymd(2025, 1, 10), ymd(2025, 1, 14)).unwrap();
///
/// assert!(week.overlaps(&trip));
/// assert_eq!(
///     week.intersect(&trip).all_dates_in_range().collect::<Vec<_>>(),
///     vec![ymd(2025, 1, 10), ymd(2025, 1, 11)],
/// );
/// assert_eq!(week.all_dates_in_range().rev().next(), Some(ymd(2025, 1, 11)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateInterval(IntervalRange<NaiveDateTime>);

//
// ser/de
//
impl serde::Serialize for DateInterval {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&IntervalRange::<NaiveDate>::from(*self), serializer)
    }
}

impl<'de> serde::Deserialize<'de> for DateInterval {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<DateInterval, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let dates = <IntervalRange<NaiveDate> as serde::Deserialize>::deserialize(deserializer)?;
        Ok(dates.into())
    }
}

//
// construction
//
impl DateInterval {
    /// # Errors
    /// Same as [`IntervalRange::new`].
    #[inline]
    pub fn new(
        start: NaiveDate,
        finish: NaiveDate,
        includes_start: bool,
        includes_finish: bool,
    ) -> Result<Self, IntervalError<NaiveDate>> {
        IntervalRange::new(start, finish, includes_start, includes_finish).map(Self::from)
    }

    #[inline]
    pub fn closed(start: NaiveDate, finish: NaiveDate) -> Result<Self, IntervalError<NaiveDate>> {
        Self::new(start, finish, true, true)
    }

    /// `[start, finish)`
    ///
    /// # Errors
    /// Same as [`IntervalRange::closed_open`], so `start == finish` fails.
    #[inline]
    pub fn closed_open(
        start: NaiveDate,
        finish: NaiveDate,
    ) -> Result<Self, IntervalError<NaiveDate>> {
        IntervalRange::closed_open(start, finish).map(Self::from)
    }

    #[inline]
    pub fn empty_at(anchor: NaiveDate) -> Self {
        Self(IntervalRange::empty_at(midnight(anchor)))
    }

    // operations on midnights only ever produce midnights
    #[inline]
    fn wrap_all(fragments: Fragments<NaiveDateTime>) -> SmallVec<[Self; 2]> {
        fragments.into_iter().map(Self).collect()
    }
}

impl Default for DateInterval {
    #[inline]
    fn default() -> Self {
        Self::empty_at(NaiveDate::MIN)
    }
}

impl From<IntervalRange<NaiveDate>> for DateInterval {
    #[inline]
    fn from(dates: IntervalRange<NaiveDate>) -> Self {
        if dates.is_empty() {
            return Self::empty_at(dates.start());
        }
        let start = midnight(dates.start());
        let finish = midnight(dates.finish());
        match IntervalRange::new(start, finish, dates.includes_start(), dates.includes_finish()) {
            Ok(instants) => Self(instants),
            // midnight is monotone, so a valid date range stays valid
            Err(_) => Self::empty_at(dates.start()),
        }
    }
}

impl From<DateInterval> for IntervalRange<NaiveDate> {
    #[inline]
    fn from(dates: DateInterval) -> Self {
        IntervalRange::new(
            dates.start(),
            dates.finish(),
            dates.0.includes_start(),
            dates.0.includes_finish(),
        )
        .unwrap_or_else(|_| IntervalRange::empty_at(dates.start()))
    }
}

impl Display for DateInterval {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&IntervalRange::<NaiveDate>::from(*self), f)
    }
}

//
// accessors
//
impl DateInterval {
    #[inline]
    pub fn start(&self) -> NaiveDate {
        floor_to_date(self.0.start())
    }

    #[inline]
    pub fn finish(&self) -> NaiveDate {
        floor_to_date(self.0.finish())
    }

    #[inline]
    pub fn includes_start(&self) -> bool {
        self.0.includes_start()
    }

    #[inline]
    pub fn includes_finish(&self) -> bool {
        self.0.includes_finish()
    }

    #[inline]
    pub fn offset(&self) -> TimeDelta {
        self.0.offset()
    }

    /// The underlying range of instants.
    #[inline]
    pub fn as_instants(&self) -> IntervalRange<NaiveDateTime> {
        self.0
    }
}

//
// methods
//
impl DateInterval {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(midnight(date))
    }

    /// Whether the day of the instant belongs to the interval.
    #[inline]
    pub fn contains_instant(&self, instant: NaiveDateTime) -> bool {
        self.contains(floor_to_date(instant))
    }

    #[inline]
    pub fn contains_interval(&self, other: &Self) -> bool {
        self.0.contains_interval(&other.0)
    }

    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.0.overlaps(&other.0)
    }

    #[inline]
    pub fn intersect(&self, other: &Self) -> Self {
        Self(self.0.intersect(&other.0))
    }

    #[inline]
    pub fn union(&self, other: &Self) -> SmallVec<[Self; 2]> {
        Self::wrap_all(self.0.union(&other.0))
    }

    #[inline]
    pub fn exclude_overlap(&self, other: &Self) -> SmallVec<[Self; 2]> {
        Self::wrap_all(self.0.exclude_overlap(&other.0))
    }

    /// Every included date from the first included day to the last one.
    ///
    /// The iterator is lazy and cloneable, and can be consumed from both ends.
    #[inline]
    pub fn all_dates_in_range(&self) -> Dates {
        self.0
            .dates(self.0.includes_start(), self.0.includes_finish())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(DateInterval: Copy, Send, Sync, Eq, std::hash::Hash, Default);

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn jan(d: u32) -> NaiveDate {
        ymd(2025, 1, d)
    }

    #[test]
    fn test_new_ng() {
        assert_eq!(
            DateInterval::closed(jan(3), jan(1)),
            Err(IntervalError::FinishBeforeStart {
                start: jan(3),
                finish: jan(1)
            })
        );
        assert_eq!(
            DateInterval::new(jan(3), jan(3), false, true),
            Err(IntervalError::MixedDegenerate { point: jan(3) })
        );
        assert_eq!(
            DateInterval::closed_open(jan(3), jan(3)),
            Err(IntervalError::MixedDegenerate { point: jan(3) })
        );
    }

    #[test]
    fn test_accessors() {
        let r = DateInterval::closed_open(jan(1), jan(4)).unwrap();

        assert_eq!(r.start(), jan(1));
        assert_eq!(r.finish(), jan(4));
        assert!(r.includes_start());
        assert!(!r.includes_finish());
        assert_eq!(r.offset(), TimeDelta::days(3));
        assert_eq!(r.as_instants().start(), midnight(jan(1)));
        assert_eq!(r.to_string(), "[2025-01-01, 2025-01-04)");
    }

    #[rstest]
    #[case::closed(DateInterval::closed(jan(1), jan(3)).unwrap(), vec![jan(1), jan(2), jan(3)])]
    #[case::closed_open(DateInterval::closed_open(jan(1), jan(3)).unwrap(), vec![jan(1), jan(2)])]
    #[case::open(DateInterval::new(jan(1), jan(3), false, false).unwrap(), vec![jan(2)])]
    #[case::open_closed(DateInterval::new(jan(1), jan(3), false, true).unwrap(), vec![jan(2), jan(3)])]
    #[case::point(DateInterval::closed(jan(5), jan(5)).unwrap(), vec![jan(5)])]
    #[case::empty(DateInterval::empty_at(jan(5)), vec![])]
    #[case::month_end(
        DateInterval::closed(ymd(2024, 2, 28), ymd(2024, 3, 1)).unwrap(),
        vec![ymd(2024, 2, 28), ymd(2024, 2, 29), ymd(2024, 3, 1)]
    )]
    fn test_all_dates_in_range(#[case] r: DateInterval, #[case] expected: Vec<NaiveDate>) {
        let dates = r.all_dates_in_range();

        assert_eq!(dates.clone().collect::<Vec<_>>(), expected);
        // restartable and double-ended
        let mut rev = expected.clone();
        rev.reverse();
        assert_eq!(dates.rev().collect::<Vec<_>>(), rev);
        assert!(expected.iter().all(|d| r.contains(*d)));
    }

    #[rstest]
    #[case::inside(jan(2), 23, true)]
    #[case::start_day(jan(1), 0, true)]
    #[case::finish_day_late(jan(4), 12, false)]
    #[case::before(ymd(2024, 12, 31), 23, false)]
    fn test_contains_instant(#[case] date: NaiveDate, #[case] hour: u32, #[case] expected: bool) {
        let r = DateInterval::closed_open(jan(1), jan(4)).unwrap();
        let instant = date.and_hms_opt(hour, 0, 0).unwrap();

        assert_eq!(r.contains_instant(instant), expected);
    }

    #[test]
    fn test_set_operations() {
        let a = DateInterval::closed(jan(1), jan(10)).unwrap();
        let b = DateInterval::closed_open(jan(5), jan(15)).unwrap();

        assert!(a.overlaps(&b));
        assert!(!a.contains_interval(&b));
        assert!(a.contains_interval(&DateInterval::closed(jan(2), jan(3)).unwrap()));
        assert_eq!(a.intersect(&b), DateInterval::closed(jan(5), jan(10)).unwrap());
        assert_eq!(
            a.union(&b).to_vec(),
            vec![DateInterval::closed_open(jan(1), jan(15)).unwrap()]
        );
        assert_eq!(
            a.exclude_overlap(&b).to_vec(),
            vec![DateInterval::closed_open(jan(1), jan(5)).unwrap()]
        );
        assert_eq!(
            b.exclude_overlap(&a).to_vec(),
            vec![DateInterval::new(jan(10), jan(15), false, false).unwrap()]
        );
        assert!(a.exclude_overlap(&a).is_empty());
    }

    #[test]
    fn test_adjacent_half_open_days_do_not_overlap() {
        let a = DateInterval::closed_open(jan(1), jan(3)).unwrap();
        let b = DateInterval::closed_open(jan(3), jan(5)).unwrap();

        assert!(!a.overlaps(&b));
        assert!(a.intersect(&b).is_empty());
        assert_eq!(a.union(&b).len(), 1);
    }

    #[test]
    fn test_empty() {
        let empty = DateInterval::default();

        assert!(empty.is_empty());
        assert_eq!(empty, DateInterval::empty_at(jan(9)));
        assert_eq!(empty.all_dates_in_range().count(), 0);
        assert_eq!(empty.to_string(), "∅");
    }

    #[test]
    fn test_serde() {
        let r = DateInterval::closed_open(jan(1), jan(4)).unwrap();
        let json = serde_json::to_value(r).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "start": "2025-01-01",
                "finish": "2025-01-04",
                "includes_start": true,
                "includes_finish": false,
            })
        );
        assert_eq!(serde_json::from_value::<DateInterval>(json).unwrap(), r);
        assert!(serde_json::from_str::<DateInterval>(
            r#"{"start": "2025-01-04", "finish": "2025-01-01", "includes_start": true, "includes_finish": true}"#
        )
        .is_err());
    }
}

use std::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    ops::Sub,
};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use smallvec::{smallvec, SmallVec};

use super::IntervalError;
use crate::timepoint::Dates;

/// Pieces produced by [`IntervalRange::union`] and [`IntervalRange::exclude_overlap`].
/// At most two, never empty intervals, in ascending order.
pub type Fragments<T> = SmallVec<[IntervalRange<T>; 2]>;

// -----------------------------------------------------------------------------
// Lower / Upper
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Copy)]
struct Lower<T> {
    at: T,
    incl: bool,
}

#[derive(Debug, Clone, Copy)]
struct Upper<T> {
    at: T,
    incl: bool,
}

impl<T: Ord + Copy> Lower<T> {
    /// `self` starts no later than `other`.
    /// An included bound starts earlier than an excluded one at the same position.
    #[inline]
    fn precedes(&self, other: &Self) -> bool {
        self.at < other.at || (self.at == other.at && (self.incl || !other.incl))
    }

    #[inline]
    fn tighter(self, other: Self) -> Self {
        match self.at.cmp(&other.at) {
            std::cmp::Ordering::Greater => self,
            std::cmp::Ordering::Less => other,
            std::cmp::Ordering::Equal => Self {
                at: self.at,
                incl: self.incl && other.incl,
            },
        }
    }

    #[inline]
    fn looser(self, other: Self) -> Self {
        match self.at.cmp(&other.at) {
            std::cmp::Ordering::Less => self,
            std::cmp::Ordering::Greater => other,
            std::cmp::Ordering::Equal => Self {
                at: self.at,
                incl: self.incl || other.incl,
            },
        }
    }
}

impl<T: Ord + Copy> Upper<T> {
    /// `self` finishes no earlier than `other`.
    #[inline]
    fn exceeds(&self, other: &Self) -> bool {
        self.at > other.at || (self.at == other.at && (self.incl || !other.incl))
    }

    #[inline]
    fn tighter(self, other: Self) -> Self {
        match self.at.cmp(&other.at) {
            std::cmp::Ordering::Less => self,
            std::cmp::Ordering::Greater => other,
            std::cmp::Ordering::Equal => Self {
                at: self.at,
                incl: self.incl && other.incl,
            },
        }
    }

    #[inline]
    fn looser(self, other: Self) -> Self {
        match self.at.cmp(&other.at) {
            std::cmp::Ordering::Greater => self,
            std::cmp::Ordering::Less => other,
            std::cmp::Ordering::Equal => Self {
                at: self.at,
                incl: self.incl || other.incl,
            },
        }
    }
}

// -----------------------------------------------------------------------------
// IntervalRange
// -----------------------------------------------------------------------------
/// A bounded interval with independently included or excluded ends.
///
/// # Overview
/// The interval keeps `start <= finish` and, when both ends coincide,
/// either includes both of them (a single point) or neither of them (the empty interval).
/// Construction fails instead of normalizing anything else.
///
/// ```
/// use dcchrono::IntervalRange;
///
/// let a = IntervalRange::closed_open(0, 5).unwrap();   // [0, 5)
/// let b = IntervalRange::closed(5, 9).unwrap();        // [5, 9]
///
/// assert!(a.contains(0));
/// assert!(!a.contains(5));
/// assert!(!a.overlaps(&b));
///
/// // touching intervals are merged when one side includes the touch point
/// let union = a.union(&b);
/// assert_eq!(union.as_slice(), &[IntervalRange::closed(0, 9).unwrap()]);
///
/// let rest = b.exclude_overlap(&IntervalRange::point(7));
/// assert_eq!(rest.len(), 2);
/// assert_eq!(rest[0].to_string(), "[5, 7)");
/// assert_eq!(rest[1].to_string(), "(7, 9]");
/// ```
///
/// # Empty intervals
/// Every empty interval is equal to every other one, wherever it is anchored.
/// Operations never fail on empty operands: an empty interval contains nothing,
/// overlaps nothing and is contained in everything.
#[derive(Debug, Clone, Copy, Eq, serde::Serialize)]
pub struct IntervalRange<T> {
    start: T,
    finish: T,
    includes_start: bool,
    includes_finish: bool,
}

//
// ser/de
//
impl<'de, T> serde::Deserialize<'de> for IntervalRange<T>
where
    T: serde::Deserialize<'de> + Ord + Copy + Debug,
{
    fn deserialize<D>(deserializer: D) -> Result<IntervalRange<T>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct _Data<T> {
            start: T,
            finish: T,
            includes_start: bool,
            includes_finish: bool,
        }

        let data = <_Data<T> as serde::Deserialize>::deserialize(deserializer)?;
        IntervalRange::new(
            data.start,
            data.finish,
            data.includes_start,
            data.includes_finish,
        )
        .map_err(serde::de::Error::custom)
    }
}

//
// construction
//
impl<T: Ord + Copy> IntervalRange<T> {
    /// Create an interval from its bounds.
    ///
    /// # Errors
    /// * [`IntervalError::FinishBeforeStart`]: `finish < start`
    /// * [`IntervalError::MixedDegenerate`]: `start == finish` and only one end is included
    #[inline]
    pub fn new(
        start: T,
        finish: T,
        includes_start: bool,
        includes_finish: bool,
    ) -> Result<Self, IntervalError<T>> {
        if finish < start {
            return Err(IntervalError::FinishBeforeStart { start, finish });
        }
        if start == finish && includes_start != includes_finish {
            return Err(IntervalError::MixedDegenerate { point: start });
        }
        Ok(Self {
            start,
            finish,
            includes_start,
            includes_finish,
        })
    }

    /// `[start, finish]`
    #[inline]
    pub fn closed(start: T, finish: T) -> Result<Self, IntervalError<T>> {
        Self::new(start, finish, true, true)
    }

    /// `(start, finish)`
    #[inline]
    pub fn open(start: T, finish: T) -> Result<Self, IntervalError<T>> {
        Self::new(start, finish, false, false)
    }

    /// `[start, finish)`
    ///
    /// # Errors
    /// Same as [`IntervalRange::new`]. `start == finish` is a mixed degenerate interval:
    /// use [`IntervalRange::empty_at`] for an empty range.
    #[inline]
    pub fn closed_open(start: T, finish: T) -> Result<Self, IntervalError<T>> {
        Self::new(start, finish, true, false)
    }

    /// `(start, finish]`
    ///
    /// # Errors
    /// Same as [`IntervalRange::closed_open`].
    #[inline]
    pub fn open_closed(start: T, finish: T) -> Result<Self, IntervalError<T>> {
        Self::new(start, finish, false, true)
    }

    /// `[point, point]`
    #[inline]
    pub fn point(point: T) -> Self {
        Self {
            start: point,
            finish: point,
            includes_start: true,
            includes_finish: true,
        }
    }

    /// `(anchor, anchor)`, which contains nothing.
    #[inline]
    pub fn empty_at(anchor: T) -> Self {
        Self {
            start: anchor,
            finish: anchor,
            includes_start: false,
            includes_finish: false,
        }
    }

    #[inline]
    fn lower(&self) -> Lower<T> {
        Lower {
            at: self.start,
            incl: self.includes_start,
        }
    }

    #[inline]
    fn upper(&self) -> Upper<T> {
        Upper {
            at: self.finish,
            incl: self.includes_finish,
        }
    }

    /// Rebuild from bounds produced by the operations below.
    /// Crossing or half-included coinciding bounds collapse to the empty interval.
    #[inline]
    fn from_bounds(lower: Lower<T>, upper: Upper<T>) -> Self {
        if upper.at < lower.at || (lower.at == upper.at && !(lower.incl && upper.incl)) {
            return Self::empty_at(upper.at.min(lower.at));
        }
        Self {
            start: lower.at,
            finish: upper.at,
            includes_start: lower.incl,
            includes_finish: upper.incl,
        }
    }
}

impl<T: Ord + Copy + Default> Default for IntervalRange<T> {
    #[inline]
    fn default() -> Self {
        Self::empty_at(T::default())
    }
}

//
// display, eq, hash
//
impl<T: Display + PartialEq> Display for IntervalRange<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_degenerate_empty() {
            return write!(f, "∅");
        }
        write!(
            f,
            "{}{}, {}{}",
            if self.includes_start { '[' } else { '(' },
            self.start,
            self.finish,
            if self.includes_finish { ']' } else { ')' },
        )
    }
}

impl<T: PartialEq> PartialEq for IntervalRange<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self.is_degenerate_empty(), other.is_degenerate_empty()) {
            (true, true) => true,
            (false, false) => {
                self.start == other.start
                    && self.finish == other.finish
                    && self.includes_start == other.includes_start
                    && self.includes_finish == other.includes_finish
            }
            _ => false,
        }
    }
}

impl<T: Hash + PartialEq> Hash for IntervalRange<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_degenerate_empty() {
            0u8.hash(state);
            return;
        }
        1u8.hash(state);
        self.start.hash(state);
        self.finish.hash(state);
        self.includes_start.hash(state);
        self.includes_finish.hash(state);
    }
}

impl<T: PartialEq> IntervalRange<T> {
    #[inline]
    fn is_degenerate_empty(&self) -> bool {
        self.start == self.finish && !self.includes_start && !self.includes_finish
    }
}

//
// accessors
//
impl<T: Copy> IntervalRange<T> {
    #[inline]
    pub fn start(&self) -> T {
        self.start
    }

    #[inline]
    pub fn finish(&self) -> T {
        self.finish
    }

    #[inline]
    pub fn includes_start(&self) -> bool {
        self.includes_start
    }

    #[inline]
    pub fn includes_finish(&self) -> bool {
        self.includes_finish
    }

    /// Both ends are included. A single point is closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.includes_start && self.includes_finish
    }

    /// Neither end is included. The empty interval is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        !self.includes_start && !self.includes_finish
    }

    #[inline]
    pub fn is_half_open(&self) -> bool {
        self.includes_start != self.includes_finish
    }
}

impl<T, D> IntervalRange<T>
where
    T: Copy + Sub<Output = D>,
{
    /// `finish - start`. Zero for single points and empty intervals.
    #[inline]
    pub fn offset(&self) -> D {
        self.finish - self.start
    }
}

//
// methods
//
impl<T: Ord + Copy> IntervalRange<T> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_degenerate_empty()
    }

    #[inline]
    pub fn contains(&self, point: T) -> bool {
        (self.start < point && point < self.finish)
            || (point == self.start && self.includes_start)
            || (point == self.finish && self.includes_finish)
    }

    /// Whether every point of `other` belongs to `self`.
    ///
    /// At a coinciding bound, `self` must include it whenever `other` does.
    /// The empty interval is contained in every interval, including the empty one.
    #[inline]
    pub fn contains_interval(&self, other: &Self) -> bool {
        if other.is_empty() {
            return true;
        }
        if self.is_empty() {
            return false;
        }
        self.lower().precedes(&other.lower()) && self.upper().exceeds(&other.upper())
    }

    /// Whether the two intervals share at least one point.
    ///
    /// A shared boundary counts only if both sides include it,
    /// so `[0, 5)` and `[5, 9]` do not overlap while `[0, 5]` and `[5, 9]` do.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// The largest interval contained in both.
    ///
    /// The result is the empty interval when they do not overlap.
    ///
    /// ```
    /// use dcchrono::IntervalRange;
    ///
    /// let a = IntervalRange::closed(0, 5).unwrap();
    /// let b = IntervalRange::open(3, 9).unwrap();
    ///
    /// assert_eq!(a.intersect(&b), IntervalRange::open_closed(3, 5).unwrap());
    /// assert!(a.intersect(&IntervalRange::open(5, 9).unwrap()).is_empty());
    /// ```
    #[inline]
    pub fn intersect(&self, other: &Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::empty_at(self.start.min(other.start));
        }
        Self::from_bounds(
            self.lower().tighter(other.lower()),
            self.upper().tighter(other.upper()),
        )
    }

    /// Points belonging to either interval.
    ///
    /// A single interval is returned when they overlap or touch at a point
    /// included by at least one side. Otherwise both are returned, lower first.
    #[inline]
    pub fn union(&self, other: &Self) -> Fragments<T> {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => return SmallVec::new(),
            (true, false) => return smallvec![*other],
            (false, true) => return smallvec![*self],
            (false, false) => {}
        }
        let (lo, hi) = if self.lower().precedes(&other.lower()) {
            (self, other)
        } else {
            (other, self)
        };
        let connected = lo.finish > hi.start
            || (lo.finish == hi.start && (lo.includes_finish || hi.includes_start));
        if !connected {
            return smallvec![*lo, *hi];
        }
        smallvec![Self::from_bounds(
            lo.lower().looser(hi.lower()),
            lo.upper().looser(hi.upper()),
        )]
    }

    /// Parts of `self` not covered by `other`, in ascending order.
    ///
    /// A fragment's bound coinciding with a bound of `other` is included
    /// only if `self` included it and `other` did not.
    ///
    /// ```
    /// use dcchrono::IntervalRange;
    ///
    /// let a = IntervalRange::closed(0, 9).unwrap();
    ///
    /// let rest = a.exclude_overlap(&IntervalRange::closed(3, 5).unwrap());
    /// assert_eq!(rest.as_slice(), &[
    ///     IntervalRange::closed_open(0, 3).unwrap(),
    ///     IntervalRange::open_closed(5, 9).unwrap(),
    /// ]);
    ///
    /// assert!(a.exclude_overlap(&a).is_empty());
    /// ```
    #[inline]
    pub fn exclude_overlap(&self, other: &Self) -> Fragments<T> {
        if self.is_empty() {
            return SmallVec::new();
        }
        if other.is_empty() {
            return smallvec![*self];
        }
        let left = Self::from_bounds(
            self.lower(),
            self.upper().tighter(Upper {
                at: other.start,
                incl: !other.includes_start,
            }),
        );
        let right = Self::from_bounds(
            self.lower().tighter(Lower {
                at: other.finish,
                incl: !other.includes_finish,
            }),
            self.upper(),
        );
        [left, right].into_iter().filter(|r| !r.is_empty()).collect()
    }
}

// -----------------------------------------------------------------------------
// IntervalRange<NaiveDateTime>
// -----------------------------------------------------------------------------
impl IntervalRange<NaiveDateTime> {
    /// The first and last calendar day touched by the range.
    ///
    /// A partially covered boundary day is counted when the corresponding flag is set.
    /// Otherwise it is counted only when the boundary is an included midnight.
    fn touched_days(
        &self,
        count_partial_start: bool,
        count_partial_finish: bool,
    ) -> Option<(NaiveDate, NaiveDate)> {
        if self.is_empty() {
            return None;
        }
        let start_day = self.start.date();
        let first = if count_partial_start
            || (self.includes_start && self.start.time() == NaiveTime::MIN)
        {
            start_day
        } else {
            start_day.succ_opt()?
        };
        let finish_day = self.finish.date();
        let last = if count_partial_finish
            || (self.includes_finish && self.finish.time() == NaiveTime::MIN)
        {
            finish_day
        } else {
            finish_day.pred_opt()?
        };
        (first <= last).then_some((first, last))
    }

    /// Whether the calendar day is touched by the range.
    /// See [`IntervalRange::dates`] for the treatment of boundary days.
    #[inline]
    pub fn contains_date(
        &self,
        date: NaiveDate,
        count_partial_start: bool,
        count_partial_finish: bool,
    ) -> bool {
        self.touched_days(count_partial_start, count_partial_finish)
            .map_or(false, |(first, last)| first <= date && date <= last)
    }

    /// Calendar days touched by the range, in ascending order.
    ///
    /// With `count_partial_start = false` the day of `start` is listed only
    /// when `start` is an included midnight, and likewise for `finish`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use dcchrono::IntervalRange;
    ///
    /// let at = |d: u32, h: u32| {
    ///     NaiveDate::from_ymd_opt(2025, 1, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    /// };
    ///
    /// let range = IntervalRange::closed_open(at(1, 10), at(4, 0)).unwrap();
    ///
    /// assert_eq!(range.dates(true, true).count(), 4);   // 1st to 4th
    /// assert_eq!(range.dates(false, false).count(), 2); // 2nd and 3rd
    /// ```
    #[inline]
    pub fn dates(&self, count_partial_start: bool, count_partial_finish: bool) -> Dates {
        match self.touched_days(count_partial_start, count_partial_finish) {
            Some((first, last)) => Dates::new(first, last),
            None => Dates::empty(),
        }
    }
}

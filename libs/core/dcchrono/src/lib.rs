pub mod interval;
pub mod timepoint;

pub use interval::{DateInterval, Fragments, IntervalError, IntervalRange};
pub use timepoint::{DateProvider, Dates, FixedDateProvider, SystemDateProvider};

#[cfg(test)]
use rstest_reuse;

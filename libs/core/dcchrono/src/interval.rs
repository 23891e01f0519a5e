mod date_interval;
mod error;
mod range;

pub use date_interval::DateInterval;
pub use error::IntervalError;
pub use range::{Fragments, IntervalRange};

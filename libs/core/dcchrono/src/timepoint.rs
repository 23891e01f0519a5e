mod date;
mod provider;

pub use date::{add_days, days_from_sunday, floor_to_date, midnight, preceding_sunday, Dates};
pub use provider::{DateProvider, FixedDateProvider, SystemDateProvider};

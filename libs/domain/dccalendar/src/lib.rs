pub mod entry;
pub mod error;
pub mod holiday;
pub mod month;
pub mod observer;
pub mod schedule;
pub mod settings;
pub mod week;

pub use entry::{CalendarEntry, EntryMark};
pub use error::{CalendarError, ErrorKind};
pub use holiday::{EntrySource, HolidayRunDetector, HolidayRunInfo};
pub use month::{MonthBounds, MonthGrid, MonthProperty};
pub use observer::{MonthObserver, ObserverId, WeekObserver};
pub use schedule::{apply_schedule, DisplayType, EventTime, ScheduleEvent, ScheduleSource};
pub use settings::CalendarSettings;
pub use week::WeekGrid;

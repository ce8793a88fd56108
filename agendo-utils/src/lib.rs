mod day_of_week;
pub mod slot;
mod time_range;

pub use day_of_week::{AgendoUtilsError, DayOfWeek};
pub use time_range::TimeRange;

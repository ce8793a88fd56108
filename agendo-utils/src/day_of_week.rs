use std::fmt::{Display, Formatter};
use thiserror::*;

use time::Weekday;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgendoUtilsError {
    #[error("Invalid day of week number: {0}")]
    InvalidDayOfWeek(u8),
}

/// Weekday as stored in working hours and break times.
///
/// Numbered 0 to 6 starting with Sunday.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sunday => Self::Sunday,
            Weekday::Monday => Self::Monday,
            Weekday::Tuesday => Self::Tuesday,
            Weekday::Wednesday => Self::Wednesday,
            Weekday::Thursday => Self::Thursday,
            Weekday::Friday => Self::Friday,
            Weekday::Saturday => Self::Saturday,
        }
    }
}
impl From<DayOfWeek> for Weekday {
    fn from(day_of_week: DayOfWeek) -> Self {
        match day_of_week {
            DayOfWeek::Sunday => Self::Sunday,
            DayOfWeek::Monday => Self::Monday,
            DayOfWeek::Tuesday => Self::Tuesday,
            DayOfWeek::Wednesday => Self::Wednesday,
            DayOfWeek::Thursday => Self::Thursday,
            DayOfWeek::Friday => Self::Friday,
            DayOfWeek::Saturday => Self::Saturday,
        }
    }
}
impl From<time::Date> for DayOfWeek {
    fn from(date: time::Date) -> Self {
        date.weekday().into()
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = AgendoUtilsError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::from_number(number).ok_or(AgendoUtilsError::InvalidDayOfWeek(number))
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DayOfWeek::Sunday => "Sunday",
                DayOfWeek::Monday => "Monday",
                DayOfWeek::Tuesday => "Tuesday",
                DayOfWeek::Wednesday => "Wednesday",
                DayOfWeek::Thursday => "Thursday",
                DayOfWeek::Friday => "Friday",
                DayOfWeek::Saturday => "Saturday",
            }
        )
    }
}

impl DayOfWeek {
    pub fn to_number(&self) -> u8 {
        match self {
            DayOfWeek::Sunday => 0,
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            0 => Some(DayOfWeek::Sunday),
            1 => Some(DayOfWeek::Monday),
            2 => Some(DayOfWeek::Tuesday),
            3 => Some(DayOfWeek::Wednesday),
            4 => Some(DayOfWeek::Thursday),
            5 => Some(DayOfWeek::Friday),
            6 => Some(DayOfWeek::Saturday),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_numbering_starts_on_sunday() {
        assert_eq!(DayOfWeek::Sunday.to_number(), 0);
        assert_eq!(DayOfWeek::Saturday.to_number(), 6);
        for number in 0..7 {
            assert_eq!(
                DayOfWeek::from_number(number).map(|day| day.to_number()),
                Some(number)
            );
        }
    }

    #[test]
    fn test_invalid_number() {
        assert_eq!(
            DayOfWeek::try_from(7),
            Err(AgendoUtilsError::InvalidDayOfWeek(7))
        );
    }

    #[test]
    fn test_from_date() {
        // 2024-01-15 was a Monday
        assert_eq!(DayOfWeek::from(date!(2024 - 01 - 15)), DayOfWeek::Monday);
        assert_eq!(DayOfWeek::from(date!(2024 - 01 - 14)), DayOfWeek::Sunday);
    }
}

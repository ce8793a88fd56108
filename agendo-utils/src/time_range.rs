use std::fmt::{Display, Formatter};

use time::{Date, Duration, PrimitiveDateTime, Time};

/// Half-open interval `[start, end)`.
///
/// Two ranges touching at a boundary do not overlap, so an appointment ending at
/// 10:30 never collides with one starting at 10:30. Every overlap decision of the
/// engine goes through [`TimeRange::overlaps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeRange {
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
}

impl TimeRange {
    pub const fn new(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn starting_at(start: PrimitiveDateTime, duration: Duration) -> Self {
        Self::new(start, start + duration)
    }

    /// Range of two times of day on the given date.
    pub fn on_date(date: Date, from: Time, to: Time) -> Self {
        Self::new(PrimitiveDateTime::new(date, from), PrimitiveDateTime::new(date, to))
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn overlaps_any<'a>(&self, others: impl IntoIterator<Item = &'a TimeRange>) -> bool {
        others.into_iter().any(|other| self.overlaps(other))
    }

    /// Inclusive at the start, exclusive at the end.
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Common part of both ranges, `None` when they do not overlap.
    pub fn intersection(&self, other: &TimeRange) -> Option<TimeRange> {
        if self.overlaps(other) {
            Some(TimeRange::new(
                self.start.max(other.start),
                self.end.min(other.end),
            ))
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn duration(&self) -> Duration {
        if self.is_empty() {
            Duration::ZERO
        } else {
            self.end - self.start
        }
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

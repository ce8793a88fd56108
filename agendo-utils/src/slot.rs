//! Enumeration of bookable start times for one professional on one day.

use time::{Duration, PrimitiveDateTime};

use crate::TimeRange;

/// Everything the slot scan needs for a single professional and day.
///
/// `breaks` and `busy` are usually loaded once per branch and day and shared
/// between the professionals of the branch.
#[derive(Debug, Clone)]
pub struct SlotQuery<'a> {
    pub working_window: TimeRange,
    pub duration: Duration,
    pub granularity: Duration,
    pub breaks: &'a [TimeRange],
    pub busy: &'a [TimeRange],
    pub not_before: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotScan {
    pub slots: Vec<TimeRange>,
    /// Number of start times which fit into the working window, bookable or not.
    pub candidates: usize,
}

/// Walk the working window in `granularity` steps and keep every candidate
/// `[t, t + duration)` that fits into the window and overlaps neither a break nor
/// a busy interval.
///
/// The step does not depend on whether a candidate was accepted, so the grid is
/// never shifted by a rejected candidate.
pub fn generate_slots(query: &SlotQuery) -> SlotScan {
    let mut scan = SlotScan::default();
    if query.duration <= Duration::ZERO || query.granularity <= Duration::ZERO {
        return scan;
    }

    let mut start = query.working_window.start;
    loop {
        let candidate = TimeRange::starting_at(start, query.duration);
        if candidate.end > query.working_window.end {
            break;
        }
        scan.candidates += 1;

        let in_past = query.not_before.is_some_and(|not_before| start < not_before);
        if !in_past && !candidate.overlaps_any(query.breaks) && !candidate.overlaps_any(query.busy)
        {
            scan.slots.push(candidate);
        }
        start += query.granularity;
    }
    scan
}

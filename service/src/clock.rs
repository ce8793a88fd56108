use mockall::automock;
use time::PrimitiveDateTime;

/// Source of the current instant in UTC. Branch wall clock time is derived
/// from it with the branch timezone.
#[automock]
pub trait ClockService {
    fn date_time_now(&self) -> PrimitiveDateTime;
}

use std::sync::Arc;

use agendo_utils::TimeRange;
use async_trait::async_trait;
use mockall::automock;
use time::Date;
use uuid::Uuid;

use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub business_id: Uuid,
    pub branch_id: Uuid,
    pub date: Date,
    pub offering_id: Uuid,
    /// Restricts the result to one professional.
    pub professional_id: Option<Uuid>,
}

/// How scarce the remaining slots of a day are.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Urgency {
    /// At most 20 % of the candidate start times are still bookable.
    High,
    /// At most 50 %.
    Medium,
    Low,
}

impl Urgency {
    pub fn from_ratio(available: usize, total: usize) -> Self {
        // available / total <= 1 / 5  <=>  available * 5 <= total
        if total == 0 || available * 5 <= total {
            Urgency::High
        } else if available * 2 <= total {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::High => "HIGH",
            Urgency::Medium => "MEDIUM",
            Urgency::Low => "LOW",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occupancy {
    /// Start times that fit into the working window.
    pub total_candidates: usize,
    pub available_slots: usize,
    /// Minutes of the working window covered by active appointments.
    pub booked_minutes: u32,
    /// Minutes of the working window not covered by breaks.
    pub working_minutes: u32,
    /// `booked_minutes / working_minutes`, rounded down.
    pub occupancy_percent: u8,
    pub urgency: Urgency,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfessionalAvailability {
    pub professional_id: Uuid,
    pub professional_name: Arc<str>,
    pub working_window: TimeRange,
    pub slots: Arc<[TimeRange]>,
    pub occupancy: Occupancy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Availability {
    pub branch_id: Uuid,
    pub date: Date,
    pub offering_id: Uuid,
    pub duration_minutes: u16,
    pub granularity_minutes: u16,
    pub professionals: Arc<[ProfessionalAvailability]>,
}

#[automock(type Transaction = dao::MockTransaction;)]
#[async_trait]
pub trait AvailabilityService {
    type Transaction: dao::Transaction;

    /// Free slots per professional. Read only; professionals who do not work
    /// on that weekday are left out.
    async fn get_available_slots(
        &self,
        query: &AvailabilityQuery,
        tx: Option<Self::Transaction>,
    ) -> Result<Availability, ServiceError>;
}

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime, Time};
use utoipa::ToSchema;
use uuid::Uuid;

time::serde::format_description!(
    iso_date_time,
    PrimitiveDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second]"
);
time::serde::format_description!(time_of_day, Time, "[hour]:[minute]");

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub enum DayOfWeekTO {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}
#[cfg(feature = "service-impl")]
impl From<service::DayOfWeek> for DayOfWeekTO {
    fn from(day_of_week: service::DayOfWeek) -> Self {
        match day_of_week {
            service::DayOfWeek::Sunday => Self::Sunday,
            service::DayOfWeek::Monday => Self::Monday,
            service::DayOfWeek::Tuesday => Self::Tuesday,
            service::DayOfWeek::Wednesday => Self::Wednesday,
            service::DayOfWeek::Thursday => Self::Thursday,
            service::DayOfWeek::Friday => Self::Friday,
            service::DayOfWeek::Saturday => Self::Saturday,
        }
    }
}
#[cfg(feature = "service-impl")]
impl From<DayOfWeekTO> for service::DayOfWeek {
    fn from(day_of_week: DayOfWeekTO) -> Self {
        match day_of_week {
            DayOfWeekTO::Sunday => Self::Sunday,
            DayOfWeekTO::Monday => Self::Monday,
            DayOfWeekTO::Tuesday => Self::Tuesday,
            DayOfWeekTO::Wednesday => Self::Wednesday,
            DayOfWeekTO::Thursday => Self::Thursday,
            DayOfWeekTO::Friday => Self::Friday,
            DayOfWeekTO::Saturday => Self::Saturday,
        }
    }
}

/// Half open time range in branch local time.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, ToSchema)]
pub struct SlotTO {
    #[serde(with = "iso_date_time")]
    pub start: PrimitiveDateTime,
    #[serde(with = "iso_date_time")]
    pub end: PrimitiveDateTime,
}
#[cfg(feature = "service-impl")]
impl From<&service::TimeRange> for SlotTO {
    fn from(range: &service::TimeRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyTO {
    High,
    Medium,
    Low,
}
#[cfg(feature = "service-impl")]
impl From<service::availability::Urgency> for UrgencyTO {
    fn from(urgency: service::availability::Urgency) -> Self {
        match urgency {
            service::availability::Urgency::High => Self::High,
            service::availability::Urgency::Medium => Self::Medium,
            service::availability::Urgency::Low => Self::Low,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, ToSchema)]
pub struct OccupancyTO {
    pub total_candidates: usize,
    pub available_slots: usize,
    pub booked_minutes: u32,
    pub working_minutes: u32,
    pub occupancy_percent: u8,
    pub urgency: UrgencyTO,
}
#[cfg(feature = "service-impl")]
impl From<&service::availability::Occupancy> for OccupancyTO {
    fn from(occupancy: &service::availability::Occupancy) -> Self {
        Self {
            total_candidates: occupancy.total_candidates,
            available_slots: occupancy.available_slots,
            booked_minutes: occupancy.booked_minutes,
            working_minutes: occupancy.working_minutes,
            occupancy_percent: occupancy.occupancy_percent,
            urgency: occupancy.urgency.into(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfessionalAvailabilityTO {
    pub professional_id: Uuid,
    pub professional_name: Arc<str>,
    pub working_window: SlotTO,
    pub slots: Vec<SlotTO>,
    pub occupancy: OccupancyTO,
}
#[cfg(feature = "service-impl")]
impl From<&service::availability::ProfessionalAvailability> for ProfessionalAvailabilityTO {
    fn from(availability: &service::availability::ProfessionalAvailability) -> Self {
        Self {
            professional_id: availability.professional_id,
            professional_name: availability.professional_name.clone(),
            working_window: (&availability.working_window).into(),
            slots: availability.slots.iter().map(SlotTO::from).collect(),
            occupancy: (&availability.occupancy).into(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityTO {
    pub branch_id: Uuid,
    pub date: Date,
    pub offering_id: Uuid,
    pub duration_minutes: u16,
    pub granularity_minutes: u16,
    pub professionals: Vec<ProfessionalAvailabilityTO>,
}
#[cfg(feature = "service-impl")]
impl From<&service::availability::Availability> for AvailabilityTO {
    fn from(availability: &service::availability::Availability) -> Self {
        Self {
            branch_id: availability.branch_id,
            date: availability.date,
            offering_id: availability.offering_id,
            duration_minutes: availability.duration_minutes,
            granularity_minutes: availability.granularity_minutes,
            professionals: availability
                .professionals
                .iter()
                .map(ProfessionalAvailabilityTO::from)
                .collect(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatusTO {
    PendingPayment,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}
#[cfg(feature = "service-impl")]
impl From<service::appointment::AppointmentStatus> for AppointmentStatusTO {
    fn from(status: service::appointment::AppointmentStatus) -> Self {
        match status {
            service::appointment::AppointmentStatus::PendingPayment => Self::PendingPayment,
            service::appointment::AppointmentStatus::Confirmed => Self::Confirmed,
            service::appointment::AppointmentStatus::Cancelled => Self::Cancelled,
            service::appointment::AppointmentStatus::Completed => Self::Completed,
            service::appointment::AppointmentStatus::NoShow => Self::NoShow,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethodTO {
    #[default]
    Local,
    Online,
}
#[cfg(feature = "service-impl")]
impl From<service::appointment::PaymentMethod> for PaymentMethodTO {
    fn from(payment_method: service::appointment::PaymentMethod) -> Self {
        match payment_method {
            service::appointment::PaymentMethod::Local => Self::Local,
            service::appointment::PaymentMethod::Online => Self::Online,
        }
    }
}
#[cfg(feature = "service-impl")]
impl From<PaymentMethodTO> for service::appointment::PaymentMethod {
    fn from(payment_method: PaymentMethodTO) -> Self {
        match payment_method {
            PaymentMethodTO::Local => Self::Local,
            PaymentMethodTO::Online => Self::Online,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct AppointmentTO {
    pub id: Uuid,
    pub business_id: Uuid,
    pub branch_id: Uuid,
    pub client_id: Uuid,
    pub offering_id: Uuid,
    pub professional_id: Option<Uuid>,
    #[serde(with = "iso_date_time")]
    pub start_time: PrimitiveDateTime,
    #[serde(with = "iso_date_time")]
    pub end_time: PrimitiveDateTime,
    pub status: AppointmentStatusTO,
    pub payment_method: PaymentMethodTO,
    pub price_cents: i64,
    pub notes: Option<Arc<str>>,
    pub checkout_handle: Option<Arc<str>>,
    pub cancellation_reason: Option<Arc<str>>,
    #[serde(default, with = "iso_date_time::option")]
    pub created: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&service::appointment::Appointment> for AppointmentTO {
    fn from(appointment: &service::appointment::Appointment) -> Self {
        Self {
            id: appointment.id,
            business_id: appointment.business_id,
            branch_id: appointment.branch_id,
            client_id: appointment.client_id,
            offering_id: appointment.offering_id,
            professional_id: appointment.professional_id,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            status: appointment.status.into(),
            payment_method: appointment.payment_method.into(),
            price_cents: appointment.price_cents,
            notes: appointment.notes.clone(),
            checkout_handle: appointment.checkout_handle.clone(),
            cancellation_reason: appointment.cancellation_reason.clone(),
            created: appointment.created,
            version: appointment.version,
        }
    }
}

/// Contact data used to find or register the client of a booking.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct ClientTO {
    #[serde(default)]
    pub name: Arc<str>,
    #[serde(default)]
    pub email: Option<Arc<str>>,
    #[serde(default)]
    pub phone: Option<Arc<str>>,
}
#[cfg(feature = "service-impl")]
impl From<&ClientTO> for service::client::ClientIdentity {
    fn from(client: &ClientTO) -> Self {
        Self {
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct CreateAppointmentTO {
    pub business_id: Uuid,
    #[serde(default)]
    pub branch_id: Option<Uuid>,
    pub offering_id: Uuid,
    #[serde(default)]
    pub professional_id: Option<Uuid>,
    pub client: ClientTO,
    #[serde(with = "iso_date_time")]
    pub start_time: PrimitiveDateTime,
    #[serde(default)]
    pub notes: Option<Arc<str>>,
    #[serde(default)]
    pub payment_method: PaymentMethodTO,
    #[serde(default)]
    pub acknowledge_payment_risk: bool,
}
#[cfg(feature = "service-impl")]
impl From<&CreateAppointmentTO> for service::booking::CreateAppointmentRequest {
    fn from(request: &CreateAppointmentTO) -> Self {
        Self {
            business_id: request.business_id,
            branch_id: request.branch_id,
            offering_id: request.offering_id,
            professional_id: request.professional_id,
            client: (&request.client).into(),
            start_time: request.start_time,
            notes: request.notes.clone(),
            payment_method: request.payment_method.into(),
            acknowledge_payment_risk: request.acknowledge_payment_risk,
        }
    }
}

/// Missing fields keep their current value.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, ToSchema)]
pub struct AppointmentPatchTO {
    #[serde(default, with = "iso_date_time::option")]
    pub start_time: Option<PrimitiveDateTime>,
    #[serde(default)]
    pub offering_id: Option<Uuid>,
    #[serde(default)]
    pub professional_id: Option<Uuid>,
    #[serde(default)]
    pub notes: Option<Arc<str>>,
}
#[cfg(feature = "service-impl")]
impl From<&AppointmentPatchTO> for service::booking::AppointmentPatch {
    fn from(patch: &AppointmentPatchTO) -> Self {
        Self {
            start_time: patch.start_time,
            offering_id: patch.offering_id,
            professional_id: patch.professional_id,
            notes: patch.notes.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct CheckoutTO {
    pub checkout_handle: Arc<str>,
    pub redirect_url: Arc<str>,
}
#[cfg(feature = "service-impl")]
impl From<&service::payment_gateway::Checkout> for CheckoutTO {
    fn from(checkout: &service::payment_gateway::Checkout) -> Self {
        Self {
            checkout_handle: checkout.checkout_handle.clone(),
            redirect_url: checkout.redirect_url.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct BookingWarningTO {
    pub kind: Arc<str>,
    pub message: Arc<str>,
}
#[cfg(feature = "service-impl")]
impl From<&service::booking::BookingWarning> for BookingWarningTO {
    fn from(warning: &service::booking::BookingWarning) -> Self {
        match warning {
            service::booking::BookingWarning::PaymentValidationUnavailable(message) => Self {
                kind: "PAYMENT_VALIDATION_UNAVAILABLE".into(),
                message: message.clone(),
            },
            service::booking::BookingWarning::NotificationNotPublished(message) => Self {
                kind: "NOTIFICATION_NOT_PUBLISHED".into(),
                message: message.clone(),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct BookingOutcomeTO {
    pub appointment: AppointmentTO,
    pub checkout: Option<CheckoutTO>,
    pub warnings: Vec<BookingWarningTO>,
}
#[cfg(feature = "service-impl")]
impl From<&service::booking::BookingOutcome> for BookingOutcomeTO {
    fn from(outcome: &service::booking::BookingOutcome) -> Self {
        Self {
            appointment: (&outcome.appointment).into(),
            checkout: outcome.checkout.as_ref().map(CheckoutTO::from),
            warnings: outcome.warnings.iter().map(BookingWarningTO::from).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct BranchTO {
    #[serde(default)]
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: Arc<str>,
    pub timezone: Arc<str>,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default, with = "iso_date_time::option")]
    pub created: Option<PrimitiveDateTime>,
    #[serde(default, with = "iso_date_time::option")]
    pub deleted: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&service::branch::Branch> for BranchTO {
    fn from(branch: &service::branch::Branch) -> Self {
        Self {
            id: branch.id,
            business_id: branch.business_id,
            name: branch.name.clone(),
            timezone: branch.timezone.clone(),
            is_main: branch.is_main,
            active: branch.active,
            created: branch.created,
            deleted: branch.deleted,
            version: branch.version,
        }
    }
}
#[cfg(feature = "service-impl")]
impl From<&BranchTO> for service::branch::Branch {
    fn from(branch: &BranchTO) -> Self {
        Self {
            id: branch.id,
            business_id: branch.business_id,
            name: branch.name.clone(),
            timezone: branch.timezone.clone(),
            is_main: branch.is_main,
            active: branch.active,
            created: branch.created,
            deleted: branch.deleted,
            version: branch.version,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct WorkingHoursTO {
    #[serde(default)]
    pub id: Uuid,
    pub professional_id: Uuid,
    pub day_of_week: DayOfWeekTO,
    #[serde(with = "time_of_day")]
    #[schema(value_type = String, example = "09:00")]
    pub from: Time,
    #[serde(with = "time_of_day")]
    #[schema(value_type = String, example = "17:00")]
    pub to: Time,
    #[serde(default)]
    pub active: bool,
    #[serde(default, with = "iso_date_time::option")]
    pub created: Option<PrimitiveDateTime>,
    #[serde(default, with = "iso_date_time::option")]
    pub deleted: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&service::working_hours::WorkingHours> for WorkingHoursTO {
    fn from(working_hours: &service::working_hours::WorkingHours) -> Self {
        Self {
            id: working_hours.id,
            professional_id: working_hours.professional_id,
            day_of_week: working_hours.day_of_week.into(),
            from: working_hours.from,
            to: working_hours.to,
            active: working_hours.active,
            created: working_hours.created,
            deleted: working_hours.deleted,
            version: working_hours.version,
        }
    }
}
#[cfg(feature = "service-impl")]
impl From<&WorkingHoursTO> for service::working_hours::WorkingHours {
    fn from(working_hours: &WorkingHoursTO) -> Self {
        Self {
            id: working_hours.id,
            professional_id: working_hours.professional_id,
            day_of_week: working_hours.day_of_week.into(),
            from: working_hours.from,
            to: working_hours.to,
            active: working_hours.active,
            created: working_hours.created,
            deleted: working_hours.deleted,
            version: working_hours.version,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct BreakTimeTO {
    #[serde(default)]
    pub id: Uuid,
    pub branch_id: Uuid,
    pub day_of_week: DayOfWeekTO,
    #[serde(with = "time_of_day")]
    #[schema(value_type = String, example = "12:00")]
    pub from: Time,
    #[serde(with = "time_of_day")]
    #[schema(value_type = String, example = "12:30")]
    pub to: Time,
    #[serde(default)]
    pub label: Arc<str>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, with = "iso_date_time::option")]
    pub created: Option<PrimitiveDateTime>,
    #[serde(default, with = "iso_date_time::option")]
    pub deleted: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&service::break_time::BreakTime> for BreakTimeTO {
    fn from(break_time: &service::break_time::BreakTime) -> Self {
        Self {
            id: break_time.id,
            branch_id: break_time.branch_id,
            day_of_week: break_time.day_of_week.into(),
            from: break_time.from,
            to: break_time.to,
            label: break_time.label.clone(),
            active: break_time.active,
            created: break_time.created,
            deleted: break_time.deleted,
            version: break_time.version,
        }
    }
}
#[cfg(feature = "service-impl")]
impl From<&BreakTimeTO> for service::break_time::BreakTime {
    fn from(break_time: &BreakTimeTO) -> Self {
        Self {
            id: break_time.id,
            branch_id: break_time.branch_id,
            day_of_week: break_time.day_of_week.into(),
            from: break_time.from,
            to: break_time.to,
            label: break_time.label.clone(),
            active: break_time.active,
            created: break_time.created,
            deleted: break_time.deleted,
            version: break_time.version,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct ScoringSummaryTO {
    pub score: i32,
    pub no_show_count: u32,
    pub reason: Arc<str>,
}
#[cfg(feature = "service-impl")]
impl From<&service::payment_validation::ScoringSummary> for ScoringSummaryTO {
    fn from(scoring: &service::payment_validation::ScoringSummary) -> Self {
        Self {
            score: scoring.score,
            no_show_count: scoring.no_show_count,
            reason: scoring.reason.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailureTO {
    ModificationNotAllowed(Arc<str>),
    InvalidValue(Arc<str>),
}
#[cfg(feature = "service-impl")]
impl From<&service::ValidationFailureItem> for ValidationFailureTO {
    fn from(item: &service::ValidationFailureItem) -> Self {
        match item {
            service::ValidationFailureItem::ModificationNotAllowed(field) => {
                Self::ModificationNotAllowed(field.clone())
            }
            service::ValidationFailureItem::InvalidValue(field) => Self::InvalidValue(field.clone()),
        }
    }
}

/// Machine readable context of an [`ErrorTO`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDetailsTO {
    Entity(Uuid),
    Validation(Vec<ValidationFailureTO>),
    Slot(SlotTO),
    Scoring(ScoringSummaryTO),
}

/// Body of every failed request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct ErrorTO {
    pub kind: Arc<str>,
    pub message: Arc<str>,
    pub details: Option<ErrorDetailsTO>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, time};

    #[test]
    fn test_create_appointment_defaults() {
        let request: CreateAppointmentTO = serde_json::from_str(
            r#"{
                "business_id": "8b6a0f2c-25f5-4e43-9c38-6a1b6f7e6f10",
                "offering_id": "5f8ee0a7-5d5b-4a24-b0a4-2c0c9a0f3b21",
                "client": { "name": "Jo", "email": "jo@example.com" },
                "start_time": "2024-01-15T10:30:00"
            }"#,
        )
        .unwrap();
        assert_eq!(request.start_time, datetime!(2024-01-15 10:30));
        assert_eq!(request.branch_id, None);
        assert_eq!(request.professional_id, None);
        assert_eq!(request.payment_method, PaymentMethodTO::Local);
        assert!(!request.acknowledge_payment_risk);
        assert_eq!(request.client.phone, None);
    }

    #[test]
    fn test_slot_is_written_as_iso_date_time() {
        let slot = SlotTO {
            start: datetime!(2024-01-15 09:00),
            end: datetime!(2024-01-15 09:30),
        };
        assert_eq!(
            serde_json::to_string(&slot).unwrap(),
            r#"{"start":"2024-01-15T09:00:00","end":"2024-01-15T09:30:00"}"#
        );
    }

    #[test]
    fn test_working_hours_time_of_day() {
        let working_hours: WorkingHoursTO = serde_json::from_str(
            r#"{
                "professional_id": "5f8ee0a7-5d5b-4a24-b0a4-2c0c9a0f3b21",
                "day_of_week": "Monday",
                "from": "09:00",
                "to": "13:00",
                "active": true
            }"#,
        )
        .unwrap();
        assert_eq!(working_hours.from, time!(09:00));
        assert_eq!(working_hours.to, time!(13:00));
        assert_eq!(working_hours.id, Uuid::nil());
        assert_eq!(working_hours.version, Uuid::nil());
        assert_eq!(working_hours.created, None);
    }

    #[test]
    fn test_status_names() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatusTO::PendingPayment).unwrap(),
            r#""PENDING_PAYMENT""#
        );
        assert_eq!(
            serde_json::to_string(&UrgencyTO::High).unwrap(),
            r#""HIGH""#
        );
    }
}

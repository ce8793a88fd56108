use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use rest::RestStateDef;
use rest_types::AvailabilityTO;
use service::{
    appointment::{AppointmentStatus, PaymentMethod},
    availability::{AvailabilityQuery, AvailabilityService},
    booking::{AppointmentPatch, BookingService, CreateAppointmentRequest},
    client::ClientIdentity,
    ErrorKind,
};
use time::{macros::time, PrimitiveDateTime, Time};
use tower::ServiceExt;

use crate::integration_test::{TestSetup, BOOKING_DAY};

fn at(time: Time) -> PrimitiveDateTime {
    PrimitiveDateTime::new(BOOKING_DAY, time)
}

fn booking_request(setup: &TestSetup, start: Time, email: &str) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        business_id: setup.business_id,
        branch_id: Some(setup.branch_id),
        offering_id: setup.offering_id,
        professional_id: Some(setup.professional_id),
        client: ClientIdentity {
            name: "Jo".into(),
            email: Some(email.into()),
            phone: None,
        },
        start_time: at(start),
        notes: None,
        payment_method: PaymentMethod::Local,
        acknowledge_payment_risk: false,
    }
}

async fn slot_starts(setup: &TestSetup) -> Vec<Time> {
    let availability = setup
        .rest_state
        .availability_service()
        .get_available_slots(
            &AvailabilityQuery {
                business_id: setup.business_id,
                branch_id: setup.branch_id,
                date: BOOKING_DAY,
                offering_id: setup.offering_id,
                professional_id: None,
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(availability.professionals.len(), 1);
    availability.professionals[0]
        .slots
        .iter()
        .map(|slot| slot.start.time())
        .collect()
}

#[tokio::test]
async fn test_availability_skips_the_break() {
    let setup = TestSetup::new().await;
    assert_eq!(
        slot_starts(&setup).await,
        vec![
            time!(09:00),
            time!(09:30),
            time!(10:00),
            time!(10:30),
            time!(11:00),
            time!(11:30),
            time!(12:30),
        ]
    );
}

#[tokio::test]
async fn test_booked_slot_is_no_longer_offered() {
    let setup = TestSetup::new().await;
    let booking_service = setup.rest_state.booking_service();

    let outcome = booking_service
        .create(&booking_request(&setup, time!(10:00), "jo@example.com"))
        .await
        .unwrap();
    assert_eq!(outcome.appointment.status, AppointmentStatus::Confirmed);
    assert_eq!(outcome.appointment.end_time, at(time!(10:30)));
    assert_eq!(outcome.appointment.price_cents, 2500);
    assert!(!slot_starts(&setup).await.contains(&time!(10:00)));

    let err = booking_service
        .create(&booking_request(&setup, time!(10:00), "sam@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SlotConflict);

    booking_service
        .create(&booking_request(&setup, time!(10:30), "sam@example.com"))
        .await
        .unwrap();
    assert_eq!(setup.count_active_appointments().await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_bookings_of_one_slot() {
    let setup = TestSetup::new().await;
    let booking_service = setup.rest_state.booking_service();
    let first_request = booking_request(&setup, time!(11:00), "jo@example.com");
    let second_request = booking_request(&setup, time!(11:00), "sam@example.com");

    let first_service = booking_service.clone();
    let second_service = booking_service.clone();
    let first = tokio::spawn(async move { first_service.create(&first_request).await });
    let second = tokio::spawn(async move { second_service.create(&second_request).await });
    let results = [first.await.unwrap(), second.await.unwrap()];

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    let err = results
        .iter()
        .find_map(|result| result.as_ref().err())
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::SlotConflict);
    assert_eq!(setup.count_active_appointments().await, 1);
}

#[tokio::test]
async fn test_cancel_frees_the_slot_and_move_keeps_it_exclusive() {
    let setup = TestSetup::new().await;
    let booking_service = setup.rest_state.booking_service();
    let first = booking_service
        .create(&booking_request(&setup, time!(09:00), "jo@example.com"))
        .await
        .unwrap()
        .appointment;
    let second = booking_service
        .create(&booking_request(&setup, time!(09:30), "sam@example.com"))
        .await
        .unwrap()
        .appointment;

    let err = booking_service
        .update(
            setup.business_id,
            second.id,
            &AppointmentPatch {
                start_time: Some(at(time!(09:00))),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SlotConflict);

    let cancelled = booking_service
        .cancel(setup.business_id, first.id, Some(Arc::from("client called")))
        .await
        .unwrap()
        .appointment;
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("client called"));

    let moved = booking_service
        .update(
            setup.business_id,
            second.id,
            &AppointmentPatch {
                start_time: Some(at(time!(09:00))),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .appointment;
    assert_eq!(moved.start_time, at(time!(09:00)));
    assert_eq!(moved.end_time, at(time!(09:30)));
    assert_eq!(setup.count_active_appointments().await, 1);
}

#[tokio::test]
async fn test_availability_over_http() {
    let setup = TestSetup::new().await;
    let app = rest::generate_app(setup.rest_state.clone());

    let response = app
        .oneshot(
            Request::get(format!(
                "/availability/{}/{}/{}/{}",
                setup.business_id, setup.branch_id, BOOKING_DAY, setup.offering_id
            ))
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let availability: AvailabilityTO = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(availability.professionals.len(), 1);
    assert_eq!(availability.professionals[0].slots.len(), 7);
    assert_eq!(availability.professionals[0].occupancy.working_minutes, 210);
}

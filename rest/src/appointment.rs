use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use rest_types::{
    AppointmentPatchTO, AppointmentTO, BookingOutcomeTO, BookingWarningTO, CheckoutTO, ClientTO,
    CreateAppointmentTO, ErrorTO,
};
use serde::Deserialize;
use service::booking::BookingService;
use tracing::instrument;
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;

use crate::{error_handler, json_response, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", post(create_appointment::<RestState>))
        .route(
            "/{business_id}/{id}",
            get(get_appointment::<RestState>)
                .put(update_appointment::<RestState>)
                .delete(cancel_appointment::<RestState>),
        )
        .route(
            "/{business_id}/{id}/payment-confirmed",
            post(confirm_payment::<RestState>),
        )
        .route(
            "/{business_id}/{id}/payment-failed",
            post(fail_payment::<RestState>),
        )
        .route(
            "/{business_id}/{id}/complete",
            post(complete_appointment::<RestState>),
        )
        .route(
            "/{business_id}/{id}/no-show",
            post(mark_no_show::<RestState>),
        )
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CancelParams {
    #[param(example = "client called")]
    pub reason: Option<String>,
}

#[utoipa::path(
    post,
    path = "",
    tags = ["Appointments"],
    request_body = CreateAppointmentTO,
    responses(
        (status = 201, description = "Appointment booked", body = BookingOutcomeTO),
        (status = 402, description = "Online prepayment required", body = ErrorTO),
        (status = 404, description = "Branch, offering or professional not found", body = ErrorTO),
        (status = 409, description = "Slot taken or nobody available", body = ErrorTO),
        (status = 422, description = "Invalid request", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn create_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Json(request): Json<CreateAppointmentTO>,
) -> Response {
    error_handler(
        (async {
            let outcome = BookingOutcomeTO::from(
                &rest_state
                    .booking_service()
                    .create(&(&request).into())
                    .await?,
            );
            json_response(StatusCode::CREATED, &outcome)
        })
        .await,
    )
}

#[utoipa::path(
    get,
    path = "/{business_id}/{id}",
    tags = ["Appointments"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("id" = Uuid, Path, description = "Appointment"),
    ),
    responses(
        (status = 200, description = "The appointment", body = AppointmentTO),
        (status = 404, description = "Appointment not found", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn get_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, id)): Path<(Uuid, Uuid)>,
) -> Response {
    error_handler(
        (async {
            let appointment =
                AppointmentTO::from(&rest_state.booking_service().get(business_id, id).await?);
            json_response(StatusCode::OK, &appointment)
        })
        .await,
    )
}

#[utoipa::path(
    put,
    path = "/{business_id}/{id}",
    tags = ["Appointments"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("id" = Uuid, Path, description = "Appointment"),
    ),
    request_body = AppointmentPatchTO,
    responses(
        (status = 200, description = "Appointment modified", body = BookingOutcomeTO),
        (status = 404, description = "Appointment not found", body = ErrorTO),
        (status = 409, description = "New slot taken", body = ErrorTO),
        (status = 422, description = "Invalid modification", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn update_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<AppointmentPatchTO>,
) -> Response {
    error_handler(
        (async {
            let outcome = BookingOutcomeTO::from(
                &rest_state
                    .booking_service()
                    .update(business_id, id, &(&patch).into())
                    .await?,
            );
            json_response(StatusCode::OK, &outcome)
        })
        .await,
    )
}

#[utoipa::path(
    delete,
    path = "/{business_id}/{id}",
    tags = ["Appointments"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("id" = Uuid, Path, description = "Appointment"),
        CancelParams,
    ),
    responses(
        (status = 200, description = "Appointment cancelled", body = BookingOutcomeTO),
        (status = 404, description = "Appointment not found", body = ErrorTO),
        (status = 422, description = "Appointment already finished", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn cancel_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, id)): Path<(Uuid, Uuid)>,
    Query(params): Query<CancelParams>,
) -> Response {
    error_handler(
        (async {
            let outcome = BookingOutcomeTO::from(
                &rest_state
                    .booking_service()
                    .cancel(business_id, id, params.reason.as_deref().map(Into::into))
                    .await?,
            );
            json_response(StatusCode::OK, &outcome)
        })
        .await,
    )
}

#[utoipa::path(
    post,
    path = "/{business_id}/{id}/payment-confirmed",
    tags = ["Appointments"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("id" = Uuid, Path, description = "Appointment"),
    ),
    responses(
        (status = 200, description = "Appointment confirmed", body = AppointmentTO),
        (status = 404, description = "Appointment not found", body = ErrorTO),
        (status = 422, description = "Appointment is not pending payment", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn confirm_payment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, id)): Path<(Uuid, Uuid)>,
) -> Response {
    error_handler(
        (async {
            let appointment = AppointmentTO::from(
                &rest_state
                    .booking_service()
                    .confirm_payment(business_id, id)
                    .await?,
            );
            json_response(StatusCode::OK, &appointment)
        })
        .await,
    )
}

#[utoipa::path(
    post,
    path = "/{business_id}/{id}/payment-failed",
    tags = ["Appointments"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("id" = Uuid, Path, description = "Appointment"),
    ),
    responses(
        (status = 200, description = "Appointment cancelled", body = AppointmentTO),
        (status = 404, description = "Appointment not found", body = ErrorTO),
        (status = 422, description = "Appointment is not pending payment", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn fail_payment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, id)): Path<(Uuid, Uuid)>,
) -> Response {
    error_handler(
        (async {
            let appointment = AppointmentTO::from(
                &rest_state
                    .booking_service()
                    .fail_payment(business_id, id)
                    .await?,
            );
            json_response(StatusCode::OK, &appointment)
        })
        .await,
    )
}

#[utoipa::path(
    post,
    path = "/{business_id}/{id}/complete",
    tags = ["Appointments"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("id" = Uuid, Path, description = "Appointment"),
    ),
    responses(
        (status = 200, description = "Appointment completed", body = AppointmentTO),
        (status = 404, description = "Appointment not found", body = ErrorTO),
        (status = 422, description = "Not confirmed or not over yet", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn complete_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, id)): Path<(Uuid, Uuid)>,
) -> Response {
    error_handler(
        (async {
            let appointment =
                AppointmentTO::from(&rest_state.booking_service().complete(business_id, id).await?);
            json_response(StatusCode::OK, &appointment)
        })
        .await,
    )
}

#[utoipa::path(
    post,
    path = "/{business_id}/{id}/no-show",
    tags = ["Appointments"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("id" = Uuid, Path, description = "Appointment"),
    ),
    responses(
        (status = 200, description = "Client did not show up", body = AppointmentTO),
        (status = 404, description = "Appointment not found", body = ErrorTO),
        (status = 422, description = "Not confirmed or not over yet", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn mark_no_show<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, id)): Path<(Uuid, Uuid)>,
) -> Response {
    error_handler(
        (async {
            let appointment = AppointmentTO::from(
                &rest_state
                    .booking_service()
                    .mark_no_show(business_id, id)
                    .await?,
            );
            json_response(StatusCode::OK, &appointment)
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create_appointment,
        get_appointment,
        update_appointment,
        cancel_appointment,
        confirm_payment,
        fail_payment,
        complete_appointment,
        mark_no_show,
    ),
    components(schemas(
        AppointmentTO,
        AppointmentPatchTO,
        BookingOutcomeTO,
        BookingWarningTO,
        CheckoutTO,
        ClientTO,
        CreateAppointmentTO,
    ))
)]
pub struct AppointmentApiDoc;

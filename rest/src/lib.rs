use std::sync::Arc;

mod appointment;
mod availability;
mod branch;
mod break_time;
mod working_hours;

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use rest_types::{ErrorDetailsTO, ErrorTO, ValidationFailureTO};
use serde::Serialize;
use service::{ErrorKind, ServiceError};
use thiserror::Error;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Service error")]
    ServiceError(#[from] ServiceError),

    #[error("Inconsistent id. Got {0} in path but {1} in body")]
    InconsistentId(Uuid, Uuid),

    #[error("Invalid date {0}, expected YYYY-MM-DD")]
    InvalidDate(Arc<str>),

    #[error("Could not serialize response: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Could not build response: {0}")]
    Http(#[from] axum::http::Error),
}

fn error_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::SlotConflict | ErrorKind::NoProfessionalAvailable => StatusCode::CONFLICT,
        ErrorKind::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
        ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_details(err: &ServiceError) -> Option<ErrorDetailsTO> {
    match err {
        ServiceError::EntityNotFound(id) => Some(ErrorDetailsTO::Entity(*id)),
        ServiceError::ValidationError(items) => Some(ErrorDetailsTO::Validation(
            items.iter().map(ValidationFailureTO::from).collect(),
        )),
        ServiceError::SlotConflict(range) => Some(ErrorDetailsTO::Slot(range.into())),
        ServiceError::PaymentRequired(scoring) => Some(ErrorDetailsTO::Scoring(scoring.into())),
        _ => None,
    }
}

/// Status and body a failed request is answered with.
pub fn render_error(err: &RestError) -> (StatusCode, ErrorTO) {
    match err {
        RestError::ServiceError(service_error) => {
            let kind = service_error.kind();
            let message: Arc<str> = if kind == ErrorKind::InternalError {
                error!("Request failed: {}", service_error);
                "Internal error".into()
            } else {
                info!("Request rejected: {}", service_error);
                service_error.to_string().into()
            };
            (
                error_status(kind),
                ErrorTO {
                    kind: kind.as_str().into(),
                    message,
                    details: error_details(service_error),
                },
            )
        }
        RestError::InconsistentId(_, _) | RestError::InvalidDate(_) => (
            StatusCode::BAD_REQUEST,
            ErrorTO {
                kind: ErrorKind::ValidationError.as_str().into(),
                message: err.to_string().into(),
                details: None,
            },
        ),
        RestError::Serialization(_) | RestError::Http(_) => {
            error!("Could not answer request: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorTO {
                    kind: ErrorKind::InternalError.as_str().into(),
                    message: "Internal error".into(),
                    details: None,
                },
            )
        }
    }
}

fn error_handler(result: Result<Response, RestError>) -> Response {
    match result {
        Ok(response) => response,
        Err(err) => {
            let (status, error_to) = render_error(&err);
            match serde_json::to_string(&error_to) {
                Ok(body) => (status, [(header::CONTENT_TYPE, "application/json")], body)
                    .into_response(),
                Err(_) => (status, error_to.message.to_string()).into_response(),
            }
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Result<Response, RestError> {
    Ok(Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::new(serde_json::to_string(value)?))?)
}

fn empty_response(status: StatusCode) -> Result<Response, RestError> {
    Ok(Response::builder().status(status).body(Body::empty())?)
}

pub trait RestStateDef: Clone + Send + Sync + 'static {
    type AvailabilityService: service::availability::AvailabilityService + Send + Sync + 'static;
    type BookingService: service::booking::BookingService + Send + Sync + 'static;
    type BranchService: service::branch::BranchService + Send + Sync + 'static;
    type WorkingHoursService: service::working_hours::WorkingHoursService
        + Send
        + Sync
        + 'static;
    type BreakTimeService: service::break_time::BreakTimeService + Send + Sync + 'static;

    fn availability_service(&self) -> Arc<Self::AvailabilityService>;
    fn booking_service(&self) -> Arc<Self::BookingService>;
    fn branch_service(&self) -> Arc<Self::BranchService>;
    fn working_hours_service(&self) -> Arc<Self::WorkingHoursService>;
    fn break_time_service(&self) -> Arc<Self::BreakTimeService>;
}

#[derive(OpenApi)]
#[openapi(
    nest(
        (path = "/availability", api = availability::AvailabilityApiDoc),
        (path = "/appointment", api = appointment::AppointmentApiDoc),
        (path = "/branch", api = branch::BranchApiDoc),
        (path = "/working-hours", api = working_hours::WorkingHoursApiDoc),
        (path = "/break-time", api = break_time::BreakTimeApiDoc),
    ),
    components(schemas(ErrorTO, ErrorDetailsTO, ValidationFailureTO))
)]
pub struct ApiDoc;

pub fn generate_app<RestState: RestStateDef>(rest_state: RestState) -> Router {
    Router::new()
        .nest("/availability", availability::generate_route())
        .nest("/appointment", appointment::generate_route())
        .nest("/branch", branch::generate_route())
        .nest("/working-hours", working_hours::generate_route())
        .nest("/break-time", break_time::generate_route())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(rest_state)
}

pub async fn start_server<RestState: RestStateDef>(
    rest_state: RestState,
    address: &str,
) -> std::io::Result<()> {
    let app = generate_app(rest_state);
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("Listening on {}", address);
    axum::serve(listener, app).await
}

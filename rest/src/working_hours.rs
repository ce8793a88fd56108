use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use rest_types::{DayOfWeekTO, ErrorTO, WorkingHoursTO};
use service::working_hours::WorkingHoursService;
use tracing::instrument;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::{empty_response, error_handler, json_response, RestError, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route(
            "/{business_id}/professional/{professional_id}",
            get(get_working_hours_for_professional::<RestState>),
        )
        .route("/{business_id}", post(create_working_hours::<RestState>))
        .route(
            "/{business_id}/{id}",
            put(update_working_hours::<RestState>).delete(delete_working_hours::<RestState>),
        )
}

#[utoipa::path(
    get,
    path = "/{business_id}/professional/{professional_id}",
    tags = ["Working hours"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("professional_id" = Uuid, Path, description = "Professional"),
    ),
    responses(
        (status = 200, description = "Working hours of the professional", body = [WorkingHoursTO]),
        (status = 404, description = "Professional not found", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn get_working_hours_for_professional<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, professional_id)): Path<(Uuid, Uuid)>,
) -> Response {
    error_handler(
        (async {
            let working_hours: Vec<WorkingHoursTO> = rest_state
                .working_hours_service()
                .get_for_professional(business_id, professional_id, None)
                .await?
                .iter()
                .map(WorkingHoursTO::from)
                .collect();
            json_response(StatusCode::OK, &working_hours)
        })
        .await,
    )
}

#[utoipa::path(
    post,
    path = "/{business_id}",
    tags = ["Working hours"],
    params(("business_id" = Uuid, Path, description = "Business")),
    request_body = WorkingHoursTO,
    responses(
        (status = 201, description = "Working hours created", body = WorkingHoursTO),
        (status = 404, description = "Professional not found", body = ErrorTO),
        (status = 422, description = "Invalid working hours", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn create_working_hours<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(business_id): Path<Uuid>,
    Json(working_hours): Json<WorkingHoursTO>,
) -> Response {
    error_handler(
        (async {
            let working_hours = WorkingHoursTO::from(
                &rest_state
                    .working_hours_service()
                    .create(business_id, &(&working_hours).into(), None)
                    .await?,
            );
            json_response(StatusCode::CREATED, &working_hours)
        })
        .await,
    )
}

#[utoipa::path(
    put,
    path = "/{business_id}/{id}",
    tags = ["Working hours"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("id" = Uuid, Path, description = "Working hours"),
    ),
    request_body = WorkingHoursTO,
    responses(
        (status = 200, description = "Working hours updated", body = WorkingHoursTO),
        (status = 400, description = "Id in path and body differ", body = ErrorTO),
        (status = 404, description = "Working hours not found", body = ErrorTO),
        (status = 422, description = "Invalid working hours", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn update_working_hours<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, id)): Path<(Uuid, Uuid)>,
    Json(working_hours): Json<WorkingHoursTO>,
) -> Response {
    error_handler(
        (async {
            if id != working_hours.id {
                return Err(RestError::InconsistentId(id, working_hours.id));
            }
            let working_hours = WorkingHoursTO::from(
                &rest_state
                    .working_hours_service()
                    .update(business_id, &(&working_hours).into(), None)
                    .await?,
            );
            json_response(StatusCode::OK, &working_hours)
        })
        .await,
    )
}

#[utoipa::path(
    delete,
    path = "/{business_id}/{id}",
    tags = ["Working hours"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("id" = Uuid, Path, description = "Working hours"),
    ),
    responses(
        (status = 204, description = "Working hours deleted"),
        (status = 404, description = "Working hours not found", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn delete_working_hours<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, id)): Path<(Uuid, Uuid)>,
) -> Response {
    error_handler(
        (async {
            rest_state
                .working_hours_service()
                .delete(business_id, id, None)
                .await?;
            empty_response(StatusCode::NO_CONTENT)
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        get_working_hours_for_professional,
        create_working_hours,
        update_working_hours,
        delete_working_hours,
    ),
    components(schemas(WorkingHoursTO, DayOfWeekTO))
)]
pub struct WorkingHoursApiDoc;

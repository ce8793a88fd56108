use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use rest_types::{BreakTimeTO, ErrorTO};
use service::break_time::BreakTimeService;
use tracing::instrument;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::{empty_response, error_handler, json_response, RestError, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route(
            "/{business_id}/branch/{branch_id}",
            get(get_break_times_for_branch::<RestState>),
        )
        .route("/{business_id}", post(create_break_time::<RestState>))
        .route(
            "/{business_id}/{id}",
            put(update_break_time::<RestState>).delete(delete_break_time::<RestState>),
        )
}

#[utoipa::path(
    get,
    path = "/{business_id}/branch/{branch_id}",
    tags = ["Break times"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("branch_id" = Uuid, Path, description = "Branch"),
    ),
    responses(
        (status = 200, description = "Break times of the branch", body = [BreakTimeTO]),
        (status = 404, description = "Branch not found", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn get_break_times_for_branch<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, branch_id)): Path<(Uuid, Uuid)>,
) -> Response {
    error_handler(
        (async {
            let break_times: Vec<BreakTimeTO> = rest_state
                .break_time_service()
                .get_for_branch(business_id, branch_id, None)
                .await?
                .iter()
                .map(BreakTimeTO::from)
                .collect();
            json_response(StatusCode::OK, &break_times)
        })
        .await,
    )
}

#[utoipa::path(
    post,
    path = "/{business_id}",
    tags = ["Break times"],
    params(("business_id" = Uuid, Path, description = "Business")),
    request_body = BreakTimeTO,
    responses(
        (status = 201, description = "Break time created", body = BreakTimeTO),
        (status = 404, description = "Branch not found", body = ErrorTO),
        (status = 422, description = "Invalid or overlapping break time", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn create_break_time<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(business_id): Path<Uuid>,
    Json(break_time): Json<BreakTimeTO>,
) -> Response {
    error_handler(
        (async {
            let break_time = BreakTimeTO::from(
                &rest_state
                    .break_time_service()
                    .create(business_id, &(&break_time).into(), None)
                    .await?,
            );
            json_response(StatusCode::CREATED, &break_time)
        })
        .await,
    )
}

#[utoipa::path(
    put,
    path = "/{business_id}/{id}",
    tags = ["Break times"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("id" = Uuid, Path, description = "Break time"),
    ),
    request_body = BreakTimeTO,
    responses(
        (status = 200, description = "Break time updated", body = BreakTimeTO),
        (status = 400, description = "Id in path and body differ", body = ErrorTO),
        (status = 404, description = "Break time not found", body = ErrorTO),
        (status = 422, description = "Invalid or overlapping break time", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn update_break_time<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, id)): Path<(Uuid, Uuid)>,
    Json(break_time): Json<BreakTimeTO>,
) -> Response {
    error_handler(
        (async {
            if id != break_time.id {
                return Err(RestError::InconsistentId(id, break_time.id));
            }
            let break_time = BreakTimeTO::from(
                &rest_state
                    .break_time_service()
                    .update(business_id, &(&break_time).into(), None)
                    .await?,
            );
            json_response(StatusCode::OK, &break_time)
        })
        .await,
    )
}

#[utoipa::path(
    delete,
    path = "/{business_id}/{id}",
    tags = ["Break times"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("id" = Uuid, Path, description = "Break time"),
    ),
    responses(
        (status = 204, description = "Break time deleted"),
        (status = 404, description = "Break time not found", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn delete_break_time<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, id)): Path<(Uuid, Uuid)>,
) -> Response {
    error_handler(
        (async {
            rest_state
                .break_time_service()
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
        get_break_times_for_branch,
        create_break_time,
        update_break_time,
        delete_break_time,
    ),
    components(schemas(BreakTimeTO))
)]
pub struct BreakTimeApiDoc;

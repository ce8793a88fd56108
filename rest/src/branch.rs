use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use rest_types::{BranchTO, ErrorTO};
use serde::Deserialize;
use service::branch::BranchService;
use tracing::instrument;
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;

use crate::{error_handler, json_response, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", post(create_branch::<RestState>))
        .route("/{business_id}", get(get_all_branches::<RestState>))
        .route("/{business_id}/resolve", get(resolve_branch::<RestState>))
        .route("/{business_id}/{id}", get(get_branch::<RestState>))
        .route("/{business_id}/{id}/main", put(set_main_branch::<RestState>))
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResolveParams {
    pub branch_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/{business_id}",
    tags = ["Branches"],
    params(("business_id" = Uuid, Path, description = "Business")),
    responses(
        (status = 200, description = "All branches of the business", body = [BranchTO]),
        (status = 404, description = "Business not found", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn get_all_branches<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(business_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let branches: Vec<BranchTO> = rest_state
                .branch_service()
                .get_all(business_id, None)
                .await?
                .iter()
                .map(BranchTO::from)
                .collect();
            json_response(StatusCode::OK, &branches)
        })
        .await,
    )
}

#[utoipa::path(
    get,
    path = "/{business_id}/resolve",
    tags = ["Branches"],
    params(("business_id" = Uuid, Path, description = "Business"), ResolveParams),
    responses(
        (status = 200, description = "Branch a request is served by", body = BranchTO),
        (status = 404, description = "Business or branch not found", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn resolve_branch<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(business_id): Path<Uuid>,
    Query(params): Query<ResolveParams>,
) -> Response {
    error_handler(
        (async {
            let branch = BranchTO::from(
                &rest_state
                    .branch_service()
                    .resolve(business_id, params.branch_id, None)
                    .await?,
            );
            json_response(StatusCode::OK, &branch)
        })
        .await,
    )
}

#[utoipa::path(
    get,
    path = "/{business_id}/{id}",
    tags = ["Branches"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("id" = Uuid, Path, description = "Branch"),
    ),
    responses(
        (status = 200, description = "The branch", body = BranchTO),
        (status = 404, description = "Branch not found", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn get_branch<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, id)): Path<(Uuid, Uuid)>,
) -> Response {
    error_handler(
        (async {
            let branch =
                BranchTO::from(&rest_state.branch_service().get(business_id, id, None).await?);
            json_response(StatusCode::OK, &branch)
        })
        .await,
    )
}

#[utoipa::path(
    post,
    path = "",
    tags = ["Branches"],
    request_body = BranchTO,
    responses(
        (status = 201, description = "Branch created", body = BranchTO),
        (status = 404, description = "Business not found", body = ErrorTO),
        (status = 422, description = "Invalid branch", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn create_branch<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Json(branch): Json<BranchTO>,
) -> Response {
    error_handler(
        (async {
            let branch = BranchTO::from(
                &rest_state
                    .branch_service()
                    .create(&(&branch).into(), None)
                    .await?,
            );
            json_response(StatusCode::CREATED, &branch)
        })
        .await,
    )
}

#[utoipa::path(
    put,
    path = "/{business_id}/{id}/main",
    tags = ["Branches"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("id" = Uuid, Path, description = "Branch"),
    ),
    responses(
        (status = 200, description = "Branch is the main branch now", body = BranchTO),
        (status = 404, description = "Branch not found", body = ErrorTO),
        (status = 422, description = "Branch is inactive", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn set_main_branch<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, id)): Path<(Uuid, Uuid)>,
) -> Response {
    error_handler(
        (async {
            let branch = BranchTO::from(
                &rest_state
                    .branch_service()
                    .set_main(business_id, id, None)
                    .await?,
            );
            json_response(StatusCode::OK, &branch)
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        get_all_branches,
        resolve_branch,
        get_branch,
        create_branch,
        set_main_branch,
    ),
    components(schemas(BranchTO))
)]
pub struct BranchApiDoc;

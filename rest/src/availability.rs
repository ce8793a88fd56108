use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use rest_types::{AvailabilityTO, ErrorTO, OccupancyTO, ProfessionalAvailabilityTO, SlotTO};
use serde::Deserialize;
use service::availability::{AvailabilityQuery, AvailabilityService};
use time::{macros::format_description, Date};
use tracing::instrument;
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;

use crate::{error_handler, json_response, RestError, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new().route(
        "/{business_id}/{branch_id}/{date}/{offering_id}",
        get(get_available_slots::<RestState>),
    )
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityParams {
    /// Only report this professional.
    pub professional_id: Option<Uuid>,
}

fn parse_date(date: &str) -> Result<Date, RestError> {
    Date::parse(date, format_description!("[year]-[month]-[day]"))
        .map_err(|_| RestError::InvalidDate(date.into()))
}

#[utoipa::path(
    get,
    path = "/{business_id}/{branch_id}/{date}/{offering_id}",
    tags = ["Availability"],
    params(
        ("business_id" = Uuid, Path, description = "Business"),
        ("branch_id" = Uuid, Path, description = "Branch"),
        ("date" = String, Path, description = "Day in branch local time", example = "2024-01-15"),
        ("offering_id" = Uuid, Path, description = "Service to book"),
        AvailabilityParams,
    ),
    responses(
        (status = 200, description = "Free slots per professional", body = AvailabilityTO),
        (status = 400, description = "Malformed date", body = ErrorTO),
        (status = 404, description = "Branch or offering not found", body = ErrorTO),
    ),
)]
#[instrument(skip(rest_state))]
pub async fn get_available_slots<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path((business_id, branch_id, date, offering_id)): Path<(Uuid, Uuid, String, Uuid)>,
    Query(params): Query<AvailabilityParams>,
) -> Response {
    error_handler(
        (async {
            let query = AvailabilityQuery {
                business_id,
                branch_id,
                date: parse_date(&date)?,
                offering_id,
                professional_id: params.professional_id,
            };
            let availability = AvailabilityTO::from(
                &rest_state
                    .availability_service()
                    .get_available_slots(&query, None)
                    .await?,
            );
            json_response(StatusCode::OK, &availability)
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(get_available_slots),
    components(schemas(AvailabilityTO, ProfessionalAvailabilityTO, SlotTO, OccupancyTO))
)]
pub struct AvailabilityApiDoc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::api::{ErrorDto, ProductionDto},
    server::{
        controller::util::dashboard::{dashboard_key, selected_regions},
        error::Error,
        model::app::AppState,
        service::production::ProductionService,
    },
};

pub static PRODUCTION_TAG: &str = "production";

/// Get production figures of the selected regions
///
/// Values are in display units (raw amounts divided by one million) and rows are sorted by
/// region. A selection without rows yields an empty table.
#[utoipa::path(
    get,
    path = "/api/production",
    tag = PRODUCTION_TAG,
    params(
        ("region" = Vec<String>, Query, description = "Selected region, repeated once per region")
    ),
    responses(
        (status = 200, description = "Success when retrieving production figures", body = ProductionDto),
        (status = 400, description = "No region selected", body = ErrorDto),
        (status = 503, description = "No warehouse session could be created", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_production(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, Error> {
    let regions = selected_regions(params);
    let key = dashboard_key(&session).await?;

    let table = ProductionService::new(&state.sessions)
        .fetch(&key, &regions)
        .await?;

    let dto = ProductionDto {
        table: table.to_display_units().sorted_by_region(),
    };

    Ok((StatusCode::OK, axum::Json(dto)).into_response())
}

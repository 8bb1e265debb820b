use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tower_sessions::Session;

use crate::{
    model::api::ErrorDto,
    server::{
        controller::util::dashboard::dashboard_key, error::Error, model::app::AppState,
        service::production::ProductionService,
    },
};

pub static REGION_TAG: &str = "region";

/// Get every region available for selection
#[utoipa::path(
    get,
    path = "/api/regions",
    tag = REGION_TAG,
    responses(
        (status = 200, description = "Success when retrieving regions", body = Vec<String>),
        (status = 503, description = "No warehouse session could be created", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_regions(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let key = dashboard_key(&session).await?;

    let regions = ProductionService::new(&state.sessions)
        .list_regions(&key)
        .await?;

    Ok((StatusCode::OK, axum::Json(regions)).into_response())
}

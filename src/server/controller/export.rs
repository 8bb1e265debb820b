use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::api::ErrorDto,
    server::{
        controller::util::dashboard::{dashboard_key, selected_regions},
        error::Error,
        model::app::AppState,
        service::export::{
            ExportService, CSV_CONTENT_TYPE, CSV_FILE_NAME, PNG_CONTENT_TYPE, PNG_FILE_NAME,
        },
    },
};

pub static EXPORT_TAG: &str = "export";

/// Download the raw production table of the selected regions as CSV
///
/// The download is recorded in the background without delaying the file.
#[utoipa::path(
    get,
    path = "/api/production/csv",
    tag = EXPORT_TAG,
    params(
        ("region" = Vec<String>, Query, description = "Selected region, repeated once per region")
    ),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 400, description = "No region selected", body = ErrorDto),
        (status = 404, description = "No rows for the selected regions", body = ErrorDto),
        (status = 503, description = "No warehouse session could be created", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn download_csv(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, Error> {
    let regions = selected_regions(params);
    let key = dashboard_key(&session).await?;

    let bytes = ExportService::new(&state.sessions)
        .csv(&key, &regions)
        .await?;

    Ok(attachment(CSV_CONTENT_TYPE, CSV_FILE_NAME, bytes))
}

/// Download the production chart of the selected regions as PNG
///
/// The download is recorded in the background without delaying the file.
#[utoipa::path(
    get,
    path = "/api/production/chart.png",
    tag = EXPORT_TAG,
    params(
        ("region" = Vec<String>, Query, description = "Selected region, repeated once per region")
    ),
    responses(
        (status = 200, description = "PNG attachment", content_type = "image/png", body = Vec<u8>),
        (status = 400, description = "No region selected", body = ErrorDto),
        (status = 404, description = "No rows for the selected regions", body = ErrorDto),
        (status = 503, description = "No warehouse session could be created", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn download_chart(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, Error> {
    let regions = selected_regions(params);
    let key = dashboard_key(&session).await?;

    let bytes = ExportService::new(&state.sessions)
        .chart_png(&key, &regions)
        .await?;

    Ok(attachment(PNG_CONTENT_TYPE, PNG_FILE_NAME, bytes))
}

fn attachment(content_type: &str, file_name: &str, bytes: Vec<u8>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
}

//! HTTP routing and OpenAPI documentation configuration.
//!
//! This module defines the application's HTTP routes and generates OpenAPI documentation
//! using utoipa. Every API endpoint is registered here with its OpenAPI specification, and
//! Swagger UI is served at `/api/docs`.

use axum::Router;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, model::app::AppState};

/// Builds the application's HTTP router with all API endpoints and Swagger UI documentation.
///
/// # Registered Endpoints
/// - `GET /api/regions` - Regions available for selection
/// - `GET /api/production` - Production table of the selected regions in display units
/// - `GET /api/production/csv` - Raw production table as a CSV attachment
/// - `GET /api/production/chart.png` - Production chart as a PNG attachment
///
/// The OpenAPI document is served at `/api/docs/openapi.json`.
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Harvest", description = "Gross agricultural production API"),
        tags(
            (name = controller::region::REGION_TAG, description = "Region selection"),
            (name = controller::production::PRODUCTION_TAG, description = "Production figures"),
            (name = controller::export::EXPORT_TAG, description = "File downloads"),
        )
    )]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::region::get_regions))
        .routes(routes!(controller::production::get_production))
        .routes(routes!(controller::export::download_csv))
        .routes(routes!(controller::export::download_chart))
        .split_for_parts();

    routes.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dioxus_logger::tracing;
use thiserror::Error;

use crate::model::api::{ErrorDto, EMPTY_SELECTION_MESSAGE, NO_DATA_MESSAGE};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("No region was selected")]
    EmptySelection,
    #[error("No rows found for the selected regions")]
    NoData,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::EmptySelection => (StatusCode::BAD_REQUEST, EMPTY_SELECTION_MESSAGE),
            Self::NoData => (StatusCode::NOT_FOUND, NO_DATA_MESSAGE),
        };

        (
            status,
            Json(ErrorDto {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::server::error::InternalServerError;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to finish CSV output: {0}")]
    CsvBuffer(String),
    #[error("Failed to parse chart SVG: {0}")]
    SvgParse(String),
    #[error("Failed to allocate a {width}x{height} pixmap for the chart")]
    PixmapAllocation { width: u32, height: u32 },
    #[error("Failed to encode chart as PNG: {0}")]
    PngEncode(String),
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}

//! Snowflake warehouse error types.
//!
//! Connection failures are retried by the session manager and surface as
//! [`WarehouseError::NoSession`] once every attempt has failed. Statement failures are never
//! retried and reach the caller as-is.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dioxus_logger::tracing;
use thiserror::Error;

use crate::{model::api::ErrorDto, server::error::InternalServerError};

#[derive(Error, Debug)]
pub enum WarehouseError {
    /// Every connection attempt failed.
    #[error("Failed to connect to the data warehouse after {attempts} attempt(s): {last_error}")]
    NoSession { attempts: u32, last_error: String },
    /// The SQL API rejected a statement.
    #[error("Statement failed with HTTP {status} (code {code}): {message}")]
    Statement {
        status: u16,
        code: String,
        message: String,
    },
    /// A result set lacks a column the caller relies on.
    #[error("Result set is missing column {0:?}")]
    MissingColumn(String),
    /// The SQL API answered with a body that does not follow its documented shape.
    #[error("Unexpected response from the data warehouse: {0}")]
    InvalidResponse(String),
}

impl IntoResponse for WarehouseError {
    fn into_response(self) -> Response {
        match self {
            Self::NoSession { .. } => {
                tracing::error!("{}", self);

                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorDto {
                        error: format!("An error occurred. Error details: {}", self),
                    }),
                )
                    .into_response()
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

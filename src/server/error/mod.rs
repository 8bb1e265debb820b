//! Error types for the Harvest server application.
//!
//! This module provides the error handling system with specialized error types for the
//! configuration, warehouse, dashboard and export domains. All errors implement
//! `IntoResponse` for Axum HTTP responses and use `thiserror` for ergonomic error
//! definitions with automatic `Display` and `Error` trait implementations.

pub mod config;
pub mod dashboard;
pub mod export;
pub mod warehouse;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dioxus_logger::tracing;
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        config::ConfigError, dashboard::DashboardError, export::ExportError,
        warehouse::WarehouseError,
    },
};

/// Main error type for the Harvest server application.
///
/// This enum aggregates all domain-specific error types and external library errors into a
/// single unified error type. It uses `thiserror`'s `#[from]` attribute to enable automatic
/// conversion from underlying error types via the `?` operator. The `IntoResponse`
/// implementation maps errors to appropriate HTTP responses for API consumers.
///
/// # Error Categories
/// - Configuration errors (missing/empty environment variables, unusable private key)
/// - Warehouse errors (exhausted connection retries, rejected statements, malformed results)
/// - Dashboard errors (empty selection, no rows to export)
/// - Export errors (CSV buffering, chart rasterization)
/// - External library errors (HTTP client, key handling, JWT signing, sessions, scheduler)
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Warehouse error (connection, statement, or result set issues).
    #[error(transparent)]
    WarehouseError(#[from] WarehouseError),
    /// Dashboard request error (nothing selected, nothing found).
    #[error(transparent)]
    DashboardError(#[from] DashboardError),
    /// Export error (CSV or PNG generation).
    #[error(transparent)]
    ExportError(#[from] ExportError),
    /// Parse error (failed to parse a value from string or other format).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// HTTP client error (connection refused, timeout, invalid response body).
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    /// OpenSSL error (private key decryption or encoding).
    #[error(transparent)]
    OpenSslError(#[from] openssl::error::ErrorStack),
    /// JWT signing error.
    #[error(transparent)]
    JwtError(#[from] jsonwebtoken::errors::Error),
    /// CSV serialization error.
    #[error(transparent)]
    CsvError(#[from] csv::Error),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
}

/// Converts application errors into HTTP responses.
///
/// Maps domain-specific errors to appropriate HTTP status codes and JSON error responses.
/// Most errors are treated as internal server errors (500) with logging, while dashboard
/// and warehouse errors have custom response mappings.
///
/// # Returns
/// - 400 Bad Request - No region selected
/// - 404 Not Found - Nothing to export for the selected regions
/// - 503 Service Unavailable - No warehouse session could be created
/// - 500 Internal Server Error - For all other errors (with error logging)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::WarehouseError(err) => err.into_response(),
            Self::DashboardError(err) => err.into_response(),
            Self::ExportError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// The dashboard shows the failure to the user as an error banner, so the message carries
/// the error text behind a fixed prefix.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: format!("An error occurred. Error details: {}", self.0),
            }),
        )
            .into_response()
    }
}

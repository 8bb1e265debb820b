use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::server::error::InternalServerError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Required environment variable {0} is empty")]
    EmptyEnvVar(String),
    #[error("Failed to read private key file {path}: {reason}")]
    PrivateKeyUnreadable { path: String, reason: String },
    #[error("Private key file {0} is empty")]
    EmptyPrivateKey(String),
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
}

impl IntoResponse for ConfigError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

pub const NOT_FOUND_BODY: &str = "Sensor ID not found";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Sensor {0} not found")]
    NotFound(u32),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Backend answered with status {0}")]
    Backend(u16),
    #[error("Entropy source error: {0}")]
    Entropy(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response(),
            other => {
                error!(error = %other, "Request failed.");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
            }
        }
    }
}

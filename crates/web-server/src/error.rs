use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] dataset::DatasetError),
    #[error("Metrics error: {0}")]
    Metrics(#[from] metrics::MetricsError),
    #[error("Configuration error: {0}")]
    Config(#[from] configuration::error::ConfigError),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Dataset(dataset_err) => {
                tracing::error!(error = ?dataset_err, "Dataset error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while reading the dataset".to_string(),
                )
            }
            AppError::Metrics(metrics_err) => {
                tracing::error!(error = ?metrics_err, "Metrics error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred during aggregation".to_string(),
                )
            }
            AppError::Config(config_err) => {
                tracing::error!(error = ?config_err, "Configuration error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A server configuration error occurred".to_string(),
                )
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

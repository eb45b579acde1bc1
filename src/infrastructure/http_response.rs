// HTTP response utilities for JSON errors
use crate::error::{MetricsError, ValidationError};
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// Error returned by handlers; maps each failure class to a status code.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Metrics(MetricsError),
}

impl From<MetricsError> for ApiError {
    fn from(e: MetricsError) -> Self {
        ApiError::Metrics(e)
    }
}

// Only query parameters reach this; record validation arrives as MetricsError.
impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Metrics(MetricsError::Validation(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation")
            }
            ApiError::Metrics(MetricsError::DataSource(e)) if e.is_timeout() => {
                (StatusCode::GATEWAY_TIMEOUT, "data_source_timeout")
            }
            ApiError::Metrics(MetricsError::DataSource(_)) => {
                (StatusCode::BAD_GATEWAY, "data_source")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let message = match &self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Metrics(e) => e.to_string(),
        };

        if status.is_server_error() {
            tracing::error!("{} ({}): {}", kind, status, message);
        } else {
            tracing::warn!("{} ({}): {}", kind, status, message);
        }

        (status, Json(ErrorBody { error: kind, message })).into_response()
    }
}

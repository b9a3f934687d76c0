use crate::analysis::AnalysisError;
use crate::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Error returned by the song routes, rendered as `{"error": "..."}`.
///
/// Collaborator failures map to 404 and unreadable collaborator payloads to
/// 500, matching what the frontend already handles.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Upstream(String),
    Internal(String),
}

impl ApiError {
    pub fn missing_parameter(name: &str) -> Self {
        ApiError::BadRequest(format!("{} parameter is required", name))
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m) | ApiError::Upstream(m) | ApiError::Internal(m) => m,
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::InvalidResponse(_) => ApiError::Internal(e.to_string()),
            _ => ApiError::Upstream(format!("API request failed: {}", e)),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::Llm(_) => ApiError::Upstream(e.to_string()),
            AnalysisError::MalformedAnalysis(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self.message());
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    Engine(EngineError),
    NotFound { resource: &'static str, id: String },
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError::Engine(e)
    }
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        ApiError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Engine(e) if e.is_conflict() => StatusCode::CONFLICT,
            ApiError::Engine(EngineError::SeatNotFound(_) | EngineError::UserNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Engine(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Engine(e) => ErrorBody {
                error: e.kind().to_string(),
                message: e.to_string(),
            },
            ApiError::NotFound { resource, id } => ErrorBody {
                error: "not_found".to_string(),
                message: format!("{resource} not found: {id}"),
            },
        };
        (status, Json(body)).into_response()
    }
}

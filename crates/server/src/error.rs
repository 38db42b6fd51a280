use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::ServiceError;
use log::error;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Identities of the schedules a rejected booking collided with
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicting_schedule_ids: Vec<Uuid>,
}

/// Errors a handler can return
#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    BadRequest(String),
    Unauthorized,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Service(err) => match err {
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::Conflict { .. }
                | ServiceError::DependencyConflict { .. }
                | ServiceError::DuplicateEdge { .. } => StatusCode::CONFLICT,
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
                ServiceError::Integrity(_) | ServiceError::Database(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn body(&self) -> ErrorResponse {
        let conflicting_schedule_ids = match self {
            Self::Service(ServiceError::Conflict { conflicting }) => conflicting.clone(),
            _ => vec![],
        };

        let error = match self {
            Self::Service(ServiceError::Database(_)) => "internal server error".to_string(),
            Self::Service(err) => err.to_string(),
            Self::BadRequest(message) => message.clone(),
            Self::Unauthorized => "missing subject in token claims".to_string(),
        };

        ErrorResponse {
            error,
            conflicting_schedule_ids,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self:?}");
        }

        (status, Json(self.body())).into_response()
    }
}

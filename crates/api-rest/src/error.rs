use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use dental_core::ServiceError;
use dental_types::{IdError, TextError};
use record_store::StoreError;
use serde::Serialize;
use utoipa::ToSchema;

/// JSON body returned with every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// A service failure on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::InvalidInput(_)
            | ServiceError::InvalidId(_)
            | ServiceError::InvalidText(_)
            | ServiceError::RecordFailed(_) => StatusCode::BAD_REQUEST,
            ServiceError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Rejected(_)
            | ServiceError::EmptyBatch(_)
            | ServiceError::Store(StoreError::Transport(_)) => StatusCode::BAD_GATEWAY,
            ServiceError::Mapping { .. } | ServiceError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        Self(error)
    }
}

impl From<IdError> for ApiError {
    fn from(error: IdError) -> Self {
        Self(error.into())
    }
}

impl From<TextError> for ApiError {
    fn from(error: TextError) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        }
        (
            status,
            Json(ErrorRes {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Parses a record id taken from a request path.
pub fn parse_id(raw: &str) -> Result<dental_types::RecordId, ApiError> {
    Ok(dental_types::RecordId::parse(raw)?)
}

/// Requires non-blank text from a request body.
pub fn require_text(raw: &str) -> Result<dental_types::NonEmptyText, ApiError> {
    Ok(dental_types::NonEmptyText::new(raw)?)
}

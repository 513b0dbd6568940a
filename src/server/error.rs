use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Body of every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl ErrorBody {
    pub fn for_status(status: StatusCode) -> Self {
        let message = match status {
            StatusCode::BAD_REQUEST => "bad request".to_owned(),
            StatusCode::NOT_FOUND => "resource not found".to_owned(),
            StatusCode::METHOD_NOT_ALLOWED => "method not allowed".to_owned(),
            StatusCode::UNPROCESSABLE_ENTITY => "unprocessable".to_owned(),
            StatusCode::INTERNAL_SERVER_ERROR => "internal server error".to_owned(),
            other => other
                .canonical_reason()
                .unwrap_or("error")
                .to_ascii_lowercase(),
        };
        Self {
            success: false,
            error: status.as_u16(),
            message,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("required request fields are missing")]
    BadRequest,
    #[error("resource does not exist")]
    NotFound,
    #[error("method is not supported by the resource")]
    MethodNotAllowed,
    #[error("request could not be processed")]
    Unprocessable,
    #[error("unexpected server failure")]
    Internal,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a bare framework status onto the taxonomy, if it belongs to it.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::BAD_REQUEST => Some(ApiError::BadRequest),
            StatusCode::NOT_FOUND => Some(ApiError::NotFound),
            StatusCode::METHOD_NOT_ALLOWED => Some(ApiError::MethodNotAllowed),
            StatusCode::UNPROCESSABLE_ENTITY => Some(ApiError::Unprocessable),
            StatusCode::INTERNAL_SERVER_ERROR => Some(ApiError::Internal),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }
        (status, Json(ErrorBody::for_status(status))).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use popt_sdk::{SdkError, TransferError};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Sdk(#[from] SdkError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Sdk(e) => match e {
                SdkError::EmptyPrompt | SdkError::EmptyTemplate | SdkError::Diff(_) => {
                    StatusCode::BAD_REQUEST
                }
                SdkError::Transfer(TransferError::Format(_) | TransferError::EmptyImport) => {
                    StatusCode::BAD_REQUEST
                }
                SdkError::EntryNotFound(_) | SdkError::TemplateNotFound(_) => StatusCode::NOT_FOUND,
                SdkError::Completion(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(%status, error = %self, "request failed");
        }
        let message = match &self {
            Self::Sdk(e) => e.to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

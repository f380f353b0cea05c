//! HTTP mapping of application errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::domain::{AppError, AuthError, ExportError, GenerationError};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::ParseError { .. } => StatusCode::BAD_REQUEST,
            AppError::Auth(err) => match err {
                AuthError::MissingFields | AuthError::PasswordMismatch => StatusCode::BAD_REQUEST,
                AuthError::NoRegisteredAccount | AuthError::InvalidCredentials => {
                    StatusCode::UNAUTHORIZED
                }
            },
            AppError::Generation(err) => match err {
                GenerationError::GenerationUnavailable { .. } => StatusCode::BAD_GATEWAY,
                GenerationError::GenerationGatewayUnconfigured(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                GenerationError::GenerationInProgress => StatusCode::CONFLICT,
                GenerationError::EmptyInstruction => StatusCode::BAD_REQUEST,
            },
            AppError::Export(ExportError::EmptyDocument) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated | AppError::SessionNotFound => StatusCode::UNAUTHORIZED,
            AppError::Export(_)
            | AppError::Io(_)
            | AppError::Configuration(_)
            | AppError::PromptAssembly(_)
            | AppError::PageRender { .. }
            | AppError::TomlParseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            error!(error = %self, status = status.as_u16(), "request failed");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP error responses.
//
// Every failure leaves the service as `{ "error": "...", "suggestion": "..." }`
// with a status taken from the error class: user input problems are 400,
// processing failures 500. Protocol-level rejections (404, 405, 411, 413)
// use the same body shape.

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use toolverse_core::error::ToolverseError;
use toolverse_core::human_errors::humanize_error;
use toolverse_core::types::ErrorClass;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Tool(#[from] ToolverseError),

    #[error("no endpoint at {0}")]
    NotFound(String),

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("a Content-Length header is required")]
    LengthRequired,

    #[error("request body is too large")]
    PayloadTooLarge,

    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("background task failed: {0}")]
    Task(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Tool(err) => match err.class() {
                ErrorClass::UserInput => StatusCode::BAD_REQUEST,
                ErrorClass::Processing => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::LengthRequired => StatusCode::LENGTH_REQUIRED,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Tool(err) => {
                let human = humanize_error(err);
                ErrorBody {
                    error: human.message,
                    suggestion: Some(human.suggestion),
                }
            }
            Self::Task(_) => ErrorBody {
                error: "Something went wrong while processing the request.".into(),
                suggestion: Some("Try again.".into()),
            },
            other => ErrorBody {
                error: other.to_string(),
                suggestion: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::BadRequest(err.body_text())
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_errors_follow_their_class() {
        assert_eq!(
            ApiError::from(ToolverseError::NoFiles).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ToolverseError::PdfError("xref".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn tool_error_body_is_humanized() {
        let body = ApiError::from(ToolverseError::PdfError("bad xref at 0x1f".into())).body();
        assert_eq!(body.error, "The PDF could not be processed.");
        assert!(body.suggestion.is_some());
    }

    #[test]
    fn protocol_errors_have_fixed_statuses() {
        assert_eq!(ApiError::LengthRequired.status(), StatusCode::LENGTH_REQUIRED);
        assert_eq!(
            ApiError::PayloadTooLarge.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(ApiError::NotFound("/x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}

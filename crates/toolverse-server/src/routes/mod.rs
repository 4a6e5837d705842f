// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Router, shared request state and the response helpers the tool endpoints
// have in common.

pub mod image;
pub mod pdf;
pub mod security;
pub mod text;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::{HeaderValue, Method, StatusCode, Uri, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde::de::DeserializeOwned;
use toolverse_core::ServerConfig;
use toolverse_core::error::ToolverseError;
use toolverse_core::types::GeneratedArtifact;
use tracing::info;

use crate::error::ApiError;

/// State shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Requests currently being handled.
    pub active_requests: Arc<AtomicU32>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            active_requests: Arc::new(AtomicU32::new(0)),
        }
    }
}

/// Every endpoint of the service.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Image tools
        .route("/api/image/compressor", post(image::compressor))
        .route("/api/image/convert-heic", post(image::convert_heic))
        .route("/api/image/convert", post(image::convert_format))
        .route("/api/image/resize", post(image::resize_image))
        .route("/api/image/favicon-generator", post(image::favicon_generator))
        .route("/api/image/palette", post(image::palette))
        // PDF tools
        .route("/api/pdf/merge", post(pdf::merge))
        .route("/api/pdf/reorder", post(pdf::reorder))
        .route("/api/pdf/split", post(pdf::split))
        .route("/api/pdf/thumbnails", post(pdf::thumbnails))
        .route("/api/pdf/to-image", post(pdf::to_image))
        // Text and security tools
        .route("/api/text/count", post(text::count))
        .route("/api/text/diff", post(text::diff))
        .route("/api/security/password", post(security::password))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(middleware::from_fn_with_state(state.clone(), guard_request))
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    status: &'static str,
    version: &'static str,
    active_requests: u32,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        active_requests: state.active_requests.load(Ordering::Relaxed),
    })
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

// ---------------------------------------------------------------------------
// Request guard
// ---------------------------------------------------------------------------

/// Counts the request as in flight, rejects POST bodies without a usable
/// Content-Length or over the configured limit, and marks every response
/// `Connection: close`.
async fn guard_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let _in_flight = InFlight::enter(&state.active_requests);
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = match check_content_length(&request, state.config.max_body_bytes) {
        Ok(()) => next.run(request).await,
        Err(err) => err.into_response(),
    };
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    response
}

fn check_content_length(request: &Request, limit: usize) -> Result<(), ApiError> {
    if request.method() != Method::POST {
        return Ok(());
    }
    let raw = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .ok_or(ApiError::LengthRequired)?;
    let length: usize = raw
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .ok_or_else(|| ApiError::BadRequest("Content-Length is not a number".into()))?;
    if length > limit {
        return Err(ApiError::PayloadTooLarge);
    }
    Ok(())
}

struct InFlight<'a>(&'a AtomicU32);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicU32) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Run a tool operation on the blocking pool.
pub async fn blocking<T, F>(task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ToolverseError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(task).await??)
}

/// `200 OK` carrying the artifact as a download.
pub fn attachment(artifact: GeneratedArtifact) -> Result<Response, ApiError> {
    let content_type = HeaderValue::from_str(&artifact.mime_type).map_err(|_| {
        ToolverseError::InvalidInput(format!("bad content type {:?}", artifact.mime_type))
    })?;
    let disposition = HeaderValue::from_str(&content_disposition(&artifact.suggested_filename))
        .map_err(|_| {
            ToolverseError::InvalidInput(format!(
                "file name {:?} cannot be sent",
                artifact.suggested_filename
            ))
        })?;

    info!(
        filename = %artifact.suggested_filename,
        bytes = artifact.bytes.len(),
        "artifact ready"
    );
    let mut response = (StatusCode::OK, artifact.bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    Ok(response)
}

/// `attachment; filename="..."`. Names outside printable ASCII get an
/// underscore fallback plus an RFC 5987 `filename*`.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if fallback == filename {
        format!("attachment; filename=\"{filename}\"")
    } else {
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            percent_encode(filename)
        )
    }
}

fn percent_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
                char::from(b).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect()
}

/// Deserialize a JSON request body; malformed JSON is a user input error.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ToolverseError> {
    serde_json::from_slice(body)
        .map_err(|err| ToolverseError::InvalidInput(format!("request body is not valid JSON: {err}")))
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use test_support::{body_json, get, post_json, send, test_router};

    #[test]
    fn ascii_names_pass_through() {
        assert_eq!(
            content_disposition("toolverse-merged_20261018_093005.pdf"),
            "attachment; filename=\"toolverse-merged_20261018_093005.pdf\""
        );
    }

    #[test]
    fn non_ascii_names_get_encoded_fallback() {
        let value = content_disposition("보고서.pdf");
        assert!(value.starts_with("attachment; filename=\"___.pdf\"; filename*=UTF-8''"));
        assert!(value.ends_with("%EB%B3%B4%EA%B3%A0%EC%84%9C.pdf"));
        assert!(HeaderValue::from_str(&value).is_ok());
    }

    #[test]
    fn quotes_are_replaced() {
        assert!(content_disposition("a\"b.pdf").contains("filename=\"a_b.pdf\""));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = send(test_router(), get("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONNECTION).map(HeaderValue::as_bytes),
            Some(&b"close"[..])
        );
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["activeRequests"], 1);
    }

    #[tokio::test]
    async fn unknown_path_is_json_404() {
        let response = send(test_router(), get("/nope")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert!(json["error"].as_str().is_some_and(|e| e.contains("/nope")));
    }

    #[tokio::test]
    async fn wrong_method_is_405() {
        let response = send(test_router(), get("/api/pdf/merge")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn post_without_length_is_411() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/text/count")
            .body(Body::from(r#"{"text":"hi"}"#))
            .expect("request");
        let response = send(test_router(), request).await;
        assert_eq!(response.status(), StatusCode::LENGTH_REQUIRED);
    }

    #[tokio::test]
    async fn oversized_body_is_413() {
        let config = ServerConfig {
            max_body_bytes: 8,
            ..ServerConfig::default()
        };
        let request = post_json("/api/text/count", r#"{"text":"more than eight bytes"}"#);
        let response = send(router(AppState::new(config)), request).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}

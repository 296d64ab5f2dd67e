//! Split Routes
//!
//! Endpoints:
//! - POST /split - multipart `file` (PDF) + `ranges` (e.g. `1-3,5,7-10`)
//!
//! One range answers with the extracted PDF, several with `split_files.zip`.
//! Errors answer with `{"error": ..., "details"?: ...}`.

use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::split::{SplitError, SplitPayload, SplitRequest, Upload};
use crate::state::AppState;

/// Message returned for every server-side failure
const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred.";

// ============================================================================
// Error Response
// ============================================================================

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for SplitError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            SplitError::MalformedUpload(details) => ErrorResponse {
                error: "Failed to read upload".to_string(),
                details: Some(details.clone()),
            },
            SplitError::ExtractionFailed { tool, diagnostics, .. } => {
                let details = if diagnostics.is_empty() {
                    self.to_string()
                } else {
                    format!("{} ({}: {})", self, tool, diagnostics)
                };
                ErrorResponse {
                    error: INTERNAL_ERROR_MESSAGE.to_string(),
                    details: Some(details),
                }
            }
            e if e.is_client_error() => ErrorResponse {
                error: e.to_string(),
                details: None,
            },
            e => {
                tracing::error!("Internal error: {}", e);
                ErrorResponse {
                    error: INTERNAL_ERROR_MESSAGE.to_string(),
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Create the split router
pub fn router(body_limit: usize) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/split", post(split_pdf))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /split
async fn split_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, SplitError> {
    let multipart = multipart.map_err(|e| SplitError::MalformedUpload(e.body_text()))?;
    let request = read_form(multipart).await?;

    let payload = state.split_service().split(request).await?;
    payload_response(payload)
}

/// Collect the `file` and `ranges` fields; other fields are drained and ignored
async fn read_form(mut multipart: Multipart) -> Result<SplitRequest, SplitError> {
    let mut request = SplitRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(multipart_error)?;

                tracing::debug!(filename = %filename, bytes = data.len(), "Received file field");
                request.file = Some(Upload { filename, data });
            }
            "ranges" => {
                request.ranges = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    Ok(request)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> SplitError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        SplitError::UploadTooLarge
    } else {
        SplitError::MalformedUpload(e.body_text())
    }
}

/// Attachment response; the payload is already fully in memory
fn payload_response(payload: SplitPayload) -> Result<Response, SplitError> {
    let content_type = payload.content_type();
    let disposition = format!("attachment; filename=\"{}\"", payload.file_name());
    let data = payload.into_data();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, data.len())
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(data))
        .map_err(|e| SplitError::Internal(e.to_string()))
}

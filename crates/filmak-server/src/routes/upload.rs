//! Simulated remote-video upload.
//!
//! Acknowledges the request and answers with a fake storage URL; nothing
//! is fetched or stored.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;
use crate::middleware::request_id::RequestId;

const STORAGE_BASE: &str = "https://supabase.example.com/storage/v1/object/public/videos";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default)]
    pub video_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub original_url: String,
    pub stored_url: String,
}

/// POST /api/upload
pub async fn upload(
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<UploadRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Upload request with unreadable body");
            return AppError::new(filmak_core::Error::Validation(format!(
                "invalid JSON body: {}",
                rejection.body_text()
            )))
            .with_request_id(request_id.0)
            .into_response();
        }
    };

    let Some(video_url) = request.video_url.filter(|u| !u.trim().is_empty()) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "videoUrl is required" }))).into_response();
    };

    tracing::info!(%video_url, "Simulating upload");

    let stored_url = format!(
        "{STORAGE_BASE}/uploaded_{}.mp4",
        chrono::Utc::now().timestamp_millis()
    );

    Json(UploadResponse {
        success: true,
        message: "Video upload process initiated.".into(),
        original_url: video_url,
        stored_url,
    })
    .into_response()
}

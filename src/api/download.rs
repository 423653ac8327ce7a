use std::collections::HashMap;

use axum::{
    Extension, Form, Json,
    extract::{FromRequest, Path, Request},
    http::{HeaderName, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{
    download::tracks::{self, InputError},
    info,
    server::AppState,
    types::TrackRequest,
    warning,
};

pub const ACKNOWLEDGMENT: &str = "Download process started (check logs for progress)";
pub const JOB_ID_HEADER: &str = "x-job-id";

/// Accepts a batch of tracks and downloads them in the background.
///
/// The reply does not wait for the batch; per-track results show up in the
/// logs and under `GET /download/{job_id}`.
pub async fn download(Extension(state): Extension<AppState>, request: Request) -> Response {
    let tracks = match read_tracks(request).await {
        Ok(tracks) => tracks,
        Err(e) => {
            warning!("Error parsing tracks: {}", e);
            return (StatusCode::BAD_REQUEST, "Invalid tracks data").into_response();
        }
    };

    let job_id = state.jobs.create(tracks.len());
    info!("Accepted job {} with {} track(s)", job_id, tracks.len());

    let downloader = state.downloader.clone();
    let jobs = state.jobs.clone();
    let cancel = state.shutdown.child_token();
    let id = job_id.clone();
    tokio::spawn(async move {
        let report = downloader
            .run(&tracks, &cancel, |_, track, outcome| {
                jobs.record(&id, track, outcome)
            })
            .await;
        jobs.finish(&id, &report);
    });

    (
        [(HeaderName::from_static(JOB_ID_HEADER), job_id)],
        ACKNOWLEDGMENT,
    )
        .into_response()
}

pub async fn job_status(
    Extension(state): Extension<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    match state.jobs.get(&job_id) {
        Some(status) => Json(status).into_response(),
        None => (StatusCode::NOT_FOUND, "Unknown job").into_response(),
    }
}

/// Reads `tracks` from a JSON body or an urlencoded form.
async fn read_tracks(request: Request) -> Result<Vec<TrackRequest>, InputError> {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .map_err(|e| InputError::Body(e.body_text()))?;
        let raw = fields.get("tracks").ok_or(InputError::Missing)?;
        tracks::from_form(raw)
    } else {
        let Json(body) = Json::<Value>::from_request(request, &())
            .await
            .map_err(|e| InputError::Body(e.body_text()))?;
        let value = body.get("tracks").ok_or(InputError::Missing)?;
        tracks::normalize(value)
    }
}

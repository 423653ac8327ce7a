use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::server::AppState;

/// Liveness plus what the service is working with: where files go and how
/// many batches it currently tracks.
pub async fn health(Extension(state): Extension<AppState>) -> Json<Value> {
    let downloads_dir = state.downloader.persister().downloads_dir();
    let dir_exists = tokio::fs::metadata(downloads_dir)
        .await
        .is_ok_and(|meta| meta.is_dir());

    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "downloads_dir": downloads_dir.display().to_string(),
        "downloads_dir_exists": dir_exists,
        "jobs": state.jobs.len(),
    }))
}

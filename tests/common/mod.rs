#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Extension, Form, Json, Router,
    extract::{Path as AxumPath, Query},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tunegrab::{
    config::{DownloadSettings, SpotifySettings},
    download::Downloader,
};

pub const API_KEY: &str = "test-key";

/// How the fake conversion service answers for a video id.
#[derive(Clone)]
pub enum ConverterReply {
    Link(String),
    NoLink,
    Malformed,
    ServerError,
}

/// Fake YouTube search, conversion service and media host in one server.
#[derive(Default)]
pub struct FakeUpstream {
    pub videos: Mutex<HashMap<String, Vec<String>>>,
    pub failing_queries: Mutex<Vec<String>>,
    pub relayout_queries: Mutex<Vec<String>>,
    pub links: Mutex<HashMap<String, ConverterReply>>,
    pub media: Mutex<HashMap<String, Vec<u8>>>,
    pub events: Mutex<Vec<String>>,
}

pub struct Upstream {
    pub addr: SocketAddr,
    pub fake: Arc<FakeUpstream>,
}

impl Upstream {
    pub async fn start() -> Self {
        let fake = Arc::new(FakeUpstream::default());
        let app = Router::new()
            .route("/results", get(search))
            .route("/convert", get(convert))
            .route("/media/{name}", get(media))
            .layer(Extension(fake.clone()));
        let addr = serve(app).await;
        Self { addr, fake }
    }

    /// Sets up a track that makes it through all three stages.
    pub fn add_track(&self, query: &str, video_id: &str, media_name: &str, bytes: &[u8]) {
        self.add_video(query, video_id);
        self.add_link(video_id, ConverterReply::Link(self.media_url(media_name)));
        self.fake
            .media
            .lock()
            .unwrap()
            .insert(media_name.to_string(), bytes.to_vec());
    }

    pub fn add_video(&self, query: &str, video_id: &str) {
        self.fake
            .videos
            .lock()
            .unwrap()
            .entry(query.to_string())
            .or_default()
            .push(video_id.to_string());
    }

    pub fn add_link(&self, video_id: &str, reply: ConverterReply) {
        self.fake
            .links
            .lock()
            .unwrap()
            .insert(video_id.to_string(), reply);
    }

    pub fn fail_search(&self, query: &str) {
        self.fake
            .failing_queries
            .lock()
            .unwrap()
            .push(query.to_string());
    }

    /// Answers `query` with a page whose `ytInitialData` has no results section.
    pub fn relayout_search(&self, query: &str) {
        self.fake
            .relayout_queries
            .lock()
            .unwrap()
            .push(query.to_string());
    }

    pub fn media_url(&self, media_name: &str) -> String {
        format!("http://{}/media/{}", self.addr, media_name)
    }

    pub fn events(&self) -> Vec<String> {
        self.fake.events.lock().unwrap().clone()
    }

    pub fn settings(&self, downloads_dir: &Path) -> DownloadSettings {
        DownloadSettings {
            downloads_dir: downloads_dir.to_path_buf(),
            video_search_url: format!("http://{}/results", self.addr),
            converter_url: format!("http://{}/convert", self.addr),
            converter_host: "converter.test".to_string(),
            converter_api_key: API_KEY.to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }

    pub fn downloader(&self, downloads_dir: &Path) -> Downloader {
        Downloader::new(self.settings(downloads_dir)).unwrap()
    }
}

pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn results_page(video_ids: &[String]) -> String {
    let items: Vec<Value> = video_ids
        .iter()
        .map(|id| json!({ "videoRenderer": { "videoId": id } }))
        .collect();
    let data = json!({
        "contents": {
            "twoColumnSearchResultsRenderer": {
                "primaryContents": {
                    "sectionListRenderer": {
                        "contents": [
                            { "itemSectionRenderer": { "contents": items } }
                        ]
                    }
                }
            }
        }
    });
    format!(
        "<html><body><script>var ytInitialData = {};</script></body></html>",
        data
    )
}

async fn search(
    Extension(fake): Extension<Arc<FakeUpstream>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = params.get("search_query").cloned().unwrap_or_default();
    fake.events.lock().unwrap().push(format!("search:{}", query));

    if fake.failing_queries.lock().unwrap().contains(&query) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }

    if fake.relayout_queries.lock().unwrap().contains(&query) {
        return Html(
            r#"<html><script>var ytInitialData = {"responseContext":{},"onResponseReceivedCommands":[]};</script></html>"#,
        )
        .into_response();
    }

    let ids = fake
        .videos
        .lock()
        .unwrap()
        .get(&query)
        .cloned()
        .unwrap_or_default();
    Html(results_page(&ids)).into_response()
}

async fn convert(
    Extension(fake): Extension<Arc<FakeUpstream>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let url = params.get("url").cloned().unwrap_or_default();
    let video_id = url.split("v=").nth(1).unwrap_or_default().to_string();
    fake.events.lock().unwrap().push(format!("convert:{}", video_id));

    let key_ok = headers
        .get("x-rapidapi-key")
        .and_then(|v| v.to_str().ok())
        == Some(API_KEY);
    let host_ok = headers
        .get("x-rapidapi-host")
        .and_then(|v| v.to_str().ok())
        == Some("converter.test");
    if !key_ok || !host_ok {
        return (StatusCode::FORBIDDEN, "bad credentials").into_response();
    }

    let reply = fake.links.lock().unwrap().get(&video_id).cloned();
    match reply {
        Some(ConverterReply::Link(link)) => Json(json!({ "dlink": link })).into_response(),
        Some(ConverterReply::Malformed) => "<html>definitely not json</html>".into_response(),
        Some(ConverterReply::ServerError) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "converter down").into_response()
        }
        Some(ConverterReply::NoLink) | None => {
            Json(json!({ "status": "fail", "msg": "no link" })).into_response()
        }
    }
}

async fn media(
    Extension(fake): Extension<Arc<FakeUpstream>>,
    AxumPath(name): AxumPath<String>,
) -> Response {
    fake.events.lock().unwrap().push(format!("media:{}", name));
    match fake.media.lock().unwrap().get(&name).cloned() {
        Some(bytes) => bytes.into_response(),
        None => (StatusCode::NOT_FOUND, "gone").into_response(),
    }
}

/// Fake Spotify accounts and Web API.
pub struct FakeSpotify {
    pub addr: SocketAddr,
}

impl FakeSpotify {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/api/token", post(token))
            .route("/v1/me/playlists", get(user_playlists))
            .route("/v1/playlists/{id}/tracks", get(playlist_tracks))
            .layer(Extension(addr));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr }
    }

    pub fn settings(&self) -> SpotifySettings {
        SpotifySettings {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://127.0.0.1:3000/callback".to_string(),
            auth_url: format!("http://{}/authorize", self.addr),
            token_url: format!("http://{}/api/token", self.addr),
            api_url: format!("http://{}/v1", self.addr),
            scope: "user-library-read playlist-read-private".to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }
}

async fn token(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Response {
    let has_basic_auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if !has_basic_auth {
        return (StatusCode::UNAUTHORIZED, "missing client credentials").into_response();
    }

    match form.get("grant_type").map(String::as_str) {
        Some("authorization_code") if form.get("code").map(String::as_str) == Some("good-code") => {
            Json(json!({
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "scope": "user-library-read playlist-read-private",
                "expires_in": 3600,
                "token_type": "Bearer"
            }))
            .into_response()
        }
        _ => (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" }))).into_response(),
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer access-1")
}

async fn user_playlists(
    Extension(addr): Extension<SocketAddr>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    if params.get("page").map(String::as_str) == Some("2") {
        return Json(json!({
            "items": [
                { "id": "p2", "name": "Road Trip", "description": null, "tracks": { "total": 1 } }
            ],
            "next": null
        }))
        .into_response();
    }

    Json(json!({
        "items": [
            { "id": "p1", "name": "Morning <Mix>", "description": "", "tracks": { "total": 2 } }
        ],
        "next": format!("http://{}/v1/me/playlists?page=2", addr)
    }))
    .into_response()
}

async fn playlist_tracks(headers: HeaderMap, AxumPath(id): AxumPath<String>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != "p1" {
        return StatusCode::NOT_FOUND.into_response();
    }

    Json(json!({
        "items": [
            { "track": { "name": "Song", "artists": [{ "name": "Artist" }] } },
            { "track": null },
            { "track": {
                "type": "episode",
                "name": "Weekly Talk",
                "show": { "name": "Some Podcast", "publisher": "Someone" }
            } },
            { "track": { "name": "Duet", "artists": [{ "name": "A" }, { "name": "B" }] } }
        ],
        "next": null
    }))
    .into_response()
}

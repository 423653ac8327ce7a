use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::{
    api,
    download::Downloader,
    management::{JobRegistry, MemorySessionStore, SessionStore},
    spotify::SpotifyClient,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub downloader: Arc<Downloader>,
    pub spotify: Arc<SpotifyClient>,
    pub sessions: Arc<dyn SessionStore>,
    pub jobs: JobRegistry,
    /// Cancelled on shutdown; every batch runs under a child of it.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(downloader: Downloader, spotify: SpotifyClient) -> Self {
        Self::with_sessions(downloader, spotify, Arc::new(MemorySessionStore::new()))
    }

    pub fn with_sessions(
        downloader: Downloader,
        spotify: SpotifyClient,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            downloader: Arc::new(downloader),
            spotify: Arc::new(spotify),
            sessions,
            jobs: JobRegistry::new(),
            shutdown: CancellationToken::new(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/logout", get(api::logout))
        .route("/playlists", get(api::playlists))
        .route("/playlist/{id}", get(api::playlist))
        .route("/download", post(api::download))
        .route("/download/{job_id}", get(api::job_status))
        .route("/health", get(api::health))
        .layer(Extension(state))
}

pub fn parse_addr(addr: &str) -> crate::Res<SocketAddr> {
    Ok(SocketAddr::from_str(addr)?)
}

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Serves the web interface on `listener` until `state.shutdown` is
/// cancelled.
pub async fn start_api_server(listener: TcpListener, state: AppState) -> crate::Res<()> {
    let shutdown = state.shutdown.clone();

    let sessions = state.sessions.clone();
    let sweeper_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            tokio::select! {
                _ = sweeper_shutdown.cancelled() => break,
                _ = interval.tick() => sessions.sweep(),
            }
        }
    });

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}

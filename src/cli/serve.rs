use tokio::net::TcpListener;

use crate::{
    config, download::Downloader, error, info, server, server::AppState, spotify::SpotifyClient,
    success, warning,
};

pub async fn serve(addr: Option<String>, open: bool) {
    let download_settings = match config::download_settings() {
        Ok(settings) => settings,
        Err(e) => error!("Cannot load download settings: {}", e),
    };
    let spotify_settings = match config::spotify_settings() {
        Ok(settings) => settings,
        Err(e) => error!("Cannot load Spotify settings: {}", e),
    };

    let downloader = match Downloader::new(download_settings) {
        Ok(d) => d,
        Err(e) => error!("Cannot create HTTP client: {}", e),
    };
    let spotify = match SpotifyClient::new(spotify_settings) {
        Ok(client) => client,
        Err(e) => error!("Cannot create Spotify client: {}", e),
    };
    let state = AppState::new(downloader, spotify);

    let addr = addr.unwrap_or_else(config::server_addr);
    let addr = match server::parse_addr(&addr) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address {}: {}", addr, e),
    };
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", addr, e),
    };

    let shutdown = state.shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warning!("Failed to install Ctrl+C handler: {}", e);
            return;
        }
        info!("Shutting down, cancelling running downloads...");
        shutdown.cancel();
    });

    let url = format!("http://{}", addr);
    success!("Server running at {}", url);

    if open && webbrowser::open(&url).is_err() {
        warning!("Failed to open browser. Please navigate to {} manually.", url);
    }

    if let Err(e) = server::start_api_server(listener, state).await {
        error!("Server stopped with an error: {}", e);
    }
}

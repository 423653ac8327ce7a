//! # Spotify Integration Module
//!
//! Thin client for the parts of the Spotify Web API the web interface needs:
//!
//! - [`auth`] - OAuth 2.0 authorization code flow: building the authorize URL,
//!   exchanging the callback code for a token and refreshing expired tokens.
//!   Client credentials are sent with HTTP basic auth to the token endpoint.
//! - [`playlists`] - The current user's playlists and the tracks of a playlist,
//!   following Spotify's `next` links until every page is loaded.
//!
//! All endpoints come from [`SpotifySettings`], so tests can point the client
//! at a local fake.
//!
//! ## Endpoints
//!
//! - `GET /authorize` (browser redirect)
//! - `POST /api/token`
//! - `GET /me/playlists`
//! - `GET /playlists/{id}/tracks`

pub mod auth;
pub mod playlists;

use std::fmt;

use reqwest::Client;

use crate::config::SpotifySettings;

#[derive(Debug)]
pub enum SpotifyError {
    Http(reqwest::Error),
    Url(String),
    Auth(String),
}

impl fmt::Display for SpotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotifyError::Http(e) => write!(f, "Spotify request failed: {}", e),
            SpotifyError::Url(e) => write!(f, "invalid Spotify URL: {}", e),
            SpotifyError::Auth(e) => write!(f, "Spotify authentication failed: {}", e),
        }
    }
}

impl std::error::Error for SpotifyError {}

impl From<reqwest::Error> for SpotifyError {
    fn from(err: reqwest::Error) -> Self {
        SpotifyError::Http(err)
    }
}

#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    settings: SpotifySettings,
}

impl SpotifyClient {
    /// Builds the client with `settings.request_timeout` bounding every
    /// Spotify call.
    pub fn new(settings: SpotifySettings) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .connect_timeout(settings.request_timeout)
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self::with_client(http, settings))
    }

    pub fn with_client(http: Client, settings: SpotifySettings) -> Self {
        Self { http, settings }
    }

    pub fn settings(&self) -> &SpotifySettings {
        &self.settings
    }
}

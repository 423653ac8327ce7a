use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRequest {
    pub name: String,
    pub artist: String,
}

impl TrackRequest {
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
        }
    }

    /// Free-text search query: track name and artist joined by one space.
    pub fn query(&self) -> String {
        format!("{} {}", self.name, self.artist)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMatch {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub url: String,
}

/// What happened to a single track of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum TrackOutcome {
    Downloaded(PathBuf),
    VideoNotFound,
    SearchFailed(String),
    LinkNotFound,
    SaveFailed(String),
    Cancelled,
}

impl TrackOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TrackOutcome::Downloaded(_))
    }
}

impl fmt::Display for TrackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackOutcome::Downloaded(path) => write!(f, "downloaded to {}", path.display()),
            TrackOutcome::VideoNotFound => write!(f, "no video found"),
            TrackOutcome::SearchFailed(reason) => write!(f, "search failed: {}", reason),
            TrackOutcome::LinkNotFound => write!(f, "no download link found"),
            TrackOutcome::SaveFailed(reason) => write!(f, "save failed: {}", reason),
            TrackOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackReport {
    pub name: String,
    pub artist: String,
    pub outcome: TrackOutcome,
}

/// Ordered per-track results of one batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub tracks: Vec<TrackReport>,
}

impl BatchReport {
    pub fn push(&mut self, track: &TrackRequest, outcome: TrackOutcome) {
        self.tracks.push(TrackReport {
            name: track.name.clone(),
            artist: track.artist.clone(),
            outcome,
        });
    }

    pub fn succeeded(&self) -> usize {
        self.tracks.iter().filter(|t| t.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.tracks.len() - self.succeeded()
    }
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub artist: String,
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub oauth_state: Option<String>,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<Track>,
}

/// A playlist entry. Podcast episodes share the shape loosely: they carry
/// `"type": "episode"` and no artists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
    #[serde(rename = "type", default = "default_item_type")]
    pub item_type: String,
}

fn default_item_type() -> String {
    "track".to_string()
}

impl Track {
    pub fn is_music_track(&self) -> bool {
        self.item_type == "track"
    }

    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn to_request(&self) -> TrackRequest {
        TrackRequest::new(self.name.clone(), self.artist_names())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConverterResponse {
    pub dlink: Option<String>,
}

//! Configuration management for tunegrab.
//!
//! Values are read from environment variables, which may be supplied through
//! `.env` files. The lookup order is:
//! 1. Environment variables already set in the process (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`<data_local_dir>/tunegrab/.env`)
//! 4. Application defaults (where applicable)
//!
//! Startup code turns the individual values into [`DownloadSettings`] and
//! [`SpotifySettings`], which are handed to the components that need them.

use std::{env, fmt, path::PathBuf, time::Duration};

use reqwest::Url;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_SCOPE: &str = "user-library-read playlist-read-private";
pub const DEFAULT_CONVERTER_API_URL: &str =
    "https://youtube-mp3-downloader2.p.rapidapi.com/ytmp3/ytmp3/long_video.php";
pub const DEFAULT_VIDEO_SEARCH_URL: &str = "https://www.youtube.com/results";
pub const DEFAULT_DOWNLOADS_DIR: &str = "downloads";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid(key, reason) => write!(f, "{} is invalid: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything the download pipeline needs to talk to its collaborators.
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub downloads_dir: PathBuf,
    pub video_search_url: String,
    pub converter_url: String,
    pub converter_host: String,
    pub converter_api_key: String,
    pub request_timeout: Duration,
}

/// Spotify application credentials and endpoints.
#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub scope: String,
    pub request_timeout: Duration,
}

/// Loads environment variables from `.env` files.
///
/// The working directory's `.env` is loaded first, then the one in the local
/// data directory. Neither file is required; `dotenv` never overrides a
/// variable that is already set, so earlier sources win.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
///
/// # Example
///
/// ```
/// use tunegrab::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let local = PathBuf::from(".env");
    if local.is_file() {
        dotenv::from_path(&local).map_err(|e| e.to_string())?;
    }

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tunegrab/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the address the web server binds to, e.g. `127.0.0.1:3000`.
pub fn server_addr() -> String {
    optional("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
}

pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_CLIENT_ID")
}

/// Returns the Spotify client secret.
///
/// The secret is sent to the token endpoint only and must never be logged.
pub fn spotify_client_secret() -> Result<String, ConfigError> {
    required("SPOTIFY_CLIENT_SECRET")
}

/// Returns the OAuth redirect URI registered with the Spotify application,
/// e.g. `http://127.0.0.1:3000/callback`.
pub fn spotify_redirect_uri() -> Result<String, ConfigError> {
    required("SPOTIFY_REDIRECT_URI")
}

pub fn spotify_apiauth_url() -> String {
    optional("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_SPOTIFY_AUTH_URL.to_string())
}

pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_SPOTIFY_TOKEN_URL.to_string())
}

pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string())
}

/// Returns the space separated scopes requested during login.
pub fn spotify_scope() -> String {
    optional("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SPOTIFY_SCOPE.to_string())
}

/// Returns the RapidAPI key for the conversion service.
pub fn converter_api_key() -> Result<String, ConfigError> {
    required("YT_DOWNLOADER")
}

pub fn converter_api_url() -> String {
    optional("CONVERTER_API_URL").unwrap_or_else(|| DEFAULT_CONVERTER_API_URL.to_string())
}

/// Returns the `x-rapidapi-host` header value.
///
/// Falls back to the host part of the converter URL when `CONVERTER_API_HOST`
/// is not set.
pub fn converter_api_host() -> Result<String, ConfigError> {
    if let Some(host) = optional("CONVERTER_API_HOST") {
        return Ok(host);
    }

    let url = converter_api_url();
    let parsed =
        Url::parse(&url).map_err(|e| ConfigError::Invalid("CONVERTER_API_URL", e.to_string()))?;
    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Invalid("CONVERTER_API_URL", "URL has no host".to_string()))
}

pub fn video_search_url() -> String {
    optional("VIDEO_SEARCH_URL").unwrap_or_else(|| DEFAULT_VIDEO_SEARCH_URL.to_string())
}

pub fn downloads_dir() -> PathBuf {
    optional("DOWNLOADS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOADS_DIR))
}

/// Returns the timeout applied to each outbound request.
pub fn request_timeout() -> Result<Duration, ConfigError> {
    match optional("REQUEST_TIMEOUT_SECS") {
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::Invalid("REQUEST_TIMEOUT_SECS", e.to_string())),
        None => Ok(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
    }
}

/// Collects the download pipeline settings from the environment.
pub fn download_settings() -> Result<DownloadSettings, ConfigError> {
    Ok(DownloadSettings {
        downloads_dir: downloads_dir(),
        video_search_url: video_search_url(),
        converter_url: converter_api_url(),
        converter_host: converter_api_host()?,
        converter_api_key: converter_api_key()?,
        request_timeout: request_timeout()?,
    })
}

/// Collects the Spotify settings from the environment.
pub fn spotify_settings() -> Result<SpotifySettings, ConfigError> {
    Ok(SpotifySettings {
        client_id: spotify_client_id()?,
        client_secret: spotify_client_secret()?,
        redirect_uri: spotify_redirect_uri()?,
        auth_url: spotify_apiauth_url(),
        token_url: spotify_apitoken_url(),
        api_url: spotify_apiurl(),
        scope: spotify_scope(),
        request_timeout: request_timeout()?,
    })
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

// empty values count as unset so a blank line in .env falls back to defaults
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

mod common;

use std::collections::HashMap;

use common::FakeSpotify;
use reqwest::Url;
use serde_json::json;
use tunegrab::{
    spotify::{SpotifyClient, SpotifyError},
    types::{Paging, PlaylistItem},
};

#[tokio::test]
async fn test_authorize_url_carries_oauth_parameters() {
    let fake = FakeSpotify::start().await;
    let client = SpotifyClient::new(fake.settings()).unwrap();

    let url = Url::parse(&client.authorize_url("st4te").unwrap()).unwrap();
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    assert_eq!(params["response_type"], "code");
    assert_eq!(params["client_id"], "client-id");
    assert_eq!(params["redirect_uri"], "http://127.0.0.1:3000/callback");
    assert_eq!(params["scope"], "user-library-read playlist-read-private");
    assert_eq!(params["state"], "st4te");
}

#[tokio::test]
async fn test_exchange_code() {
    let fake = FakeSpotify::start().await;
    let client = SpotifyClient::new(fake.settings()).unwrap();

    let token = client.exchange_code("good-code").await.unwrap();
    assert_eq!(token.access_token, "access-1");
    assert_eq!(token.refresh_token, "refresh-1");
    assert_eq!(token.expires_in, 3600);
    assert!(token.obtained_at > 0);

    let err = client.exchange_code("bad-code").await.unwrap_err();
    assert!(matches!(err, SpotifyError::Auth(_)));
}

#[tokio::test]
async fn test_refresh_rejected_by_token_endpoint() {
    let fake = FakeSpotify::start().await;
    let client = SpotifyClient::new(fake.settings()).unwrap();

    let err = client.refresh_token("refresh-1").await.unwrap_err();
    assert!(matches!(err, SpotifyError::Auth(_)));
}

#[tokio::test]
async fn test_user_playlists_follow_next_pages() {
    let fake = FakeSpotify::start().await;
    let client = SpotifyClient::new(fake.settings()).unwrap();

    let playlists = client.user_playlists("access-1").await.unwrap();
    let names: Vec<&str> = playlists.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Morning <Mix>", "Road Trip"]);
    assert_eq!(playlists[0].tracks.as_ref().unwrap().total, 2);
}

#[tokio::test]
async fn test_playlist_tracks_skip_missing_entries_and_episodes() {
    let fake = FakeSpotify::start().await;
    let client = SpotifyClient::new(fake.settings()).unwrap();

    let tracks = client.playlist_tracks("access-1", "p1").await.unwrap();
    let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Song", "Duet"]);
    assert_eq!(tracks[0].name, "Song");
    assert_eq!(tracks[1].artist_names(), "A, B");

    let request = tracks[1].to_request();
    assert_eq!(request.name, "Duet");
    assert_eq!(request.artist, "A, B");
}

#[tokio::test]
async fn test_unauthorized_calls_fail() {
    let fake = FakeSpotify::start().await;
    let client = SpotifyClient::new(fake.settings()).unwrap();

    assert!(client.user_playlists("expired").await.is_err());
    assert!(client.playlist_tracks("access-1", "missing").await.is_err());
}

#[test]
fn test_episode_items_do_not_break_a_page() {
    let page = json!({
        "items": [
            { "track": { "type": "episode", "name": "Weekly Talk", "show": { "name": "Pod" } } },
            { "track": { "type": "track", "name": "Song", "artists": [{ "name": "Artist" }] } }
        ],
        "next": null
    });

    let paging: Paging<PlaylistItem> = serde_json::from_value(page).unwrap();
    let episode = paging.items[0].track.as_ref().unwrap();
    assert!(!episode.is_music_track());
    assert!(episode.artists.is_empty());
    assert!(paging.items[1].track.as_ref().unwrap().is_music_track());
}

#[tokio::test]
async fn test_stalled_spotify_call_times_out() {
    use std::time::{Duration, Instant};

    use axum::{Router, routing::get};

    let stalled = Router::new().route(
        "/v1/me/playlists",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            "too late"
        }),
    );
    let addr = common::serve(stalled).await;

    let fake = FakeSpotify::start().await;
    let mut settings = fake.settings();
    settings.api_url = format!("http://{}/v1", addr);
    settings.request_timeout = Duration::from_millis(200);
    let client = SpotifyClient::new(settings).unwrap();

    let started = Instant::now();
    let result = client.user_playlists("access-1").await;
    assert!(matches!(result, Err(SpotifyError::Http(_))));
    assert!(started.elapsed() < Duration::from_secs(5));
}

use axum::{
    Extension,
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};

use crate::{server::AppState, warning};

use super::{auth::access_token, views};

pub async fn playlists(Extension(state): Extension<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = access_token(&state, &headers).await else {
        return Redirect::to("/login").into_response();
    };

    match state.spotify.user_playlists(&token).await {
        Ok(playlists) => views::playlists_page(&playlists).into_response(),
        Err(e) => {
            warning!("Error fetching playlists: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching playlists").into_response()
        }
    }
}

pub async fn playlist(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Path(playlist_id): Path<String>,
) -> Response {
    let Some(token) = access_token(&state, &headers).await else {
        return Redirect::to("/login").into_response();
    };

    match state.spotify.playlist_tracks(&token, &playlist_id).await {
        Ok(tracks) => views::playlist_page(&playlist_id, &tracks).into_response(),
        Err(e) => {
            warning!("Error fetching playlist tracks: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error fetching playlist tracks",
            )
                .into_response()
        }
    }
}

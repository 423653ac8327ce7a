use axum::{
    Extension,
    extract::Query,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    management::TokenManager,
    server::AppState,
    types::Session,
    utils, warning,
};

use super::{session, views};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub async fn index(Extension(state): Extension<AppState>, headers: HeaderMap) -> Response {
    let logged_in = session::session_id(&headers)
        .and_then(|sid| state.sessions.token(&sid))
        .is_some();
    views::index_page(logged_in).into_response()
}

/// Starts the OAuth flow: remembers a random `state` in the session and
/// redirects to Spotify.
pub async fn login(Extension(state): Extension<AppState>, headers: HeaderMap) -> Response {
    // only ids this server handed out are reused
    let session_id = session::session_id(&headers)
        .filter(|sid| state.sessions.load(sid).is_some())
        .unwrap_or_else(utils::generate_session_id);
    let oauth_state = utils::generate_oauth_state();

    let authorize_url = match state.spotify.authorize_url(&oauth_state) {
        Ok(url) => url,
        Err(e) => {
            warning!("Cannot build authorize URL: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed").into_response();
        }
    };

    let mut stored = state.sessions.load(&session_id).unwrap_or_default();
    stored.oauth_state = Some(oauth_state);
    state.sessions.store(&session_id, stored);

    (
        [(SET_COOKIE, session::session_cookie(&session_id))],
        Redirect::to(&authorize_url),
    )
        .into_response()
}

pub async fn callback(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Response {
    if let Some(error) = params.error {
        warning!("Spotify denied authorization: {}", error);
        return (StatusCode::BAD_REQUEST, "Authentication failed").into_response();
    }

    let Some(session_id) = session::session_id(&headers) else {
        return (StatusCode::BAD_REQUEST, "Missing session").into_response();
    };

    let expected = state.sessions.take_oauth_state(&session_id);
    if expected.is_none() || expected != params.state {
        warning!("OAuth state mismatch for session");
        return (StatusCode::BAD_REQUEST, "Invalid OAuth state").into_response();
    }

    let Some(code) = params.code else {
        return (StatusCode::BAD_REQUEST, "Missing authorization code").into_response();
    };

    match state.spotify.exchange_code(&code).await {
        Ok(token) => {
            // a logged-in session never keeps the id it had before login
            let fresh_id = utils::generate_session_id();
            state.sessions.rename(&session_id, &fresh_id);
            state.sessions.set_token(&fresh_id, token);
            (
                [(SET_COOKIE, session::session_cookie(&fresh_id))],
                Redirect::to("/playlists"),
            )
                .into_response()
        }
        Err(e) => {
            warning!("Error during authentication: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed").into_response()
        }
    }
}

pub async fn logout(Extension(state): Extension<AppState>, headers: HeaderMap) -> Response {
    if let Some(session_id) = session::session_id(&headers) {
        state.sessions.remove(&session_id);
    }

    (
        [(SET_COOKIE, session::expired_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}

/// Access token for the request's session, refreshed when close to expiry.
///
/// `None` means the caller has to log in (again).
pub async fn access_token(state: &AppState, headers: &HeaderMap) -> Option<String> {
    let session_id = session::session_id(headers)?;
    let token = state.sessions.token(&session_id)?;

    let mut manager = TokenManager::new(token);
    match manager.get_valid_token(&state.spotify).await {
        Ok(access_token) => {
            if manager.was_refreshed() {
                state
                    .sessions
                    .set_token(&session_id, manager.current_token().clone());
            }
            Some(access_token)
        }
        Err(e) => {
            warning!("Token refresh failed: {}", e);
            state.sessions.store(&session_id, Session::default());
            None
        }
    }
}

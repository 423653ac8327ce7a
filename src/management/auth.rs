use chrono::Utc;

use crate::{
    spotify::{SpotifyClient, SpotifyError},
    types::Token,
};

/// Refresh tokens this many seconds before they actually expire.
const EXPIRY_BUFFER_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
    refreshed: bool,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager {
            token,
            refreshed: false,
        }
    }

    /// Returns an access token that is valid for at least a few more minutes,
    /// refreshing it through Spotify when needed.
    pub async fn get_valid_token(&mut self, spotify: &SpotifyClient) -> Result<String, SpotifyError> {
        if self.is_expired() {
            self.token = spotify.refresh_token(&self.token.refresh_token).await?;
            self.refreshed = true;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp() as u64)
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        let valid_until = self.token.obtained_at + self.token.expires_in;
        now >= valid_until.saturating_sub(EXPIRY_BUFFER_SECS)
    }

    /// Whether `get_valid_token` replaced the token, meaning the caller
    /// should store it again.
    pub fn was_refreshed(&self) -> bool {
        self.refreshed
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}

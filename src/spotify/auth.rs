use chrono::Utc;
use reqwest::Url;

use crate::types::{Token, TokenResponse};

use super::{SpotifyClient, SpotifyError};

impl SpotifyClient {
    /// Builds the URL the browser is sent to for the user to grant access.
    ///
    /// `state` is echoed back on the callback and must be checked there.
    ///
    /// # Example
    ///
    /// ```
    /// let url = spotify.authorize_url("a1b2c3")?;
    /// // https://accounts.spotify.com/authorize?response_type=code&client_id=...
    /// ```
    pub fn authorize_url(&self, state: &str) -> Result<String, SpotifyError> {
        let url = Url::parse_with_params(
            &self.settings.auth_url,
            &[
                ("response_type", "code"),
                ("client_id", self.settings.client_id.as_str()),
                ("scope", self.settings.scope.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| SpotifyError::Url(e.to_string()))?;

        Ok(url.to_string())
    }

    /// Exchanges the authorization code from the callback for a token.
    pub async fn exchange_code(&self, code: &str) -> Result<Token, SpotifyError> {
        let response = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
            ])
            .await?;

        let refresh_token = response
            .refresh_token
            .ok_or_else(|| SpotifyError::Auth("token response has no refresh token".to_string()))?;

        Ok(Token {
            access_token: response.access_token,
            refresh_token,
            scope: response.scope,
            expires_in: response.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// Spotify does not always rotate the refresh token; the old one is kept
    /// when the response has none.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token, SpotifyError> {
        let response = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        Ok(Token {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .unwrap_or_else(|| refresh_token.to_string()),
            scope: response.scope,
            expires_in: response.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, SpotifyError> {
        let res = self
            .http
            .post(&self.settings.token_url)
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .form(form)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(SpotifyError::Auth(format!("{}: {}", status, body)));
        }

        Ok(res.json::<TokenResponse>().await?)
    }
}

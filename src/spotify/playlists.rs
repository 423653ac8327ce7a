use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::types::{Paging, Playlist, PlaylistItem, Track};

use super::{SpotifyClient, SpotifyError};

const PLAYLISTS_PAGE_SIZE: &str = "50";
const TRACKS_PAGE_SIZE: &str = "100";

impl SpotifyClient {
    /// All playlists owned or followed by the current user.
    pub async fn user_playlists(&self, access_token: &str) -> Result<Vec<Playlist>, SpotifyError> {
        let mut url = self.api_url(&["me", "playlists"])?;
        url.query_pairs_mut().append_pair("limit", PLAYLISTS_PAGE_SIZE);

        self.get_all_pages(access_token, url).await
    }

    /// All tracks of a playlist. Removed tracks, which come back without a
    /// track object, and podcast episodes are left out.
    pub async fn playlist_tracks(
        &self,
        access_token: &str,
        playlist_id: &str,
    ) -> Result<Vec<Track>, SpotifyError> {
        let mut url = self.api_url(&["playlists", playlist_id, "tracks"])?;
        url.query_pairs_mut().append_pair("limit", TRACKS_PAGE_SIZE);

        let items: Vec<PlaylistItem> = self.get_all_pages(access_token, url).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| item.track)
            .filter(Track::is_music_track)
            .collect())
    }

    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        access_token: &str,
        first: Url,
    ) -> Result<Vec<T>, SpotifyError> {
        let mut all = Vec::new();
        let mut next = Some(first.to_string());

        while let Some(url) = next {
            let page: Paging<T> = self
                .http
                .get(&url)
                .bearer_auth(access_token)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            all.extend(page.items);
            next = page.next;
        }

        Ok(all)
    }

    // path segments are percent-encoded, so ids from the URL cannot change the route
    fn api_url(&self, segments: &[&str]) -> Result<Url, SpotifyError> {
        let mut url =
            Url::parse(&self.settings.api_url).map_err(|e| SpotifyError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SpotifyError::Url("API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

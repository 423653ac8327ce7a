use std::time::Duration;

use reqwest::Client;

use crate::{
    types::{ConverterResponse, DownloadLink},
    warning,
};

/// Turns a video URL into a direct MP3 link through the RapidAPI conversion
/// service.
///
/// Every failure is logged and reported as `None`; the caller skips the track.
#[derive(Clone)]
pub struct LinkResolver {
    client: Client,
    api_url: String,
    api_host: String,
    api_key: String,
    timeout: Duration,
}

impl LinkResolver {
    pub fn new(
        client: Client,
        api_url: String,
        api_host: String,
        api_key: String,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            api_url,
            api_host,
            api_key,
            timeout,
        }
    }

    pub async fn resolve(&self, video_url: &str) -> Option<DownloadLink> {
        match self.fetch_link(video_url).await {
            Ok(Some(url)) => Some(DownloadLink { url }),
            Ok(None) => None,
            Err(e) => {
                warning!("Error fetching download link for {}: {}", video_url, e);
                None
            }
        }
    }

    async fn fetch_link(&self, video_url: &str) -> crate::Res<Option<String>> {
        // `query` percent-encodes the video URL
        let body = self
            .client
            .get(&self.api_url)
            .query(&[("url", video_url)])
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: ConverterResponse = serde_json::from_str(&body)?;
        Ok(response.dlink.filter(|link| !link.trim().is_empty()))
    }
}

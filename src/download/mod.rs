//! # Download Pipeline
//!
//! Turns a batch of `{name, artist}` track requests into MP3 files in the
//! downloads directory. Each track goes through three stages:
//!
//! ```text
//! TrackRequest ──search──> VideoMatch ──convert──> DownloadLink ──stream──> downloads/<name>.mp3
//! ```
//!
//! - [`search::VideoResolver`] finds the first YouTube result for `"<name> <artist>"`
//! - [`link::LinkResolver`] asks the conversion service for a direct MP3 link
//! - [`persist::FilePersister`] streams that link into the downloads directory
//!
//! [`Downloader::run`] drives the stages for every track of a batch, strictly
//! one track at a time and in input order. A track that fails at any stage
//! is logged and skipped; the batch itself never fails. Per-track results
//! are returned as a [`BatchReport`] and handed to an observer callback as
//! they happen.
//!
//! Input validation for the HTTP surface lives in [`tracks`].

pub mod link;
pub mod persist;
pub mod search;
pub mod tracks;

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::{
    config::DownloadSettings,
    info, success,
    types::{BatchReport, TrackOutcome, TrackRequest},
    warning,
};

use link::LinkResolver;
use persist::FilePersister;
use search::VideoResolver;

pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Clone)]
pub struct Downloader {
    videos: VideoResolver,
    links: LinkResolver,
    files: FilePersister,
}

impl Downloader {
    /// Builds the pipeline with one shared HTTP client.
    ///
    /// The request timeout bounds connecting and every read, so a stalled
    /// upstream cannot hang a batch forever while long audio streams still
    /// complete.
    pub fn new(settings: DownloadSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(settings.request_timeout)
            .read_timeout(settings.request_timeout)
            .build()?;

        Ok(Self::from_parts(
            VideoResolver::new(
                client.clone(),
                settings.video_search_url,
                settings.request_timeout,
            ),
            LinkResolver::new(
                client.clone(),
                settings.converter_url,
                settings.converter_host,
                settings.converter_api_key,
                settings.request_timeout,
            ),
            FilePersister::new(client, settings.downloads_dir),
        ))
    }

    pub fn from_parts(videos: VideoResolver, links: LinkResolver, files: FilePersister) -> Self {
        Self {
            videos,
            links,
            files,
        }
    }

    pub fn persister(&self) -> &FilePersister {
        &self.files
    }

    /// Downloads every track of the batch, in order, skipping failures.
    ///
    /// `on_track` is called after each track with its index and outcome.
    /// Once `cancel` fires, the track in flight is abandoned and all
    /// remaining tracks are reported as cancelled without any network calls.
    pub async fn run<F>(
        &self,
        tracks: &[TrackRequest],
        cancel: &CancellationToken,
        mut on_track: F,
    ) -> BatchReport
    where
        F: FnMut(usize, &TrackRequest, &TrackOutcome),
    {
        info!("Starting batch of {} track(s)", tracks.len());
        let mut report = BatchReport::default();

        for (index, track) in tracks.iter().enumerate() {
            let outcome = if cancel.is_cancelled() {
                TrackOutcome::Cancelled
            } else {
                tokio::select! {
                    _ = cancel.cancelled() => TrackOutcome::Cancelled,
                    outcome = self.download_track(track) => outcome,
                }
            };

            if outcome == TrackOutcome::Cancelled {
                warning!("Skipping {}: batch cancelled", track.name);
            }

            on_track(index, track, &outcome);
            report.push(track, outcome);
        }

        info!(
            "Batch finished: {} downloaded, {} failed",
            report.succeeded(),
            report.failed()
        );
        report
    }

    /// Runs search, conversion and download for one track.
    pub async fn download_track(&self, track: &TrackRequest) -> TrackOutcome {
        let query = track.query();

        info!("Searching YouTube for: {}", query);
        let video = match self.videos.resolve(&query).await {
            Ok(Some(video)) => video,
            Ok(None) => {
                warning!("No results found for {}", query);
                return TrackOutcome::VideoNotFound;
            }
            Err(e) => {
                warning!("Error searching for {}: {}", query, e);
                return TrackOutcome::SearchFailed(e.to_string());
            }
        };
        info!("Found video URL: {}", video.url);

        let Some(link) = self.links.resolve(&video.url).await else {
            warning!("No download link found for {}", track.name);
            return TrackOutcome::LinkNotFound;
        };
        info!("Download link: {}", link.url);

        match self.files.save(&link.url, &track.name).await {
            Ok(path) => {
                success!("Successfully downloaded: {}", track.name);
                TrackOutcome::Downloaded(path)
            }
            Err(e) => {
                warning!("Error downloading {}: {}", track.name, e);
                TrackOutcome::SaveFailed(e.to_string())
            }
        }
    }
}

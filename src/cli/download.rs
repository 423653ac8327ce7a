use std::{path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;
use tokio_util::sync::CancellationToken;

use crate::{
    config,
    download::{Downloader, tracks},
    error, info, success,
    types::TrackTableRow,
    warning,
};

/// Downloads a batch given as JSON on the command line or in a file.
///
/// Accepts the same shapes as `POST /download`: one `{name, artist}` object
/// or an array of them.
pub async fn download(tracks_json: Option<String>, file: Option<PathBuf>) {
    let raw = match (tracks_json, file) {
        (Some(json), _) => json,
        (None, Some(path)) => match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => error!("Cannot read {}: {}", path.display(), e),
        },
        (None, None) => error!("Pass the tracks with --tracks or --file."),
    };

    let requests = match tracks::from_form(&raw) {
        Ok(requests) => requests,
        Err(e) => error!("Invalid tracks data: {}", e),
    };

    let settings = match config::download_settings() {
        Ok(settings) => settings,
        Err(e) => error!("Cannot load download settings: {}", e),
    };
    let downloader = match Downloader::new(settings) {
        Ok(d) => d,
        Err(e) => error!("Cannot create HTTP client: {}", e),
    };

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Cancelling remaining downloads...");
            ctrl_c.cancel();
        }
    });

    let pb = ProgressBar::new(requests.len() as u64);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let report = downloader
        .run(&requests, &cancel, |_, track, _| {
            pb.set_message(track.name.clone());
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    let rows: Vec<TrackTableRow> = report
        .tracks
        .iter()
        .map(|t| TrackTableRow {
            name: t.name.clone(),
            artist: t.artist.clone(),
            result: t.outcome.to_string(),
        })
        .collect();
    println!("{}", Table::new(rows));

    if report.failed() == 0 {
        success!("All {} track(s) downloaded.", report.succeeded());
    } else {
        warning!(
            "{} of {} track(s) could not be downloaded.",
            report.failed(),
            report.tracks.len()
        );
    }
}

//! HTML pages of the web interface.
//!
//! Pages are plain strings built with `format!`; every value coming from
//! Spotify goes through [`escape_html`] first.

use axum::response::Html;

use crate::{
    types::{Playlist, Track, TrackRequest},
    utils::escape_html,
};

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape_html(title),
        body = body
    ))
}

pub fn index_page(logged_in: bool) -> Html<String> {
    let body = if logged_in {
        r#"<p><a href="/playlists">Your playlists</a> | <a href="/logout">Log out</a></p>"#
    } else {
        r#"<p><a href="/login">Log in with Spotify</a></p>"#
    };
    layout("tunegrab", body)
}

pub fn playlists_page(playlists: &[Playlist]) -> Html<String> {
    if playlists.is_empty() {
        return layout("Your playlists", "<p>No playlists found.</p>");
    }

    let items: String = playlists
        .iter()
        .map(|p| {
            let count = p.tracks.as_ref().map(|t| t.total).unwrap_or(0);
            format!(
                r#"<li><a href="/playlist/{id}">{name}</a> ({count} tracks)</li>"#,
                id = escape_html(&p.id),
                name = escape_html(&p.name),
                count = count
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    layout("Your playlists", &format!("<ul>\n{}\n</ul>", items))
}

/// Track list with one form per track and a "download all" form.
///
/// Forms post `tracks` as a JSON string: a single object per track, an array
/// for the whole playlist.
pub fn playlist_page(playlist_id: &str, tracks: &[Track]) -> Html<String> {
    let title = format!("Playlist {}", playlist_id);
    if tracks.is_empty() {
        return layout(&title, r#"<p>This playlist has no tracks.</p><p><a href="/playlists">Back</a></p>"#);
    }

    let requests: Vec<TrackRequest> = tracks.iter().map(Track::to_request).collect();

    let rows: String = requests
        .iter()
        .map(|request| {
            format!(
                "<li>{name} - {artist} {form}</li>",
                name = escape_html(&request.name),
                artist = escape_html(&request.artist),
                form = download_form(&serde_json::to_string(request).unwrap_or_default(), "Download")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let all = download_form(
        &serde_json::to_string(&requests).unwrap_or_default(),
        "Download all",
    );

    layout(
        &title,
        &format!(
            "{}\n<ol>\n{}\n</ol>\n<p><a href=\"/playlists\">Back</a></p>",
            all, rows
        ),
    )
}

fn download_form(tracks_json: &str, label: &str) -> String {
    format!(
        r#"<form method="post" action="/download" style="display:inline"><input type="hidden" name="tracks" value="{tracks}"><button type="submit">{label}</button></form>"#,
        tracks = escape_html(tracks_json),
        label = escape_html(label)
    )
}

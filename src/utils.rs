use rand::{Rng, distr::Alphanumeric};

const UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
const MAX_FILENAME_CHARS: usize = 200;

/// Random alphanumeric string, used for session ids, OAuth state and
/// temporary file suffixes.
pub fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_session_id() -> String {
    random_token(32)
}

pub fn generate_oauth_state() -> String {
    random_token(16)
}

/// Turns a track name into a safe file stem.
///
/// Path separators, reserved characters and control characters become `_`,
/// surrounding whitespace and leading dots are dropped so the result can
/// never escape the downloads directory or become a hidden file.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if UNSAFE_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim().trim_start_matches('.').trim_start();
    let capped: String = trimmed.chars().take(MAX_FILENAME_CHARS).collect();
    let capped = capped.trim_end();

    if capped.is_empty() {
        "untitled".to_string()
    } else {
        capped.to_string()
    }
}

/// Escapes text for use inside HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Finds a cookie value in a raw `Cookie` header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

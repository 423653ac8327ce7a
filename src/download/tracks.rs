//! Normalization of the `tracks` field accepted by `POST /download`.
//!
//! Callers may send a single `{name, artist}` object, an array of them, or
//! either of those serialized into a JSON string (which is what the HTML
//! forms post). All of them become the same ordered `Vec<TrackRequest>`.

use std::fmt;

use serde_json::Value;

use crate::types::TrackRequest;

#[derive(Debug, PartialEq, Eq)]
pub enum InputError {
    Body(String),
    Missing,
    InvalidJson(String),
    NotAList,
    Empty,
    InvalidTrack { index: usize, reason: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Body(e) => write!(f, "request body is invalid: {}", e),
            InputError::Missing => write!(f, "tracks field is missing"),
            InputError::InvalidJson(e) => write!(f, "tracks is not valid JSON: {}", e),
            InputError::NotAList => write!(f, "parsed tracks data is not an array or object"),
            InputError::Empty => write!(f, "tracks list is empty"),
            InputError::InvalidTrack { index, reason } => {
                write!(f, "track #{} is invalid: {}", index, reason)
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Normalizes any accepted `tracks` shape into a non-empty ordered list.
pub fn normalize(value: &Value) -> Result<Vec<TrackRequest>, InputError> {
    match value {
        Value::String(raw) => from_form(raw),
        other => normalize_parsed(other),
    }
}

/// Normalizes the string form of `tracks`, as posted by an urlencoded form.
pub fn from_form(raw: &str) -> Result<Vec<TrackRequest>, InputError> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|e| InputError::InvalidJson(e.to_string()))?;
    // only one level of string encoding is unwrapped
    normalize_parsed(&parsed)
}

fn normalize_parsed(value: &Value) -> Result<Vec<TrackRequest>, InputError> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![value],
        _ => return Err(InputError::NotAList),
    };

    if items.is_empty() {
        return Err(InputError::Empty);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| to_track(index, item))
        .collect()
}

fn to_track(index: usize, item: &Value) -> Result<TrackRequest, InputError> {
    if !item.is_object() {
        return Err(InputError::InvalidTrack {
            index,
            reason: "not an object".to_string(),
        });
    }

    let track: TrackRequest =
        serde_json::from_value(item.clone()).map_err(|e| InputError::InvalidTrack {
            index,
            reason: e.to_string(),
        })?;

    if track.name.trim().is_empty() {
        return Err(InputError::InvalidTrack {
            index,
            reason: "name is empty".to_string(),
        });
    }

    Ok(track)
}

use std::{fmt, time::Duration};

use reqwest::Client;
use serde_json::Value;

use crate::types::VideoMatch;

const INITIAL_DATA_MARKERS: &[&str] = &["var ytInitialData = ", "window[\"ytInitialData\"] = "];
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug)]
pub enum SearchError {
    Http(reqwest::Error),
    Malformed(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Http(e) => write!(f, "search request failed: {}", e),
            SearchError::Malformed(reason) => write!(f, "malformed search response: {}", reason),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Http(err)
    }
}

/// Looks up the best YouTube match for a free-text query.
///
/// Fetches the search results page and reads the `ytInitialData` document
/// embedded in it. The first video in the upstream ranking wins; nothing is
/// filtered or re-scored.
#[derive(Clone)]
pub struct VideoResolver {
    client: Client,
    search_url: String,
    timeout: Duration,
}

impl VideoResolver {
    pub fn new(client: Client, search_url: String, timeout: Duration) -> Self {
        Self {
            client,
            search_url,
            timeout,
        }
    }

    /// Returns `Ok(None)` when the search has no video results, and an error
    /// when the page could not be fetched or understood.
    pub async fn resolve(&self, query: &str) -> Result<Option<VideoMatch>, SearchError> {
        let body = self
            .client
            .get(&self.search_url)
            .query(&[("search_query", query)])
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if body.trim().is_empty() {
            return Ok(None);
        }

        let data = extract_initial_data(&body)?;
        Ok(first_video_id(&data)?.map(|id| VideoMatch {
            url: format!("{}{}", WATCH_URL, id),
        }))
    }
}

/// Pulls the `ytInitialData` JSON document out of a results page.
pub fn extract_initial_data(page: &str) -> Result<Value, SearchError> {
    let start = INITIAL_DATA_MARKERS
        .iter()
        .find_map(|marker| page.find(marker).map(|idx| idx + marker.len()))
        .ok_or_else(|| SearchError::Malformed("ytInitialData not found".to_string()))?;

    // the document is followed by `;</script>`, so only read the first value
    serde_json::Deserializer::from_str(&page[start..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| SearchError::Malformed("ytInitialData is empty".to_string()))?
        .map_err(|e| SearchError::Malformed(e.to_string()))
}

const SECTION_LIST_POINTER: &str =
    "/contents/twoColumnSearchResultsRenderer/primaryContents/sectionListRenderer/contents";

/// First `videoRenderer.videoId` of the primary search results, in order.
///
/// A document without the result section list is malformed; a section list
/// without any video is an empty result.
pub fn first_video_id(data: &Value) -> Result<Option<String>, SearchError> {
    let sections = data
        .pointer(SECTION_LIST_POINTER)
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::Malformed("search results section not found".to_string()))?;

    Ok(sections
        .iter()
        .filter_map(|section| section.pointer("/itemSectionRenderer/contents")?.as_array())
        .flatten()
        .find_map(|item| {
            item.pointer("/videoRenderer/videoId")?
                .as_str()
                .filter(|id| !id.is_empty())
                .map(str::to_string)
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn results(items: Value) -> Value {
        json!({
            "contents": {
                "twoColumnSearchResultsRenderer": {
                    "primaryContents": {
                        "sectionListRenderer": {
                            "contents": [
                                { "itemSectionRenderer": { "contents": items } }
                            ]
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn picks_first_video_and_skips_other_renderers() {
        let data = results(json!([
            { "shelfRenderer": { "title": "People also watched" } },
            { "channelRenderer": { "channelId": "UC123" } },
            { "videoRenderer": { "videoId": "first" } },
            { "videoRenderer": { "videoId": "second" } }
        ]));
        assert_eq!(first_video_id(&data).unwrap(), Some("first".to_string()));
    }

    #[test]
    fn no_videos_means_none() {
        let data = results(json!([{ "channelRenderer": { "channelId": "UC123" } }]));
        assert_eq!(first_video_id(&data).unwrap(), None);
        assert_eq!(first_video_id(&results(json!([]))).unwrap(), None);
    }

    #[test]
    fn missing_results_section_is_malformed() {
        for data in [
            json!({}),
            json!({ "responseContext": {}, "onResponseReceivedCommands": [] }),
            json!({ "contents": { "twoColumnSearchResultsRenderer": { "primaryContents": {
                "sectionListRenderer": { "contents": {} } } } } }),
        ] {
            let err = first_video_id(&data).unwrap_err();
            assert!(matches!(err, SearchError::Malformed(_)), "data: {}", data);
        }
    }

    #[test]
    fn extracts_initial_data_from_page() {
        let page = r#"<html><script>var ytInitialData = {"a":{"b":[1,2]}};</script><script>var other = {};</script></html>"#;
        let data = extract_initial_data(page).unwrap();
        assert_eq!(data, json!({"a": {"b": [1, 2]}}));
    }

    #[test]
    fn page_without_initial_data_is_malformed() {
        let err = extract_initial_data("<html>nothing here</html>").unwrap_err();
        assert!(matches!(err, SearchError::Malformed(_)));
    }
}

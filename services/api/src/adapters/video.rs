//! services/api/src/adapters/video.rs
//!
//! This module contains the adapter for instructional video lookups. It
//! implements the `VideoLookupService` port from the `core` crate against the
//! YouTube Data API: a search call for candidate ids followed by a details
//! call for durations and thumbnails.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use skoolme_core::{
    domain::VideoSuggestion,
    ports::{PortError, PortResult, VideoLookupService},
};

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const DETAILS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `VideoLookupService` against the YouTube Data API.
#[derive(Clone)]
pub struct YouTubeVideoAdapter {
    http: reqwest::Client,
    api_key: String,
}

impl YouTubeVideoAdapter {
    /// Creates a new `YouTubeVideoAdapter`.
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self { http, api_key }
    }
}

//=========================================================================================
// Wire Response Shapes
//=========================================================================================

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    items: Vec<DetailsItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailsItem {
    id: String,
    snippet: Snippet,
    content_details: ContentDetails,
}

#[derive(Deserialize)]
struct Snippet {
    title: String,
    thumbnails: Thumbnails,
}

#[derive(Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    #[serde(rename = "default")]
    fallback: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    duration: String,
}

/// Parses an ISO 8601 duration like `PT1H2M3S` into seconds. Unparseable
/// input counts as zero, which the minimum-duration filter then drops.
fn parse_iso8601_seconds(duration: &str) -> u32 {
    let re = Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").unwrap();
    let Some(captures) = re.captures(duration) else {
        return 0;
    };
    let part = |i: usize| -> u32 {
        captures
            .get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    part(1) * 3600 + part(2) * 60 + part(3)
}

//=========================================================================================
// `VideoLookupService` Trait Implementation
//=========================================================================================

#[async_trait]
impl VideoLookupService for YouTubeVideoAdapter {
    async fn search(&self, query: &str, max_results: u8) -> PortResult<Vec<VideoSuggestion>> {
        let search: SearchResponse = self
            .http
            .get(SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", &max_results.to_string()),
                ("q", query),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let video_ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let details: DetailsResponse = self
            .http
            .get(DETAILS_URL)
            .query(&[
                ("part", "contentDetails,snippet"),
                ("id", &video_ids.join(",")),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let suggestions = details
            .items
            .into_iter()
            .map(|item| {
                let thumbnail_url = item
                    .snippet
                    .thumbnails
                    .medium
                    .or(item.snippet.thumbnails.fallback)
                    .map(|t| t.url)
                    .unwrap_or_default();
                VideoSuggestion {
                    url: format!("https://www.youtube.com/watch?v={}", item.id),
                    title: item.snippet.title,
                    duration_seconds: parse_iso8601_seconds(&item.content_details.duration),
                    thumbnail_url,
                    video_id: item.id,
                }
            })
            .collect();
        Ok(suggestions)
    }
}

/// Stands in for the video port when no YouTube API key is configured.
/// Every search succeeds with no results, which the engine renders as
/// "no suggestions" rather than an error.
pub struct DisabledVideoLookup;

#[async_trait]
impl VideoLookupService for DisabledVideoLookup {
    async fn search(&self, _query: &str, _max_results: u8) -> PortResult<Vec<VideoSuggestion>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_and_partial_durations() {
        assert_eq!(parse_iso8601_seconds("PT1H2M3S"), 3723);
        assert_eq!(parse_iso8601_seconds("PT4M13S"), 253);
        assert_eq!(parse_iso8601_seconds("PT59S"), 59);
        assert_eq!(parse_iso8601_seconds("PT2H"), 7200);
    }

    #[test]
    fn garbage_durations_count_as_zero() {
        assert_eq!(parse_iso8601_seconds("whenever"), 0);
        assert_eq!(parse_iso8601_seconds(""), 0);
    }
}

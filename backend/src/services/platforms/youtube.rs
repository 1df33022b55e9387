use super::{api_error, endpoint, FetchError, FetchResult, Metrics};
use lazy_static::lazy_static;
use log::info;
use reqwest::Client;
use serde_json::Value;
use url::Url;

lazy_static! {
    static ref DATA_API_URL: Url =
        Url::parse("https://www.googleapis.com/youtube/v3").expect("valid YouTube Data API URL");
}

/// Video statistics from the YouTube Data API v3.
pub struct YouTubeAdapter {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
}

impl YouTubeAdapter {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, DATA_API_URL.clone())
    }

    pub fn with_base_url(client: Client, api_key: Option<String>, base_url: Url) -> Self {
        YouTubeAdapter {
            client,
            api_key,
            base_url,
        }
    }

    pub async fn fetch_metrics(&self, video_id: &str) -> FetchResult {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingCredential("YouTube API key"))?;

        info!("Fetching YouTube stats for: {video_id}");

        // Documentation: https://developers.google.com/youtube/v3/docs/videos/list
        let response = self
            .client
            .get(endpoint(&self.base_url, &["videos"])?)
            .query(&[("part", "statistics"), ("id", video_id), ("key", api_key)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response, "Video not found").await);
        }

        let body: Value = response.json().await?;
        metrics_from_listing(&body)
    }
}

fn metrics_from_listing(body: &Value) -> FetchResult {
    let statistics = match body["items"].as_array().and_then(|items| items.first()) {
        Some(item) => &item["statistics"],
        None => return Err(FetchError::NotFound("Video not found")),
    };

    Ok(Metrics {
        views: parse_count(&statistics["viewCount"]),
        likes: parse_count(&statistics["likeCount"]),
        comments: parse_count(&statistics["commentCount"]),
        // The Data API has no share counter.
        shares: 0,
    })
}

/// Counts arrive as decimal strings; anything unparsable is zero.
fn parse_count(value: &Value) -> u64 {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| value.as_u64())
        .unwrap_or(0)
}

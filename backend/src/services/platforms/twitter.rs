use super::{api_error, endpoint, FetchError, FetchResult, Metrics};
use lazy_static::lazy_static;
use log::info;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

lazy_static! {
    static ref TWITTER_API_URL: Url =
        Url::parse("https://api.twitter.com/2").expect("valid Twitter API URL");
}

#[derive(Debug, Deserialize)]
struct TweetLookup {
    data: Option<Tweet>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    #[serde(default)]
    public_metrics: PublicMetrics,
}

#[derive(Debug, Default, Deserialize)]
struct PublicMetrics {
    #[serde(default)]
    impression_count: u64,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    reply_count: u64,
    #[serde(default)]
    retweet_count: u64,
}

impl TweetLookup {
    fn into_metrics(self) -> FetchResult {
        let metrics = self
            .data
            .ok_or(FetchError::NotFound("Tweet not found"))?
            .public_metrics;

        Ok(Metrics {
            views: metrics.impression_count,
            likes: metrics.like_count,
            comments: metrics.reply_count,
            shares: metrics.retweet_count,
        })
    }
}

/// Tweet public metrics from the Twitter/X API v2.
pub struct TwitterAdapter {
    client: Client,
    bearer_token: Option<String>,
    base_url: Url,
}

impl TwitterAdapter {
    pub fn new(client: Client, bearer_token: Option<String>) -> Self {
        Self::with_base_url(client, bearer_token, TWITTER_API_URL.clone())
    }

    pub fn with_base_url(client: Client, bearer_token: Option<String>, base_url: Url) -> Self {
        TwitterAdapter {
            client,
            bearer_token,
            base_url,
        }
    }

    pub async fn fetch_metrics(&self, tweet_id: &str) -> FetchResult {
        let bearer_token = self
            .bearer_token
            .as_deref()
            .ok_or(FetchError::MissingCredential("Twitter API token"))?;

        info!("Fetching Twitter stats for: {tweet_id}");

        let response = self
            .client
            .get(endpoint(&self.base_url, &["tweets", tweet_id])?)
            .bearer_auth(bearer_token)
            .query(&[("tweet.fields", "public_metrics")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response, "Tweet not found").await);
        }

        response.json::<TweetLookup>().await?.into_metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::platforms::test_server::{client, serve_once};
    use serde_json::json;

    #[test]
    fn maps_public_metrics() {
        let lookup: TweetLookup = serde_json::from_value(json!({
            "data": {
                "id": "12345",
                "text": "clip",
                "public_metrics": {
                    "retweet_count": 4,
                    "reply_count": 6,
                    "like_count": 90,
                    "quote_count": 1,
                    "bookmark_count": 2,
                    "impression_count": 2048
                }
            }
        }))
        .unwrap();

        assert_eq!(
            lookup.into_metrics().unwrap(),
            Metrics {
                views: 2048,
                likes: 90,
                comments: 6,
                shares: 4
            }
        );
    }

    #[test]
    fn missing_data_is_not_found() {
        let lookup: TweetLookup = serde_json::from_value(json!({
            "errors": [{
                "value": "12345",
                "detail": "Could not find tweet with id: [12345].",
                "title": "Not Found Error"
            }]
        }))
        .unwrap();

        let err = lookup.into_metrics().unwrap_err();
        assert_eq!(err.to_string(), "Tweet not found");
    }

    #[tokio::test]
    async fn missing_token_fails_without_network() {
        let adapter = TwitterAdapter::new(Client::new(), None);
        let err = adapter.fetch_metrics("42").await.unwrap_err();
        assert_eq!(err.to_string(), "Twitter API token not configured");
    }

    #[tokio::test]
    async fn sends_bearer_token_and_metric_fields() {
        let (base, request) = serve_once(
            200,
            r#"{"data":{"id":"42","text":"clip","public_metrics":{"retweet_count":4,"reply_count":6,"like_count":90,"impression_count":2048}}}"#,
        )
        .await;
        let adapter = TwitterAdapter::with_base_url(client(), Some("tw-token".into()), base);

        let metrics = adapter.fetch_metrics("42").await.unwrap();
        assert_eq!(
            metrics,
            Metrics {
                views: 2048,
                likes: 90,
                comments: 6,
                shares: 4
            }
        );

        let request = request.await.unwrap();
        assert_eq!(request.path, "/base/tweets/42");
        assert_eq!(request.query["tweet.fields"], "public_metrics");
        assert_eq!(request.headers["authorization"], "Bearer tw-token");
        assert!(!request.query.values().any(|v| v.contains("tw-token")));
    }

    #[tokio::test]
    async fn not_found_status_is_tweet_not_found() {
        let (base, _request) = serve_once(404, "{}").await;
        let adapter = TwitterAdapter::with_base_url(client(), Some("tw-token".into()), base);

        let err = adapter.fetch_metrics("42").await.unwrap_err();
        assert_eq!(err.to_string(), "Tweet not found");
    }

    #[tokio::test]
    async fn unauthorized_detail_is_kept() {
        let (base, _request) = serve_once(
            401,
            r#"{"title":"Unauthorized","type":"about:blank","status":401,"detail":"Unauthorized"}"#,
        )
        .await;
        let adapter = TwitterAdapter::with_base_url(client(), Some("tw-token".into()), base);

        let err = adapter.fetch_metrics("42").await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status code 401: Unauthorized");
    }
}

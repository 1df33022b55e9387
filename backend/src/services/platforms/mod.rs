pub mod facebook;
pub mod twitter;
pub mod youtube;

use crate::models::{Clip, MetricsSnapshot, Platform};
use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

pub use facebook::FacebookAdapter;
pub use twitter::TwitterAdapter;
pub use youtube::YouTubeAdapter;

/// Engagement counters as reported by a platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0} not configured")]
    MissingCredential(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Request failed with status code {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Transport(reqwest::Error),

    #[error("Invalid endpoint URL: {0}")]
    Endpoint(String),
}

impl FetchError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, FetchError::MissingCredential(_))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        // Query strings carry credentials; keep them out of the message.
        FetchError::Transport(e.without_url())
    }
}

pub type FetchResult = Result<Metrics, FetchError>;

impl From<FetchResult> for MetricsSnapshot {
    fn from(result: FetchResult) -> Self {
        match result {
            Ok(metrics) => MetricsSnapshot {
                views: metrics.views,
                likes: metrics.likes,
                comments: metrics.comments,
                shares: metrics.shares,
                error: None,
            },
            Err(e) => MetricsSnapshot::failed(e.to_string()),
        }
    }
}

/// Credentials for the platform APIs. Empty values count as missing.
#[derive(Debug, Clone, Default)]
pub struct PlatformCredentials {
    pub facebook_access_token: Option<String>,
    pub youtube_api_key: Option<String>,
    pub twitter_bearer_token: Option<String>,
}

impl PlatformCredentials {
    pub fn new(
        facebook_access_token: Option<String>,
        youtube_api_key: Option<String>,
        twitter_bearer_token: Option<String>,
    ) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        PlatformCredentials {
            facebook_access_token: present(facebook_access_token),
            youtube_api_key: present(youtube_api_key),
            twitter_bearer_token: present(twitter_bearer_token),
        }
    }
}

pub enum PlatformAdapter {
    Facebook(FacebookAdapter),
    YouTube(YouTubeAdapter),
    Twitter(TwitterAdapter),
}

impl PlatformAdapter {
    pub fn platform(&self) -> Platform {
        match self {
            PlatformAdapter::Facebook(_) => Platform::Facebook,
            PlatformAdapter::YouTube(_) => Platform::YouTube,
            PlatformAdapter::Twitter(_) => Platform::Twitter,
        }
    }

    pub async fn fetch_metrics(&self, content_id: &str) -> FetchResult {
        match self {
            PlatformAdapter::Facebook(adapter) => adapter.fetch_metrics(content_id).await,
            PlatformAdapter::YouTube(adapter) => adapter.fetch_metrics(content_id).await,
            PlatformAdapter::Twitter(adapter) => adapter.fetch_metrics(content_id).await,
        }
    }

    /// Fetch and flatten into the zero-filled record. Never fails.
    pub async fn fetch(&self, content_id: &str) -> MetricsSnapshot {
        let result = self.fetch_metrics(content_id).await;

        match &result {
            Ok(metrics) => debug!("{} stats for {content_id}: {metrics:?}", self.platform()),
            Err(e) if e.is_configuration() => {
                warn!("Skipping {} stats for {content_id}: {e}", self.platform())
            }
            Err(e) => error!("{} API error for {content_id}: {e}", self.platform()),
        }

        MetricsSnapshot::from(result)
    }
}

/// Source of metrics for a single clip.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn stats_for(&self, clip: &Clip) -> MetricsSnapshot;
}

/// Selects the adapter for a clip's platform.
pub struct PlatformRouter {
    facebook: PlatformAdapter,
    youtube: PlatformAdapter,
    twitter: PlatformAdapter,
}

impl PlatformRouter {
    pub fn new(client: Client, credentials: PlatformCredentials) -> Self {
        PlatformRouter {
            facebook: PlatformAdapter::Facebook(FacebookAdapter::new(
                client.clone(),
                credentials.facebook_access_token,
            )),
            youtube: PlatformAdapter::YouTube(YouTubeAdapter::new(
                client.clone(),
                credentials.youtube_api_key,
            )),
            twitter: PlatformAdapter::Twitter(TwitterAdapter::new(
                client,
                credentials.twitter_bearer_token,
            )),
        }
    }

    pub fn from_adapters(
        facebook: FacebookAdapter,
        youtube: YouTubeAdapter,
        twitter: TwitterAdapter,
    ) -> Self {
        PlatformRouter {
            facebook: PlatformAdapter::Facebook(facebook),
            youtube: PlatformAdapter::YouTube(youtube),
            twitter: PlatformAdapter::Twitter(twitter),
        }
    }

    pub fn route(&self, platform: &Platform) -> Option<&PlatformAdapter> {
        match platform {
            Platform::Facebook => Some(&self.facebook),
            Platform::YouTube => Some(&self.youtube),
            Platform::Twitter => Some(&self.twitter),
            Platform::Other(_) => None,
        }
    }
}

#[async_trait]
impl StatsSource for PlatformRouter {
    async fn stats_for(&self, clip: &Clip) -> MetricsSnapshot {
        match (clip.video_id.as_deref(), self.route(&clip.platform)) {
            (Some(content_id), Some(adapter)) => adapter.fetch(content_id).await,
            _ => {
                debug!(
                    "No stats source for clip {} ({}, id {:?})",
                    clip.id, clip.platform, clip.video_id
                );
                MetricsSnapshot::default()
            }
        }
    }
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| FetchError::Endpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turn a non-success response into a `FetchError`, keeping the platform's
/// own error message when the body has one.
async fn api_error(response: Response, not_found: &'static str) -> FetchError {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return FetchError::NotFound(not_found);
    }

    let body: Value = response.json().await.unwrap_or(Value::Null);
    let message = body["error"]["message"]
        .as_str()
        .or_else(|| body["detail"].as_str())
        .or_else(|| body["errors"][0]["message"].as_str())
        .or_else(|| status.canonical_reason())
        .unwrap_or("unknown error")
        .to_string();

    FetchError::Api {
        status: status.as_u16(),
        message,
    }
}

/// One-shot HTTP listener that answers a single request with a canned
/// response, for exercising adapters against a local base URL.
#[cfg(test)]
pub(crate) mod test_server {
    use reqwest::Client;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use url::Url;

    #[derive(Debug)]
    pub struct RecordedRequest {
        pub method: String,
        pub path: String,
        pub query: HashMap<String, String>,
        /// Header names are lower-cased.
        pub headers: HashMap<String, String>,
    }

    impl RecordedRequest {
        fn parse(head: &str) -> Self {
            let mut lines = head.split("\r\n");
            let mut request_line = lines.next().unwrap_or_default().split(' ');
            let method = request_line.next().unwrap_or_default().to_string();
            let target = request_line.next().unwrap_or_default();

            let url = Url::parse("http://localhost").unwrap().join(target).unwrap();
            let headers = lines
                .filter_map(|line| line.split_once(':'))
                .map(|(name, value)| (name.trim().to_lowercase(), value.trim().to_string()))
                .collect();

            RecordedRequest {
                method,
                path: url.path().to_string(),
                query: url.query_pairs().into_owned().collect(),
                headers,
            }
        }
    }

    /// Client that ignores proxy settings from the environment.
    pub fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    /// Bind a local port and answer its first request with `status` and a
    /// JSON `body`. Returns the base URL (`http://127.0.0.1:N/base`) and the
    /// request that was received.
    pub async fn serve_once(status: u16, body: &str) -> (Url, oneshot::Receiver<RecordedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = body.to_string();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let _ = tx.send(RecordedRequest::parse(&String::from_utf8_lossy(&head)));
        });

        (Url::parse(&format!("http://{addr}/base")).unwrap(), rx)
    }
}

use super::{api_error, endpoint, FetchError, FetchResult, Metrics};
use lazy_static::lazy_static;
use log::info;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

lazy_static! {
    static ref GRAPH_API_URL: Url =
        Url::parse("https://graph.facebook.com/v18.0").expect("valid Graph API URL");
}

const FIELDS: &str = "engagement,likes.summary(true),comments.summary(true),shares";

#[derive(Debug, Default, Deserialize)]
struct GraphObject {
    engagement: Option<Count>,
    likes: Option<Edge>,
    comments: Option<Edge>,
    shares: Option<Count>,
}

#[derive(Debug, Default, Deserialize)]
struct Count {
    #[serde(default)]
    count: u64,
}

#[derive(Debug, Default, Deserialize)]
struct Edge {
    summary: Option<Summary>,
}

#[derive(Debug, Default, Deserialize)]
struct Summary {
    #[serde(default)]
    total_count: u64,
}

impl From<GraphObject> for Metrics {
    fn from(object: GraphObject) -> Self {
        let total = |edge: Option<Edge>| {
            edge.and_then(|e| e.summary)
                .map(|s| s.total_count)
                .unwrap_or(0)
        };

        Metrics {
            views: object.engagement.map(|c| c.count).unwrap_or(0),
            likes: total(object.likes),
            comments: total(object.comments),
            shares: object.shares.map(|c| c.count).unwrap_or(0),
        }
    }
}

/// Post and video engagement from the Facebook Graph API.
pub struct FacebookAdapter {
    client: Client,
    access_token: Option<String>,
    base_url: Url,
}

impl FacebookAdapter {
    pub fn new(client: Client, access_token: Option<String>) -> Self {
        Self::with_base_url(client, access_token, GRAPH_API_URL.clone())
    }

    pub fn with_base_url(client: Client, access_token: Option<String>, base_url: Url) -> Self {
        FacebookAdapter {
            client,
            access_token,
            base_url,
        }
    }

    pub async fn fetch_metrics(&self, post_id: &str) -> FetchResult {
        let access_token = self
            .access_token
            .as_deref()
            .ok_or(FetchError::MissingCredential("Facebook API token"))?;

        info!("Fetching Facebook stats for: {post_id}");

        let response = self
            .client
            .get(endpoint(&self.base_url, &[post_id])?)
            .query(&[("fields", FIELDS), ("access_token", access_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response, "Post not found").await);
        }

        let object: GraphObject = response.json().await?;
        Ok(Metrics::from(object))
    }
}

use chrono::{DateTime, Utc};
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::serde::{Deserialize, Serialize};
use rocket::{response, Response};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;

/// Social platform a clip was posted on.
///
/// Tags outside the supported set are kept verbatim so they survive a
/// store round trip; the adapter router skips them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Facebook,
    YouTube,
    Twitter,
    Other(String),
}

impl Platform {
    pub fn as_str(&self) -> &str {
        match self {
            Platform::Facebook => "facebook",
            Platform::YouTube => "youtube",
            Platform::Twitter => "twitter",
            Platform::Other(tag) => tag,
        }
    }
}

impl From<&str> for Platform {
    fn from(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        match tag.as_str() {
            "facebook" => Platform::Facebook,
            "youtube" => Platform::YouTube,
            "twitter" => Platform::Twitter,
            _ => Platform::Other(tag),
        }
    }
}

impl From<String> for Platform {
    fn from(tag: String) -> Self {
        Platform::from(tag.as_str())
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.as_str().to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: String,
    pub clipper: String,
    pub platform: Platform,
    pub url: String,
    #[serde(default)]
    pub video_id: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Point-in-time engagement reading for one clip.
///
/// When `error` is set every counter is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetricsSnapshot {
    pub fn failed(reason: impl Into<String>) -> Self {
        MetricsSnapshot {
            error: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedClip {
    #[serde(flatten)]
    pub clip: Clip,
    pub stats: MetricsSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipperSummary {
    pub clipper: String,
    pub total_clips: u64,
    pub platforms: BTreeMap<String, u64>,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub total_shares: u64,
    pub clips: Vec<AnnotatedClip>,
}

impl ClipperSummary {
    pub fn new(clipper: &str) -> Self {
        ClipperSummary {
            clipper: clipper.to_string(),
            total_clips: 0,
            platforms: BTreeMap::new(),
            total_views: 0,
            total_likes: 0,
            total_comments: 0,
            total_shares: 0,
            clips: Vec::new(),
        }
    }
}

/// Submitted clip. Absent and `null` fields both deserialize to `None` and
/// are rejected during validation rather than by the JSON guard.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NewClipRequest {
    pub clipper: Option<String>,
    pub platform: Option<String>,
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteClipResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: Status,
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        ErrorResponse {
            status,
            error: status.reason().unwrap_or("Error").to_string(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(Status::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Status::InternalServerError, message)
    }
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let json = serde_json::to_string(&self).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}

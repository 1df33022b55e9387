use crate::models::{Clip, NewClipRequest, Platform};
use crate::services::clip_store::ClipStore;
use crate::utils::extract_video_id;
use chrono::Utc;
use log::{info, warn};
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;

static LAST_CLIP_ID: AtomicI64 = AtomicI64::new(0);

#[derive(Debug, Error)]
pub enum CreateClipError {
    #[error("Missing required fields")]
    MissingFields,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Creation time in epoch milliseconds, bumped past the last id handed out
/// so clips created within the same millisecond stay distinct.
fn next_clip_id(now_millis: i64) -> String {
    let previous = LAST_CLIP_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now_millis.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now_millis.max(previous + 1).to_string()
}

/// Validate a submitted clip, resolve its content id and append it.
pub async fn create_clip<S>(store: &S, request: NewClipRequest) -> Result<Clip, CreateClipError>
where
    S: ClipStore + ?Sized,
{
    fn field(value: Option<String>) -> String {
        value.as_deref().map(str::trim).unwrap_or("").to_string()
    }

    let clipper = field(request.clipper);
    let platform = field(request.platform);
    let url = field(request.url);
    if clipper.is_empty() || platform.is_empty() || url.is_empty() {
        return Err(CreateClipError::MissingFields);
    }

    let platform = Platform::from(platform.as_str());
    let video_id = extract_video_id(&url, &platform);
    if video_id.is_none() {
        warn!("No {platform} content id found in {url}; stats will be empty");
    }

    let now = Utc::now();
    let clip = Clip {
        id: next_clip_id(now.timestamp_millis()),
        clipper,
        platform,
        url,
        video_id,
        added_at: now,
    };

    store.append_clip(clip.clone()).await?;
    info!(
        "Added {} clip {} for {}",
        clip.platform, clip.id, clip.clipper
    );

    Ok(clip)
}

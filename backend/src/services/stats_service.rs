use crate::models::{AnnotatedClip, ClipperSummary};
use crate::services::aggregator::aggregate;
use crate::services::clip_store::ClipStore;
use crate::services::platforms::StatsSource;
use crate::services::stats_fetcher::fetch_all;
use anyhow::{Context, Result};
use std::time::Duration;

/// Fresh stats for every stored clip, in store order.
///
/// Only a failure to read the clip list is an error.
pub async fn refresh_stats<C, S>(
    store: &C,
    source: &S,
    pacing: Duration,
) -> Result<Vec<AnnotatedClip>>
where
    C: ClipStore + ?Sized,
    S: StatsSource + ?Sized,
{
    let clips = store.list_clips().await.context("Failed to load clips")?;
    Ok(fetch_all(source, clips, pacing).await)
}

/// Fresh stats aggregated per clipper, ranked by total views.
pub async fn stats_by_clipper<C, S>(
    store: &C,
    source: &S,
    pacing: Duration,
) -> Result<Vec<ClipperSummary>>
where
    C: ClipStore + ?Sized,
    S: StatsSource + ?Sized,
{
    let annotated = refresh_stats(store, source, pacing).await?;
    Ok(aggregate(annotated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Clip, MetricsSnapshot, Platform};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;

    struct MemoryStore(Vec<Clip>);

    #[async_trait]
    impl ClipStore for MemoryStore {
        async fn list_clips(&self) -> Result<Vec<Clip>> {
            Ok(self.0.clone())
        }

        async fn append_clip(&self, _clip: Clip) -> Result<()> {
            unimplemented!()
        }

        async fn remove_clip(&self, _id: &str) -> Result<bool> {
            unimplemented!()
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl ClipStore for BrokenStore {
        async fn list_clips(&self) -> Result<Vec<Clip>> {
            Err(anyhow::anyhow!("disk on fire"))
        }

        async fn append_clip(&self, _clip: Clip) -> Result<()> {
            unimplemented!()
        }

        async fn remove_clip(&self, _id: &str) -> Result<bool> {
            unimplemented!()
        }
    }

    /// Canned stats keyed by video id; clips without an id get empty stats.
    struct CannedSource(HashMap<&'static str, MetricsSnapshot>);

    #[async_trait]
    impl StatsSource for CannedSource {
        async fn stats_for(&self, clip: &Clip) -> MetricsSnapshot {
            clip.video_id
                .as_deref()
                .and_then(|id| self.0.get(id).cloned())
                .unwrap_or_default()
        }
    }

    fn clip(id: &str, clipper: &str, video_id: Option<&str>) -> Clip {
        Clip {
            id: id.to_string(),
            clipper: clipper.to_string(),
            platform: Platform::YouTube,
            url: String::new(),
            video_id: video_id.map(str::to_string),
            added_at: Utc::now(),
        }
    }

    fn snapshot(views: u64, likes: u64, comments: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            views,
            likes,
            comments,
            shares: 0,
            error: None,
        }
    }

    #[tokio::test]
    async fn ranks_clippers_from_fetched_stats() {
        let store = MemoryStore(vec![
            clip("1", "A", Some("v1")),
            clip("2", "B", Some("v2")),
        ]);
        let source = CannedSource(HashMap::from([
            ("v1", snapshot(100, 10, 1)),
            ("v2", snapshot(50, 5, 0)),
        ]));

        let summaries = stats_by_clipper(&store, &source, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].clipper, "A");
        assert_eq!(summaries[0].total_views, 100);
        assert_eq!(summaries[0].total_likes, 10);
        assert_eq!(summaries[0].total_comments, 1);
        assert_eq!(summaries[1].clipper, "B");
        assert_eq!(summaries[1].total_views, 50);
    }

    #[tokio::test]
    async fn clip_without_id_contributes_empty_stats() {
        let store = MemoryStore(vec![clip("1", "A", None)]);
        let source = CannedSource(HashMap::new());

        let annotated = refresh_stats(&store, &source, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated[0].stats, MetricsSnapshot::default());
    }

    #[tokio::test]
    async fn unreadable_store_fails_the_request() {
        let source = CannedSource(HashMap::new());

        let err = stats_by_clipper(&BrokenStore, &source, Duration::ZERO)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to load clips");
        assert_eq!(err.root_cause().to_string(), "disk on fire");
    }
}

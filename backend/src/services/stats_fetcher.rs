use crate::models::{AnnotatedClip, Clip};
use crate::services::platforms::StatsSource;
use log::info;
use std::time::Duration;
use tokio::time::sleep;

/// Fetch stats for every clip, one at a time and in input order.
///
/// `pacing` is slept between consecutive clips to stay under the platforms'
/// rate limits. A failed fetch only marks that clip's stats.
pub async fn fetch_all<S>(source: &S, clips: Vec<Clip>, pacing: Duration) -> Vec<AnnotatedClip>
where
    S: StatsSource + ?Sized,
{
    info!("Fetching stats for {} clips...", clips.len());

    let mut annotated = Vec::with_capacity(clips.len());
    let mut failed = 0;

    for (index, clip) in clips.into_iter().enumerate() {
        if index > 0 && !pacing.is_zero() {
            sleep(pacing).await;
        }

        let stats = source.stats_for(&clip).await;
        if stats.is_error() {
            failed += 1;
        }

        annotated.push(AnnotatedClip { clip, stats });
    }

    info!(
        "Stats fetch completed: {} clips, {failed} failed.",
        annotated.len()
    );
    annotated
}

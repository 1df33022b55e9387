use crate::models::{AnnotatedClip, ClipperSummary};
use std::collections::HashMap;

/// Group annotated clips by clipper and rank by total views.
///
/// Summaries start in first-seen order and the sort is stable, so clippers
/// with equal views keep that order.
pub fn aggregate(annotated: Vec<AnnotatedClip>) -> Vec<ClipperSummary> {
    let mut summaries: Vec<ClipperSummary> = Vec::new();
    let mut index_by_clipper: HashMap<String, usize> = HashMap::new();

    for item in annotated {
        let index = *index_by_clipper
            .entry(item.clip.clipper.clone())
            .or_insert_with(|| {
                summaries.push(ClipperSummary::new(&item.clip.clipper));
                summaries.len() - 1
            });
        let summary = &mut summaries[index];

        summary.total_clips += 1;
        summary.total_views += item.stats.views;
        summary.total_likes += item.stats.likes;
        summary.total_comments += item.stats.comments;
        summary.total_shares += item.stats.shares;
        *summary
            .platforms
            .entry(item.clip.platform.to_string())
            .or_insert(0) += 1;
        summary.clips.push(item);
    }

    summaries.sort_by(|a, b| b.total_views.cmp(&a.total_views));
    summaries
}

use crate::models::Platform;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FACEBOOK_ID: Regex =
        Regex::new(r"/videos/(\d+)|/posts/(\d+)|/(\d+)/videos/(\d+)|story_fbid=(\d+)")
            .expect("valid facebook id pattern");
    static ref YOUTUBE_ID: Regex =
        Regex::new(r"shorts/([a-zA-Z0-9_-]+)|v=([a-zA-Z0-9_-]+)").expect("valid youtube id pattern");
    static ref TWITTER_ID: Regex = Regex::new(r"status/(\d+)").expect("valid twitter id pattern");
}

/// Extract the platform content id from a clip URL.
///
/// Returns `None` when the URL carries no recognizable id or the platform
/// has no known URL shape.
pub fn extract_video_id(url: &str, platform: &Platform) -> Option<String> {
    let (pattern, groups): (&Regex, &[usize]) = match platform {
        // Group 3 is the page id of `/{page}/videos/{id}`, never the content id.
        Platform::Facebook => (&FACEBOOK_ID, &[1, 2, 4, 5]),
        Platform::YouTube => (&YOUTUBE_ID, &[1, 2]),
        Platform::Twitter => (&TWITTER_ID, &[1]),
        Platform::Other(_) => return None,
    };

    let captures = pattern.captures(url)?;
    groups
        .iter()
        .find_map(|&group| captures.get(group))
        .map(|m| m.as_str().to_string())
}

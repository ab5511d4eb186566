//! Source-id extraction from video reference URLs.
//!
//! Annotation rows reference their source video by URL. The cache stores
//! assets keyed by the 11-character video id, so resolution starts by
//! pulling that id out of whatever URL shape the dataset carries.

use url::Url;

/// Extract the cache key (video id) from a source reference URL.
///
/// Supported shapes:
/// - `https://youtube.com/watch?v=VIDEO_ID`
/// - `https://youtu.be/VIDEO_ID`
/// - `https://youtube.com/embed/VIDEO_ID`
/// - `https://youtube.com/shorts/VIDEO_ID`
///
/// Returns `None` for anything that does not yield a well-formed id;
/// callers treat that the same as a cache miss.
pub fn extract_source_id(reference: &str) -> Option<String> {
    let parsed = Url::parse(reference.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();

    let candidate = if host == "youtu.be" {
        parsed.path_segments()?.next().map(str::to_string)
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        let from_query = parsed
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned());
        from_query.or_else(|| {
            let mut segments = parsed.path_segments()?;
            match segments.next()? {
                "embed" | "v" | "shorts" => segments.next().map(str::to_string),
                _ => None,
            }
        })
    } else {
        None
    };

    candidate.filter(|id| is_valid_source_id(id))
}

/// Video ids are exactly 11 URL-safe base64 characters.
fn is_valid_source_id(id: &str) -> bool {
    id.len() == 11
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_source_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_source_id("https://youtu.be/dQw4w9WgXcQ?t=10"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_embed_and_shorts() {
        assert_eq!(
            extract_source_id("https://youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_source_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_rejects_non_video_urls() {
        assert_eq!(extract_source_id("https://example.com/watch?v=abc"), None);
        assert_eq!(extract_source_id("not a url"), None);
        assert_eq!(extract_source_id("https://youtube.com/watch?v=short"), None);
    }
}

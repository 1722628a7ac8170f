// URL shapes accepted for externally linked video content.
//
// Two shapes are recognized:
// - canonical watch link: `youtube.com/watch?v=<id>` (query parameter)
// - short link: `youtu.be/<...>/<id>` (last path segment, covers `/shorts/<id>`)

use crate::types::{PreviewRef, VideoId};
use url::Url;

pub fn parse_video_id(raw_url: &str) -> Option<VideoId> {
    let url = Url::parse(raw_url).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    match host {
        "youtube.com" | "m.youtube.com" => {
            if url.path() == "/watch" {
                let (_, value) = url.query_pairs().find(|(k, _)| k == "v")?;
                return valid_id(&value);
            }
            // `/shorts/<id>` also appears on the full host.
            let rest = url.path().strip_prefix("/shorts/")?;
            valid_id(rest.trim_end_matches('/'))
        }
        "youtu.be" => {
            let last = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
            valid_id(last)
        }
        _ => None,
    }
}

fn valid_id(candidate: &str) -> Option<VideoId> {
    let ok = !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    ok.then(|| VideoId::new(candidate))
}

/// Deterministic thumbnail image reference for a video id.
pub fn thumbnail_url(video_id: &VideoId) -> PreviewRef {
    PreviewRef::new(format!(
        "https://img.youtube.com/vi/{}/hqdefault.jpg",
        video_id.as_str()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_watch_link() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/watch?v=ABC123&t=5"),
            Some(VideoId::new("ABC123"))
        );
    }

    #[test]
    fn parses_short_link_with_path_segments() {
        assert_eq!(
            parse_video_id("https://youtu.be/shorts/XYZ789?feature=share"),
            Some(VideoId::new("XYZ789"))
        );
    }

    #[test]
    fn parses_plain_short_link() {
        assert_eq!(
            parse_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some(VideoId::new("dQw4w9WgXcQ"))
        );
    }

    #[test]
    fn rejects_unrelated_hosts() {
        assert_eq!(parse_video_id("https://example.com/not-a-video"), None);
    }

    #[test]
    fn rejects_watch_link_without_v_parameter() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/watch?list=PL123"),
            None
        );
    }

    #[test]
    fn rejects_ids_with_unexpected_characters() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/watch?v=a%20b"),
            None
        );
    }

    #[test]
    fn rejects_non_url_input() {
        assert_eq!(parse_video_id("not a url at all"), None);
    }

    #[test]
    fn thumbnail_is_derived_from_the_id() {
        let preview = thumbnail_url(&VideoId::new("ABC123"));
        assert_eq!(
            preview.as_str(),
            "https://img.youtube.com/vi/ABC123/hqdefault.jpg"
        );
    }
}

use url::Url;

const POST_MARKER: &str = "/p/";

/// Slug for a post link: the path segment right after `/p/`.
///
/// `https://x.example/p/my-post/comments` gives `my-post`. Links that do not
/// parse, or whose path has no `/p/` segment, give `None`.
pub fn derive_id(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let (_, after) = url.path().split_once(POST_MARKER)?;
    let slug = after.split('/').next().unwrap_or_default();
    if slug.is_empty() {
        return None;
    }
    Some(slug.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_with_trailing_segments() {
        assert_eq!(
            derive_id("https://x.example/p/my-post/comments").as_deref(),
            Some("my-post")
        );
    }

    #[test]
    fn test_slug_at_end_of_path() {
        assert_eq!(
            derive_id("https://ithaqua.substack.com/p/hello-world").as_deref(),
            Some("hello-world")
        );
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        assert_eq!(
            derive_id("https://x.example/p/post?utm_source=rss#top").as_deref(),
            Some("post")
        );
    }

    #[test]
    fn test_marker_absent() {
        assert_eq!(derive_id("https://x.example/about"), None);
        assert_eq!(derive_id("https://x.example/posts/p"), None);
    }

    #[test]
    fn test_marker_only_in_host_or_query() {
        assert_eq!(derive_id("https://x.example/?next=/p/post"), None);
    }

    #[test]
    fn test_empty_slug() {
        assert_eq!(derive_id("https://x.example/p/"), None);
    }

    #[test]
    fn test_unparseable_link() {
        assert_eq!(derive_id("not a url"), None);
        assert_eq!(derive_id("/p/relative"), None);
        assert_eq!(derive_id(""), None);
    }
}

//! Source URL validation.

/// Whether `url` is a YouTube-style watch URL the service can download.
///
/// Accepts an optional `http://`/`https://` scheme and `www.` prefix,
/// followed by `youtube.com/` or `youtu.be/` and a non-empty path.
pub fn is_valid_source_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);

    ["youtube.com/", "youtu.be/", "youtube/"]
        .iter()
        .find_map(|host| rest.strip_prefix(host))
        .is_some_and(|path| !path.is_empty())
}

//! Maps resolver-specific media candidates into `NormalizedResult`

use crate::resolver::models::{NormalizedResult, RawMedia};

pub const DEFAULT_TITLE: &str = "TikTok Video";
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Build the canonical result for a resolved media candidate
pub fn normalize(raw: RawMedia, source_url: &str, method: &str) -> NormalizedResult {
    let download_url = absolutize(&raw.media_url, &raw.origin);

    NormalizedResult {
        download_url,
        title: non_blank(raw.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        author: non_blank(raw.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        duration: raw.duration,
        cover: non_blank(raw.cover),
        music: non_blank(raw.music),
        original_url: source_url.to_string(),
        method: method.to_string(),
    }
}

/// Resolve `url` against `origin` unless it is already absolute
pub fn absolutize(url: &str, origin: &str) -> String {
    let url = url.trim();
    if url.starts_with("https://") || url.starts_with("http://") {
        return url.to_string();
    }
    if let Some(rest) = url.strip_prefix("//") {
        return format!("https://{}", rest);
    }

    let origin = origin.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{}{}", origin, url)
    } else {
        format!("{}/{}", origin, url)
    }
}

/// "https://host/a/b" -> "https://host"
pub fn origin_of(url: &str) -> &str {
    let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[after_scheme..].find('/') {
        Some(i) => &url[..after_scheme + i],
        None => url,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

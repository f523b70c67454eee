//! Direct scraping of the TikTok video page

use crate::resolver::http::ACCEPT_HTML;
use crate::resolver::models::{NormalizedResult, RawMedia};
use crate::resolver::normalizer::{absolutize, normalize};
use crate::resolver::traits::Resolver;
use crate::utils::error::ResolutionError;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::ACCEPT;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

const PAGE_ORIGIN: &str = "https://www.tiktok.com";

static DOWNLOAD_ADDR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""downloadAddr":"([^"]+)""#).unwrap());
static PLAY_ADDR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""playAddr":"([^"]+)""#).unwrap());
/// `tiktokcdn.com` or `tiktokcdn-<region>.com`, or any subdomain of those
static TRUSTED_CDN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:[^/?#]*\.)?tiktokcdn(?:-[a-z]+)?\.com(?::\d+)?[/?#]").unwrap()
});

static SCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());
static OG_VIDEO: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:video"], meta[property="og:video:url"]"#).unwrap()
});
static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:description"]"#).unwrap());

/// Fetches the video page and looks for a CDN media URL in its markup
pub struct PageScrapeResolver {
    client: Client,
}

impl PageScrapeResolver {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resolver for PageScrapeResolver {
    fn id(&self) -> &'static str {
        "direct_scrape"
    }

    async fn resolve(&self, source_url: &str) -> Result<Option<NormalizedResult>, ResolutionError> {
        let html = self
            .client
            .get(source_url)
            .header(ACCEPT, ACCEPT_HTML)
            .header("DNT", "1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        debug!("Fetched {} bytes of page markup", html.len());
        Ok(extract_from_html(&html).map(|(raw, method)| normalize(raw, source_url, method)))
    }
}

/// Scan page markup for a media URL
///
/// Each script body is checked for `downloadAddr` then `playAddr`; the
/// `og:video` meta tag is the last resort. Returns the media candidate and
/// the name of the rule that matched.
pub(crate) fn extract_from_html(html: &str) -> Option<(RawMedia, &'static str)> {
    let document = Html::parse_document(html);

    let mut found = None;
    for script in document.select(&SCRIPT) {
        let body = script.text().collect::<String>();
        if let Some(url) = trusted_capture(&DOWNLOAD_ADDR, &body) {
            found = Some((url, "direct_json"));
            break;
        }
        if let Some(url) = trusted_capture(&PLAY_ADDR, &body) {
            found = Some((url, "direct_playaddr"));
            break;
        }
    }

    if found.is_none() {
        found = document
            .select(&OG_VIDEO)
            .filter_map(|meta| meta.value().attr("content"))
            .map(|content| absolutize(&unescape_json_url(content), PAGE_ORIGIN))
            .find(|url| TRUSTED_CDN.is_match(url))
            .map(|url| (url, "meta_tags"));
    }

    let (url, method) = found?;
    let title = meta_content(&document, &OG_TITLE);
    let author = meta_content(&document, &OG_DESCRIPTION).and_then(|d| handle_from_description(&d));

    let raw = RawMedia::new(url, PAGE_ORIGIN)?
        .with_title(title)
        .with_author(author);
    Some((raw, method))
}

fn trusted_capture(pattern: &Regex, body: &str) -> Option<String> {
    let captured = pattern.captures(body)?.get(1)?.as_str();
    let url = absolutize(&unescape_json_url(captured), PAGE_ORIGIN);
    TRUSTED_CDN.is_match(&url).then_some(url)
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .find_map(|meta| meta.value().attr("content"))
        .map(|c| c.to_string())
}

/// "... by @catlover on TikTok" -> "catlover"
fn handle_from_description(description: &str) -> Option<String> {
    let (_, rest) = description.split_once('@')?;
    let handle: String = rest
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '.')
        .collect();
    (!handle.is_empty()).then_some(handle)
}

/// Undo the escaping TikTok applies to URLs embedded in JSON
pub(crate) fn unescape_json_url(raw: &str) -> String {
    raw.replace(r"\u0026", "&")
        .replace(r"\u002F", "/")
        .replace(r"\u002f", "/")
        .replace(r"\/", "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(script: &str, meta: &str) -> String {
        format!(
            "<html><head>{}</head><body><script>{}</script></body></html>",
            meta, script
        )
    }

    #[test]
    fn test_download_addr_wins() {
        let html = page(
            r#"{"playAddr":"https://v16.tiktokcdn.com/play.mp4","downloadAddr":"https://v16.tiktokcdn.com/dl.mp4?a=1\u0026b=2"}"#,
            "",
        );
        let (raw, method) = extract_from_html(&html).unwrap();
        assert_eq!(method, "direct_json");
        assert_eq!(raw.media_url(), "https://v16.tiktokcdn.com/dl.mp4?a=1&b=2");
    }

    #[test]
    fn test_play_addr_used_when_download_addr_untrusted() {
        let html = page(
            r#"{"downloadAddr":"https://evil.example/dl.mp4","playAddr":"https://v19.tiktokcdn-us.com/play.mp4"}"#,
            "",
        );
        let (raw, method) = extract_from_html(&html).unwrap();
        assert_eq!(method, "direct_playaddr");
        assert_eq!(raw.media_url(), "https://v19.tiktokcdn-us.com/play.mp4");
    }

    #[test]
    fn test_meta_tag_fallback_with_metadata() {
        let html = page(
            "window.__INIT__ = {};",
            r#"<meta property="og:video" content="https://v16.tiktokcdn.com/meta.mp4">
               <meta property="og:title" content="Cat video">
               <meta property="og:description" content="Watch this by @cat_lover on TikTok">"#,
        );
        let (raw, method) = extract_from_html(&html).unwrap();
        assert_eq!(method, "meta_tags");
        assert_eq!(raw.title.as_deref(), Some("Cat video"));
        assert_eq!(raw.author.as_deref(), Some("cat_lover"));
    }

    #[test]
    fn test_untrusted_hosts_ignored() {
        let html = page(
            r#"{"downloadAddr":"https://tiktokcdn.com.evil.example/x.mp4"}"#,
            r#"<meta property="og:video" content="https://cdn.example/v.mp4">"#,
        );
        assert!(extract_from_html(&html).is_none());
    }

    #[test]
    fn test_trusted_cdn_host_boundary() {
        assert!(TRUSTED_CDN.is_match("https://v16.tiktokcdn.com/v.mp4"));
        assert!(TRUSTED_CDN.is_match("https://tiktokcdn.com/v.mp4"));
        assert!(TRUSTED_CDN.is_match("https://v19.tiktokcdn-us.com:443/v.mp4"));
        assert!(!TRUSTED_CDN.is_match("https://eviltiktokcdn.com/v.mp4"));
        assert!(!TRUSTED_CDN.is_match("https://v16.eviltiktokcdn.com/v.mp4"));
        assert!(!TRUSTED_CDN.is_match("https://tiktokcdn.com.evil.example/v.mp4"));
    }

    #[test]
    fn test_unescape_json_url() {
        assert_eq!(
            unescape_json_url(r"https:\/\/v16.tiktokcdn.com\u002Fv.mp4?x=1\u0026y=2"),
            "https://v16.tiktokcdn.com/v.mp4?x=1&y=2"
        );
    }
}

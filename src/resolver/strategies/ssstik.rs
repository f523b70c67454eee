//! ssstik.io two-step form flow

use crate::resolver::http::ACCEPT_HTML;
use crate::resolver::models::{NormalizedResult, RawMedia};
use crate::resolver::normalizer::normalize;
use crate::resolver::traits::Resolver;
use crate::utils::error::ResolutionError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ORIGIN, REFERER};
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

const METHOD: &str = "ssstik";

static TOKEN_INPUT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[name="token"]"#).unwrap());
static DOWNLOAD_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[download][href]").unwrap());

/// Fetches a one-time form token, then submits it with the source URL
pub struct FormTokenResolver {
    client: Client,
    origin: String,
}

impl FormTokenResolver {
    pub fn new(client: Client, origin: &str) -> Self {
        Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_token(&self) -> Result<Option<String>, ResolutionError> {
        let landing = self
            .client
            .get(&self.origin)
            .header(ACCEPT, ACCEPT_HTML)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(extract_token(&landing))
    }
}

#[async_trait]
impl Resolver for FormTokenResolver {
    fn id(&self) -> &'static str {
        METHOD
    }

    async fn resolve(&self, source_url: &str) -> Result<Option<NormalizedResult>, ResolutionError> {
        let Some(token) = self.fetch_token().await? else {
            debug!("No form token on {}", self.origin);
            return Ok(None);
        };

        let form = [
            ("id", source_url),
            ("token", token.as_str()),
            ("locale", "en"),
        ];
        let result_html = self
            .client
            .post(format!("{}/abc", self.origin))
            .header(ACCEPT, ACCEPT_HTML)
            .header(ORIGIN, self.origin.as_str())
            .header(REFERER, format!("{}/", self.origin))
            .form(&form)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(extract_download_link(&result_html)
            .and_then(|href| RawMedia::new(href, self.origin.as_str()))
            .map(|raw| normalize(raw, source_url, METHOD)))
    }
}

pub(crate) fn extract_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&TOKEN_INPUT)
        .find_map(|input| input.value().attr("value"))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// First `<a download>` whose target is already absolute
pub(crate) fn extract_download_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&DOWNLOAD_LINK)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| href.starts_with("http"))
        .map(|href| href.to_string())
}

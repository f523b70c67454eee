//! Shared outbound HTTP client

use crate::utils::config::Settings;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;

pub const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
pub const ACCEPT_JSON: &str = "application/json, text/plain, */*";

/// Build the pooled client every resolver shares
///
/// The timeout applies per call; resolvers never retry.
pub fn build_client(settings: &Settings) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&settings.user_agent).context("invalid user agent")?,
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

    Client::builder()
        .default_headers(headers)
        .timeout(settings.request_timeout())
        .build()
        .context("failed to build HTTP client")
}

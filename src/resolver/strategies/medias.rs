//! Media-list API: returns several candidates, we take the first playable one

use crate::resolver::http::ACCEPT_JSON;
use crate::resolver::lenient;
use crate::resolver::models::{NormalizedResult, RawMedia};
use crate::resolver::normalizer::{normalize, origin_of};
use crate::resolver::traits::Resolver;
use crate::utils::error::ResolutionError;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;

const METHOD: &str = "medias_api";

#[derive(Debug, Deserialize)]
pub(crate) struct MediasResponse {
    #[serde(default)]
    medias: Vec<MediaEntry>,
    #[serde(default, deserialize_with = "lenient::option")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    author: Option<String>,
    #[serde(default, deserialize_with = "lenient::duration")]
    duration: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option")]
    thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MediaEntry {
    #[serde(default, deserialize_with = "lenient::option")]
    video: Option<MediaVideo>,
}

#[derive(Debug, Deserialize)]
struct MediaVideo {
    url: Option<String>,
}

pub struct MediasApiResolver {
    client: Client,
    endpoint: String,
}

impl MediasApiResolver {
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl Resolver for MediasApiResolver {
    fn id(&self) -> &'static str {
        METHOD
    }

    async fn resolve(&self, source_url: &str) -> Result<Option<NormalizedResult>, ResolutionError> {
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[("url", source_url)])
            .header(ACCEPT, ACCEPT_JSON)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: MediasResponse = serde_json::from_str(&body)?;
        Ok(parse_response(response, origin_of(&self.endpoint), source_url))
    }
}

pub(crate) fn parse_response(
    response: MediasResponse,
    origin: &str,
    source_url: &str,
) -> Option<NormalizedResult> {
    let raw = response
        .medias
        .into_iter()
        .filter_map(|entry| entry.video?.url)
        .find_map(|url| RawMedia::new(url, origin))?;

    let raw = raw
        .with_title(response.title)
        .with_author(response.author)
        .with_duration(response.duration)
        .with_cover(response.thumbnail);
    Some(normalize(raw, source_url, METHOD))
}

//! tiklydown download API (JSON POST)

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
use serde_json::json;

const METHOD: &str = "tiklydown";

#[derive(Debug, Deserialize)]
pub(crate) struct TiklydownResponse {
    #[serde(default, deserialize_with = "lenient::option")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    author: Option<AuthorField>,
    video: Option<TiklydownVideo>,
    #[serde(default, deserialize_with = "lenient::option")]
    music: Option<MusicField>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TiklydownVideo {
    no_watermark: Option<String>,
    with_watermark: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    cover: Option<String>,
    #[serde(default, deserialize_with = "lenient::duration")]
    duration: Option<u64>,
}

/// The API has returned both `{"nickname": ..}` and a bare string here
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorField {
    Profile {
        #[serde(default, deserialize_with = "lenient::option")]
        nickname: Option<String>,
    },
    Name(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MusicField {
    Url(String),
    Track {
        #[serde(default, deserialize_with = "lenient::option")]
        play_url: Option<String>,
    },
}

impl AuthorField {
    fn into_name(self) -> Option<String> {
        match self {
            AuthorField::Profile { nickname } => nickname,
            AuthorField::Name(name) => Some(name),
        }
    }
}

impl MusicField {
    fn into_url(self) -> Option<String> {
        match self {
            MusicField::Url(url) => Some(url),
            MusicField::Track { play_url } => play_url,
        }
    }
}

/// Posts the source URL as JSON; prefers the unwatermarked rendition
pub struct TiklydownResolver {
    client: Client,
    endpoint: String,
}

impl TiklydownResolver {
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    fn origin(&self) -> &str {
        origin_of(&self.endpoint)
    }
}

#[async_trait]
impl Resolver for TiklydownResolver {
    fn id(&self) -> &'static str {
        METHOD
    }

    async fn resolve(&self, source_url: &str) -> Result<Option<NormalizedResult>, ResolutionError> {
        let body = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, ACCEPT_JSON)
            .json(&json!({ "url": source_url }))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: TiklydownResponse = serde_json::from_str(&body)?;
        Ok(parse_response(response, self.origin(), source_url))
    }
}

pub(crate) fn parse_response(
    response: TiklydownResponse,
    origin: &str,
    source_url: &str,
) -> Option<NormalizedResult> {
    let video = response.video?;
    let raw = video
        .no_watermark
        .and_then(|url| RawMedia::new(url, origin))
        .or_else(|| video.with_watermark.and_then(|url| RawMedia::new(url, origin)))?;

    let raw = raw
        .with_title(response.title)
        .with_author(response.author.and_then(AuthorField::into_name))
        .with_cover(video.cover)
        .with_duration(video.duration)
        .with_music(response.music.and_then(MusicField::into_url));
    Some(normalize(raw, source_url, METHOD))
}

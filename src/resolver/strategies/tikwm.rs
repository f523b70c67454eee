//! tikwm.com resolution API

use crate::resolver::http::ACCEPT_JSON;
use crate::resolver::lenient;
use crate::resolver::models::{NormalizedResult, RawMedia};
use crate::resolver::normalizer::normalize;
use crate::resolver::traits::Resolver;
use crate::utils::error::ResolutionError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, REFERER};
use reqwest::Client;
use serde::Deserialize;

const METHOD: &str = "tikwm_api";

#[derive(Debug, Deserialize)]
pub(crate) struct TikwmResponse {
    code: Option<i64>,
    #[serde(default, deserialize_with = "lenient::option")]
    msg: Option<String>,
    data: Option<TikwmData>,
}

#[derive(Debug, Deserialize)]
struct TikwmData {
    play: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    author: Option<TikwmAuthor>,
    #[serde(default, deserialize_with = "lenient::duration")]
    duration: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option")]
    cover: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    music: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TikwmAuthor {
    #[serde(default, deserialize_with = "lenient::option")]
    nickname: Option<String>,
}

/// Query-parameter API; the playable URL may come back relative to its origin
pub struct TikwmResolver {
    client: Client,
    origin: String,
}

impl TikwmResolver {
    pub fn new(client: Client, origin: &str) -> Self {
        Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Resolver for TikwmResolver {
    fn id(&self) -> &'static str {
        METHOD
    }

    async fn resolve(&self, source_url: &str) -> Result<Option<NormalizedResult>, ResolutionError> {
        let body = self
            .client
            .get(format!("{}/api/", self.origin))
            .query(&[("url", source_url)])
            .header(ACCEPT, ACCEPT_JSON)
            .header(REFERER, format!("{}/", self.origin))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: TikwmResponse = serde_json::from_str(&body)?;
        parse_response(response, &self.origin, source_url)
    }
}

/// Success requires `code == 0` and a non-blank `data.play`
pub(crate) fn parse_response(
    response: TikwmResponse,
    origin: &str,
    source_url: &str,
) -> Result<Option<NormalizedResult>, ResolutionError> {
    if response.code != Some(0) {
        return match response.msg.filter(|m| !m.trim().is_empty()) {
            Some(msg) => Err(ResolutionError::NotFound(msg)),
            None => Ok(None),
        };
    }

    let Some(data) = response.data else {
        return Ok(None);
    };
    let Some(raw) = data.play.and_then(|play| RawMedia::new(play, origin)) else {
        return Ok(None);
    };

    let raw = raw
        .with_title(data.title)
        .with_author(data.author.and_then(|a| a.nickname))
        .with_duration(data.duration)
        .with_cover(data.cover)
        .with_music(data.music);
    Ok(Some(normalize(raw, source_url, METHOD)))
}

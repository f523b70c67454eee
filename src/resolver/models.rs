//! Data structures shared by every resolver

use serde::{Deserialize, Serialize};

/// A single inbound resolution request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    source_url: String,
}

impl DownloadRequest {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

/// Canonical success payload returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    #[serde(rename = "downloadURL")]
    pub download_url: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<String>,
    #[serde(rename = "originalURL")]
    pub original_url: String,
    /// Which strategy produced this result (e.g. "tikwm_api")
    pub method: String,
}

/// Final result of running the chain for one request
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(NormalizedResult),
    Failure(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn result(&self) -> Option<&NormalizedResult> {
        match self {
            Outcome::Success(result) => Some(result),
            Outcome::Failure(_) => None,
        }
    }
}

/// Media candidate extracted by a resolver, before normalization
///
/// Constructing one requires a non-blank media URL, which is what lets the
/// normalizer promise a non-empty `download_url`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMedia {
    pub(crate) media_url: String,
    /// Origin that relative media URLs are resolved against
    pub(crate) origin: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub duration: Option<u64>,
    pub cover: Option<String>,
    pub music: Option<String>,
}

impl RawMedia {
    /// Returns `None` when `media_url` is blank
    pub fn new(media_url: impl Into<String>, origin: impl Into<String>) -> Option<Self> {
        let media_url = media_url.into().trim().to_string();
        if media_url.is_empty() {
            return None;
        }
        Some(Self {
            media_url,
            origin: origin.into(),
            title: None,
            author: None,
            duration: None,
            cover: None,
            music: None,
        })
    }

    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn with_duration(mut self, duration: Option<u64>) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_cover(mut self, cover: Option<String>) -> Self {
        self.cover = cover;
        self
    }

    pub fn with_music(mut self, music: Option<String>) -> Self {
        self.music = music;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_media_url_rejected() {
        assert!(RawMedia::new("", "https://example.com").is_none());
        assert!(RawMedia::new("   ", "https://example.com").is_none());
        assert!(RawMedia::new("/v.mp4", "https://example.com").is_some());
    }

    #[test]
    fn test_result_serializes_with_wire_names() {
        let result = NormalizedResult {
            download_url: "https://cdn.example/v.mp4".to_string(),
            title: "TikTok Video".to_string(),
            author: "Unknown".to_string(),
            duration: None,
            cover: None,
            music: None,
            original_url: "https://vm.tiktok.com/ZMexample/".to_string(),
            method: "tiklydown".to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["downloadURL"], "https://cdn.example/v.mp4");
        assert_eq!(value["originalURL"], "https://vm.tiktok.com/ZMexample/");
        assert!(value.get("duration").is_none());
        assert!(value.get("cover").is_none());
    }
}

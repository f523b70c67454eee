//! Service configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Browser identification sent with every outbound call
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Runtime settings for the resolver service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Address the HTTP server listens on
    pub listen_addr: SocketAddr,

    /// Timeout applied to each outbound call (seconds)
    pub request_timeout_secs: u64,

    /// User-Agent header for outbound calls
    pub user_agent: String,

    /// Third-party endpoints, in the order the chain uses them
    pub endpoints: Endpoints,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            request_timeout_secs: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject settings the chain cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            bail!("request timeout must be at least one second");
        }
        if self.user_agent.trim().is_empty() {
            bail!("user agent must not be empty");
        }
        for (name, url) in self.endpoints.iter() {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                bail!("endpoint {} is not an absolute http(s) URL: {}", name, url);
            }
        }
        Ok(())
    }
}

/// Outbound service locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    /// Origin of the tikwm API; relative media paths are resolved against it
    pub tikwm_origin: String,
    /// Full URL of the tiklydown download API
    pub tiklydown_url: String,
    /// Full URL of the media-list API
    pub medias_url: String,
    /// Origin of the ssstik form site
    pub ssstik_origin: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            tikwm_origin: "https://www.tikwm.com".to_string(),
            tiklydown_url: "https://api.tiklydown.eu.org/api/download".to_string(),
            medias_url: "https://api.tikdown.org/api/v1/medias".to_string(),
            ssstik_origin: "https://ssstik.io".to_string(),
        }
    }
}

impl Endpoints {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("tikwm_origin", self.tikwm_origin.as_str()),
            ("tiklydown_url", self.tiklydown_url.as_str()),
            ("medias_url", self.medias_url.as_str()),
            ("ssstik_origin", self.ssstik_origin.as_str()),
        ]
        .into_iter()
    }
}

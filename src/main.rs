//! tiktok-resolver - resolve TikTok links to direct media URLs
//!
//! Serves `/api/download` over HTTP, or resolves a single URL from the
//! command line with `--resolve`.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde_json::json;
use std::net::SocketAddr;
use tiktok_resolver::resolver::{Outcome, ResolutionChain};
use tiktok_resolver::server::{self, AppState};
use tiktok_resolver::utils::Settings;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Resolve a single URL, print the JSON outcome and exit
    #[arg(long, value_name = "URL")]
    resolve: Option<String>,

    /// Address to listen on
    #[arg(long, env = "TIKTOK_RESOLVER_LISTEN_ADDR")]
    listen_addr: Option<SocketAddr>,

    /// Per-call timeout for outbound requests, in seconds
    #[arg(long, env = "TIKTOK_RESOLVER_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[arg(long, env = "TIKTOK_RESOLVER_USER_AGENT")]
    user_agent: Option<String>,

    #[arg(long, env = "TIKTOK_RESOLVER_TIKWM_ORIGIN")]
    tikwm_origin: Option<String>,

    #[arg(long, env = "TIKTOK_RESOLVER_TIKLYDOWN_URL")]
    tiklydown_url: Option<String>,

    #[arg(long, env = "TIKTOK_RESOLVER_MEDIAS_URL")]
    medias_url: Option<String>,

    #[arg(long, env = "TIKTOK_RESOLVER_SSSTIK_ORIGIN")]
    ssstik_origin: Option<String>,

    #[arg(long, env = "TIKTOK_RESOLVER_LOG_FORMAT", value_enum, default_value = "text")]
    log_format: LogFormat,
}

impl Args {
    /// Overlay flags and environment onto the defaults
    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(addr) = self.listen_addr {
            settings.listen_addr = addr;
        }
        if let Some(secs) = self.timeout_secs {
            settings.request_timeout_secs = secs;
        }
        if let Some(ua) = &self.user_agent {
            settings.user_agent = ua.clone();
        }

        let endpoints = &mut settings.endpoints;
        if let Some(v) = &self.tikwm_origin {
            endpoints.tikwm_origin = v.clone();
        }
        if let Some(v) = &self.tiklydown_url {
            endpoints.tiklydown_url = v.clone();
        }
        if let Some(v) = &self.medias_url {
            endpoints.medias_url = v.clone();
        }
        if let Some(v) = &self.ssstik_origin {
            endpoints.ssstik_origin = v.clone();
        }
        settings
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_tracing(args.log_format);

    let settings = args.settings();
    let chain = ResolutionChain::standard(&settings)?;

    if let Some(url) = args.resolve {
        let succeeded = resolve_once(&chain, &url).await?;
        if !succeeded {
            std::process::exit(1);
        }
        return Ok(());
    }

    server::serve(settings.listen_addr, AppState::new(chain)).await
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
    }
}

/// Print the outcome in the same shape the HTTP endpoint uses
async fn resolve_once(chain: &ResolutionChain, url: &str) -> Result<bool> {
    let outcome = chain.resolve_video(url).await;
    let body = match &outcome {
        Outcome::Success(result) => json!({ "success": true, "data": result }),
        Outcome::Failure(reason) => json!({ "success": false, "error": reason }),
    };
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(outcome.is_success())
}

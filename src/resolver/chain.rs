use crate::resolver::models::{DownloadRequest, NormalizedResult, Outcome};
use crate::resolver::traits::Resolver;
use crate::resolver::{
    build_client, FormTokenResolver, MediasApiResolver, PageScrapeResolver, TiklydownResolver,
    TikwmResolver,
};
use crate::utils::config::Settings;
use crate::utils::error::ResolutionError;
use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The Resolution Chain
///
/// Holds an ordered list of resolvers and tries them one after another
/// until one produces a result. Order is fixed at construction.
pub struct ResolutionChain {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl ResolutionChain {
    pub fn builder() -> ResolutionChainBuilder {
        ResolutionChainBuilder::default()
    }

    /// The production chain: scrape, tikwm, tiklydown, medias API, ssstik
    pub fn standard(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let client = build_client(settings)?;
        let endpoints = &settings.endpoints;

        Self::builder()
            .with(Arc::new(PageScrapeResolver::new(client.clone())))
            .with(Arc::new(TikwmResolver::new(
                client.clone(),
                &endpoints.tikwm_origin,
            )))
            .with(Arc::new(TiklydownResolver::new(
                client.clone(),
                &endpoints.tiklydown_url,
            )))
            .with(Arc::new(MediasApiResolver::new(
                client.clone(),
                &endpoints.medias_url,
            )))
            .with(Arc::new(FormTokenResolver::new(
                client,
                &endpoints.ssstik_origin,
            )))
            .build()
    }

    /// Resolver ids in priority order
    pub fn resolver_ids(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.id()).collect()
    }

    /// Run the chain and fold the result into an `Outcome`
    pub async fn resolve_video(&self, source_url: &str) -> Outcome {
        let request = DownloadRequest::new(source_url);
        match self.resolve(&request).await {
            Ok(result) => Outcome::Success(result),
            Err(e) => Outcome::Failure(e.to_string()),
        }
    }

    /// Try every resolver in order; first success wins
    ///
    /// Individual resolver errors are logged and swallowed. The only error
    /// this returns is `AllMethodsExhausted`.
    pub async fn resolve(
        &self,
        request: &DownloadRequest,
    ) -> Result<NormalizedResult, ResolutionError> {
        let url = request.source_url();
        info!("Resolving {} with {} resolvers", url, self.resolvers.len());

        for resolver in &self.resolvers {
            debug!("Trying resolver: {}", resolver.id());
            match resolver.resolve(url).await {
                Ok(Some(result)) => {
                    info!(
                        "Resolver {} succeeded (method: {})",
                        resolver.id(),
                        result.method
                    );
                    return Ok(result);
                }
                Ok(None) => {
                    debug!("Resolver {} found nothing usable", resolver.id());
                }
                Err(e) => {
                    warn!("Resolver {} failed: {}", resolver.id(), e);
                }
            }
        }

        warn!("All resolvers exhausted for {}", url);
        Err(ResolutionError::AllMethodsExhausted)
    }
}

/// Collects resolvers in priority order
#[derive(Default)]
pub struct ResolutionChainBuilder {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl ResolutionChainBuilder {
    /// Append a resolver; earlier resolvers are tried first
    pub fn with(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    pub fn build(self) -> Result<ResolutionChain> {
        if self.resolvers.is_empty() {
            bail!("resolution chain needs at least one resolver");
        }
        Ok(ResolutionChain {
            resolvers: self.resolvers,
        })
    }
}

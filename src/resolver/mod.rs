pub mod chain;
pub mod http;
pub(crate) mod lenient;
pub mod models;
pub mod normalizer;
pub mod strategies;
pub mod traits;

pub use chain::{ResolutionChain, ResolutionChainBuilder};
pub use http::build_client;
pub use models::{DownloadRequest, NormalizedResult, Outcome, RawMedia};
pub use normalizer::normalize;
pub use strategies::{
    FormTokenResolver, MediasApiResolver, PageScrapeResolver, TiklydownResolver, TikwmResolver,
};
pub use traits::Resolver;

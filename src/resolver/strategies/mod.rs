//! Concrete resolution strategies, listed in chain priority order

pub mod page_scrape;
pub mod tikwm;
pub mod tiklydown;
pub mod medias;
pub mod ssstik;

pub use medias::MediasApiResolver;
pub use page_scrape::PageScrapeResolver;
pub use ssstik::FormTokenResolver;
pub use tiklydown::TiklydownResolver;
pub use tikwm::TikwmResolver;

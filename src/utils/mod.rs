//! Utility modules for error handling and configuration

pub mod config;
pub mod error;

// Re-export for convenience
pub use config::{Endpoints, Settings, DEFAULT_USER_AGENT};
pub use error::ResolutionError;

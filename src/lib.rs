//! tiktok-resolver library

pub mod resolver;
pub mod server;
pub mod utils;

// Re-export main types for easier use
pub use resolver::{NormalizedResult, Outcome, ResolutionChain, Resolver};
pub use server::{router, AppState};
pub use utils::{ResolutionError, Settings};

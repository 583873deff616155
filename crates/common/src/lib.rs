//! Async Race Common Library
//!
//! Shared types, session state, configuration and demo data helpers for the
//! Async Race client.

pub mod config;
pub mod error;
pub mod generator;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use session::{NavState, Session};
pub use types::*;

/// Async Race version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

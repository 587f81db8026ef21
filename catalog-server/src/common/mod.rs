//! Common utilities and shared infrastructure
//!
//! - Logging setup

pub mod logger;

// Re-export commonly used items
pub use logger::{init_logger, init_logger_with_file};

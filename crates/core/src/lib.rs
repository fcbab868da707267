//! Core utilities shared by the dropoff crates
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//!
//! # Example
//!
//! ```rust,no_run
//! use dropoff_core::config::Config;
//!
//! let config = Config::load(None).expect("config");
//! assert_eq!(config.schema.search.top_k, 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, EndpointsConfig, LocationConfig, SearchConfig};
    pub use crate::error::{Error, ErrorCode, Result, ResultExt};
}

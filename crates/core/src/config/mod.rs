//! Configuration loading and schema definitions
//!
//! One TOML file drives the search radius, the location fallback chain and
//! the external endpoints. Every section and field is optional.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;

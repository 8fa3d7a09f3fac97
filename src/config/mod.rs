//! Show configuration
//!
//! Provides types and parsing for `curtain.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;

//! CLI command implementations.

pub mod migrate;
pub mod schema;
pub mod seed;
pub mod token;

//! CLI command implementations.

pub mod sync;
pub mod venues;

//! Adapters that implement the type collaborators for various data sources.

mod memory;
mod noop;

pub use memory::InMemoryTypeSystem;
pub use noop::NoOpTypeSystem;

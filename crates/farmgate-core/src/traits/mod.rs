//! Trait definitions implemented by other Farmgate crates.

pub mod cache;

pub use cache::CacheProvider;

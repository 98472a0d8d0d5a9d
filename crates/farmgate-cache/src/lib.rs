//! # farmgate-cache
//!
//! In-memory TTL cache for validation results, implementing the
//! [`CacheProvider`](farmgate_core::traits::CacheProvider) trait from
//! `farmgate-core`, plus the cache key builders.

pub mod keys;
pub mod memory;

pub use memory::MemoryCacheProvider;

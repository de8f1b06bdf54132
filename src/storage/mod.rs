//! Storage layer for the durable brief cache.
//!
//! # Modules
//!
//! - `backend`: the single-slot [`CacheStorage`] trait
//! - `json`: JSON file implementation with atomic writes
//! - `memory`: in-process implementation
//! - `models`: serialized document shapes
//! - `cache`: the immutable [`CacheStore`] value with load/save/get/put

pub mod backend;
pub mod cache;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::CacheStorage;
pub use cache::{CacheStats, CacheStore};
pub use json::JsonFileStorage;
pub use memory::MemoryStorage;
pub use models::{CacheDocument, StoredCache, CACHE_FORMAT_VERSION};

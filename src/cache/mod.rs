//! Cache module - select result memoization

pub mod result_cache;

pub use result_cache::{CacheKey, CacheStats, ResultCache};

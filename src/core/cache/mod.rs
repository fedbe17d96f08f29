//! Response cache
//!
//! Successful routed responses are memoized under a hash of the request's
//! prompt, preferred model, sampling parameters and active strategy.

pub mod store;
pub mod types;


pub use store::{InMemoryResponseCache, ResponseCache};
pub use types::{CacheEntry, CacheKey, CacheStats};

// Cache module for API responses.
// Injected key-value stores plus the endpoint-keyed responses object built on them.

pub mod paths;
pub mod requests;
pub mod store;

pub use requests::{CacheEntry, CacheObject, RequestCache};
pub use store::{CacheStore, CachedData, FileCache, MemoryCache};

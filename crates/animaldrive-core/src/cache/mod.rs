//! Client-side cache of server reads.
//!
//! - [`QueryKey`] - canonical `(endpoint, sorted params)` key
//! - [`QueryCache`] - per-record-type cache with prefix invalidation
//! - [`QueryClient`] - the folder and file caches behind one facade

mod client;
mod key;
mod query_cache;

pub use client::{ActiveKeys, QueryClient};
pub use key::QueryKey;
pub use query_cache::{CacheEntry, Listener, Loader, QueryCache, Subscription};

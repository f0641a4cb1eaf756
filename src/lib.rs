//! An in-memory key-value cache implementing the LIRS (Low Inter-reference
//! Recency Set) replacement policy.
//!
//! LIRS classifies keys by inter-reference recency rather than plain
//! recency, which gives it materially better hit ratios than LRU on
//! workloads with long scans or loops that exceed cache capacity — cases
//! where LRU evicts keys that are about to be reused.
//!
//! ```
//! use lirs_cache::LirsCache;
//!
//! let mut cache: LirsCache<&str, i32> = LirsCache::new(100).unwrap();
//! cache.put("a", 1);
//! assert_eq!(cache.get(&"a"), Some(&1));
//! ```
//!
//! See [`LirsCache`] for the full API and construction options.

pub mod error;

mod dump;
mod lirs;
mod list;

pub use dump::Dump;
pub use error::ConfigError;
pub use lirs::{Classification, LirsCache, LirsCacheBuilder};

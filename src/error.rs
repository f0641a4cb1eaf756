// Construction-time validation errors for the LIRS cache.
//
// Runtime misses are never errors (see `LirsCache::get`) — this type only
// covers the configuration checks performed once, at construction.

use thiserror::Error;

/// Reasons a [`crate::LirsCache`] or [`crate::LirsCacheBuilder`] can refuse to
/// construct a cache.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("capacity must be greater than zero")]
    ZeroCapacity,

    #[error("hir_ratio must lie strictly between 0.0 and 1.0, got {hir_ratio}")]
    InvalidHirRatio { hir_ratio: f64 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

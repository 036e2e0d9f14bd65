//! Process-local response cache.
//!
//! Entity services cache list pages and single records as JSON under keys
//! namespaced by module (see [`keys`]). Writes invalidate their own module by
//! key prefix; the admin clear operation flushes everything.
//!
//! ```toml
//! [cache]
//! enabled = true
//! capacity = 1024
//! sweep_interval_seconds = 60
//! ```

mod config;
pub mod keys;
mod lock;
mod service;
mod store;

pub use config::CacheConfig;
pub use keys::{CacheModule, CacheTtl, ModuleKey};
pub use service::{CacheService, CacheStats, spawn_sweeper};
pub use store::{CacheStore, MemoryStore};

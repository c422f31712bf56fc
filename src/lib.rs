//! Redis-backed cache store.
//!
//! This crate wraps a remote Redis server behind a small cache
//! contract: typed retrieval, existence checks, time-bound storage,
//! set-if-absent, read-then-delete, and compute-and-cache memoization.
//! Every operation maps onto a single server command; the store keeps
//! no state of its own beyond a key prefix and a connection pool, so
//! it is safe to clone and share across tasks.
//!
//! # Configuration
//!
//! ```toml
//! prefix = "app:"
//! host = "127.0.0.1"
//! port = "6379"
//! db = 0
//! password = ""
//! pool_size = 4
//! connect_timeout = 5
//! ```
//!
//! Any field can be overridden with a `FUSION_CACHE_*` environment
//! variable, e.g. `FUSION_CACHE_HOST=redis.internal`.
//!
//! # Usage
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use fusion_cache::{supply, Fallback, RedisConfig, RedisStore, Store};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), fusion_cache::CacheError> {
//! let store = RedisStore::connect(RedisConfig::default()).await?;
//!
//! store.put("user:1", "alice", Duration::from_secs(60)).await?;
//! let name = store.get("user:1", Fallback::from("guest")).await;
//!
//! let motd = store
//!     .remember("motd", Duration::from_secs(300), supply(|| "hello".to_string()))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! `pull` and `remember` each issue more than one server command and
//! are not atomic across them; see their documentation for the exact
//! races. Single-command operations inherit Redis's per-command
//! atomicity. The store adds no retries and no timeouts beyond the
//! pool checkout timeout; callers impose deadlines at the call
//! boundary.

pub mod config;
pub mod error;
pub mod fallback;
#[macro_use]
mod macros;
pub mod store;

pub use config::{ConfigError, RedisConfig};
pub use error::{CacheError, CacheResult};
pub use fallback::{supply, Fallback, Supplier};
pub use store::{RedisStore, Store};

// Used by the cache_remember! expansion.
#[doc(hidden)]
pub use serde_json;

//! Cache store contract and the operations composed on top of it.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheResult;
use crate::fallback::{Fallback, Supplier};

mod convert;
#[cfg(test)]
pub(crate) mod memory;
mod redis;

pub use self::redis::RedisStore;

/// Contract implemented by cache stores.
///
/// Implementations provide the six primitive operations, each mapping
/// onto a single store command. Everything else is a default method
/// composed from the primitives, so every backend inherits the same
/// fallback, coercion, and memoization semantics.
///
/// Stores hold no cache contents themselves; all state lives in the
/// backing server, and a store value is safe to share across tasks.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the raw value at `key`.
    ///
    /// `Ok(None)` for an absent key, `Err` for a failed command. This is
    /// the one read that distinguishes the two; the composed getters
    /// collapse both into their default.
    async fn fetch(&self, key: &str) -> CacheResult<Option<String>>;

    /// Check whether `key` exists. Errors collapse to `false`.
    async fn has(&self, key: &str) -> bool;

    /// Store `value` at `key` with the given expiry.
    ///
    /// A `ttl` of [`Duration::ZERO`] stores the value indefinitely. The
    /// underlying store error is surfaced unchanged.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Store `value` at `key` only if the key is absent.
    ///
    /// Returns `true` iff the value was newly set. Key-already-present
    /// and command failure both yield `false`; callers cannot tell them
    /// apart.
    async fn add(&self, key: &str, value: &str, ttl: Duration) -> bool;

    /// Delete `key`. Returns `false` only on error; deleting an absent
    /// key succeeds.
    async fn forget(&self, key: &str) -> bool;

    /// Remove ALL keys from the backing server, not just those under
    /// this store's prefix. Returns `true` only if the server
    /// acknowledged the command.
    ///
    /// Dangerous on servers shared between applications or tenants.
    async fn flush(&self) -> bool;

    /// Retrieve the value at `key`, or the resolved `default` when the
    /// key is absent or the read fails.
    async fn get(&self, key: &str, default: Fallback<String>) -> String {
        match self.fetch(key).await {
            Ok(Some(value)) => value,
            _ => default.resolve(),
        }
    }

    /// Retrieve the value at `key` as a boolean.
    ///
    /// Misses and read failures yield `default`. A stored `"1"` or
    /// `"true"` is `true`, `"0"` or `"false"` is `false`; any other
    /// stored value is a [`TypeMismatch`] error.
    ///
    /// [`TypeMismatch`]: crate::error::CacheError::TypeMismatch
    async fn get_bool(&self, key: &str, default: bool) -> CacheResult<bool> {
        match self.fetch(key).await {
            Ok(Some(raw)) => convert::bool_from_raw(key, &raw),
            _ => Ok(default),
        }
    }

    /// Retrieve the value at `key` parsed as a base-10 integer.
    ///
    /// Misses, read failures, and unparseable values all yield `default`.
    async fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.fetch(key).await {
            Ok(Some(raw)) => convert::int_from_raw(&raw).unwrap_or(default),
            _ => default,
        }
    }

    /// Retrieve the value at `key`, or `default` when the key is absent
    /// or the read fails.
    async fn get_string(&self, key: &str, default: &str) -> String {
        match self.fetch(key).await {
            Ok(Some(value)) => value,
            _ => default.to_string(),
        }
    }

    /// Retrieve the value at `key` and delete the key.
    ///
    /// The delete is issued regardless of the fetch outcome. Fetch and
    /// delete are two separate commands, not a transactional pop: a
    /// concurrent `put` landing between them is destroyed without ever
    /// being observed by any reader.
    async fn pull(&self, key: &str, default: Fallback<String>) -> String {
        let fetched = self.fetch(key).await;
        self.forget(key).await;

        match fetched {
            Ok(Some(value)) => value,
            _ => default.resolve(),
        }
    }

    /// Store `value` at `key` with no expiry. Returns `false` on error.
    async fn forever(&self, key: &str, value: &str) -> bool {
        self.put(key, value, Duration::ZERO).await.is_ok()
    }

    /// Return the cached value at `key`, or invoke `compute`, store its
    /// result with `ttl`, and return it.
    ///
    /// `compute` runs at most once per call, but there is no mutual
    /// exclusion across callers: two tasks observing a miss will both
    /// compute and both write, and the last write wins. Storing the
    /// computed value can fail; that error is surfaced.
    async fn remember(
        &self,
        key: &str,
        ttl: Duration,
        compute: Supplier<String>,
    ) -> CacheResult<String> {
        if let Ok(Some(value)) = self.fetch(key).await {
            return Ok(value);
        }

        let value = compute();
        self.put(key, &value, ttl).await?;

        Ok(value)
    }

    /// [`remember`](Store::remember) with no expiry.
    async fn remember_forever(&self, key: &str, compute: Supplier<String>) -> CacheResult<String> {
        self.remember(key, Duration::ZERO, compute).await
    }
}
